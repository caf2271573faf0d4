// PaxView - app/report.rs
//
// Plain-text rendering of a computed view for the terminal.
// Layout only: every number shown here comes from core::view.

use crate::core::contingency::ContingencyTable;
use crate::core::model::ObservedDomain;
use crate::core::view::DashboardView;
use crate::util::constants::APP_NAME;
use std::fmt::Display;
use std::io::{self, Write};

fn join<T: Display>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Print the filter choices available in a dataset.
pub fn write_options<W: Write>(out: &mut W, domain: &ObservedDomain) -> io::Result<()> {
    writeln!(out, "Filter options")?;
    writeln!(out, "  sex:      {}", join(&domain.sexes))?;
    writeln!(out, "  class:    {}", join(&domain.classes))?;
    let ports: Vec<String> = domain
        .ports
        .iter()
        .map(|p| format!("{} ({})", p.code(), p.town()))
        .collect();
    writeln!(out, "  embarked: {}", ports.join(", "))?;
    match domain.age_bounds() {
        Some((lo, hi)) => writeln!(out, "  age:      {lo} - {hi}")?,
        None => writeln!(out, "  age:      (no rows)")?,
    }
    Ok(())
}

/// Print the four metrics, the four tables and up to `preview_rows` rows.
pub fn write_report<W: Write>(
    out: &mut W,
    view: &DashboardView<'_>,
    preview_rows: usize,
) -> io::Result<()> {
    let m = &view.metrics;
    writeln!(
        out,
        "{APP_NAME}: {} of {} passengers",
        m.total,
        view.view.dataset().len()
    )?;
    writeln!(out)?;
    writeln!(out, "  Total Passengers  {}", m.total)?;
    writeln!(out, "  Survival Rate     {}", m.survival_rate_label())?;
    writeln!(out, "  Avg Age           {}", m.mean_age_label())?;
    writeln!(out, "  Female %          {}", m.female_pct_label())?;

    for table in view.tables.iter() {
        writeln!(out)?;
        write_table(out, table)?;
    }

    if preview_rows > 0 {
        writeln!(out)?;
        write_rows(out, view, preview_rows)?;
    }
    Ok(())
}

fn write_table<W: Write>(out: &mut W, table: &ContingencyTable) -> io::Result<()> {
    let width = table
        .rows
        .iter()
        .map(|r| r.label.len())
        .max()
        .unwrap_or(0)
        .max(table.field.label().len());

    writeln!(out, "Survival by {}", table.field.label())?;
    writeln!(
        out,
        "  {:<width$}  {:>8}  {:>8}  {:>6}",
        table.field.label(),
        "survived",
        "perished",
        "total"
    )?;
    for row in &table.rows {
        writeln!(
            out,
            "  {:<width$}  {:>8}  {:>8}  {:>6}",
            row.label,
            row.survived,
            row.perished,
            row.total()
        )?;
    }
    Ok(())
}

fn write_rows<W: Write>(out: &mut W, view: &DashboardView<'_>, limit: usize) -> io::Result<()> {
    writeln!(out, "Passenger data (filtered)")?;
    writeln!(
        out,
        "  {:>5}  {:<6}  {:>6}  {:<6}  {:<8}  {:<8}",
        "row", "sex", "age", "class", "embarked", "survived"
    )?;
    for p in view.view.iter().take(limit) {
        writeln!(
            out,
            "  {:>5}  {:<6}  {:>6.2}  {:<6}  {:<8}  {:<8}",
            p.row,
            p.sex.label(),
            p.age,
            p.class.label(),
            p.embarked.code(),
            u8::from(p.survived)
        )?;
    }
    if view.view.len() > limit {
        writeln!(out, "  ... {} more rows", view.view.len() - limit)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filter::{AgeRange, FilterState};
    use crate::core::model::{Dataset, Passenger, Port, Sex, TravelClass};
    use crate::core::view::{compute_view, ViewOptions};

    fn sample() -> Dataset {
        Dataset::from_records(
            (0..5)
                .map(|row| Passenger {
                    row,
                    sex: if row % 2 == 0 { Sex::Female } else { Sex::Male },
                    class: TravelClass::Second,
                    embarked: Port::Southampton,
                    age: 20.0 + row as f64,
                    survived: row < 2,
                })
                .collect(),
        )
    }

    fn render(view: &DashboardView<'_>, rows: usize) -> String {
        let mut buf = Vec::new();
        write_report(&mut buf, view, rows).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_report_shows_metrics_and_tables() {
        let ds = sample();
        let view = compute_view(&ds, &FilterState::identity(&ds), &ViewOptions { age_bins: 4 });
        let text = render(&view, 2);

        assert!(text.contains("5 of 5 passengers"));
        assert!(text.contains("Survival Rate     40.0%"));
        assert!(text.contains("Avg Age           22.0 yrs"));
        assert!(text.contains("Female %          60.0%"));
        assert!(text.contains("Survival by sex"));
        assert!(text.contains("Survival by embarked"));
        assert!(text.contains("... 3 more rows"));
    }

    #[test]
    fn test_report_empty_view_shows_na() {
        let ds = sample();
        let filter = FilterState::identity(&ds).with_age(AgeRange::new(200.0, 300.0).unwrap());
        let view = compute_view(&ds, &filter, &ViewOptions::default());
        let text = render(&view, 10);
        assert!(text.contains("Survival Rate     N/A"));
        assert!(text.contains("Female %          0.0%"));
    }

    #[test]
    fn test_options_listing() {
        let ds = sample();
        let mut buf = Vec::new();
        write_options(&mut buf, ds.domain()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("sex:      female, male"));
        assert!(text.contains("embarked: S (Southampton)"));
        assert!(text.contains("age:      20 - 24"));
    }
}
