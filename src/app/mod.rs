// PaxView - app/mod.rs
//
// Application layer: dataset loading, request resolution, report output.
// Dependencies: core layer, platform layer for file access.

pub mod explorer;
pub mod report;
