// PaxView - core/mod.rs
//
// Core business logic layer: load, normalize, filter, aggregate.
// Must NOT depend on: app or platform.

pub mod contingency;
pub mod export;
pub mod filter;
pub mod loader;
pub mod metrics;
pub mod model;
pub mod normalize;
pub mod view;
