// MaintLog - core/mod.rs
//
// Core business logic layer.
// Must NOT depend on: platform, app, or filesystem access.

pub mod catalog;
pub mod export;
pub mod extract;
pub mod lemma;
pub mod model;
pub mod normalize;
pub mod report;
pub mod token;
