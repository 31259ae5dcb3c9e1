// MaintLog - platform/mod.rs
//
// Platform abstraction layer: config location and loading, filesystem
// helpers, and the HTTP-backed report generator.
// Dependencies: standard library, directories, tempfile, reqwest; core model
// and report trait (openai implements core::report::ReportGenerator).
// Must NOT depend on: app.

pub mod config;
pub mod fs;
pub mod openai;
