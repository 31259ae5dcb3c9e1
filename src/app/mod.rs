// MaintLog - app/mod.rs
//
// Application layer: catalog selection and the pipeline stages
// (preprocess, extract, report) wired to files on disk.
// Dependencies: core, platform (config, fs, report transport).

pub mod batch;
pub mod catalog_mgr;
pub mod pipeline;
pub mod preprocess;
pub mod report_runner;
