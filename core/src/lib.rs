pub mod action;
pub mod config;
pub mod discovery;
pub mod fixture;
pub mod grading;
pub mod report;
pub mod scoring;
pub mod serdable;
pub mod style;
pub mod testing;

pub use crate::config::Config;
