//! Student Performance Analyzer: turns a student's form answers into a
//! predicted score, a star rating and study advice.

pub mod advice;
pub mod config;
pub mod encoding;
pub mod error;
pub mod features;
pub mod model;
pub mod rating;
pub mod report;
pub mod telemetry;
pub mod web;
pub mod xgboost;

pub use error::{ModelError, ReportError};
pub use model::{ModelKind, ModelRegistry};
pub use report::{build_report, PerformanceReport, RangePolicy, ReportRequest, Submission};
