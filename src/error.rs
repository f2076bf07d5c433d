use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use std::path::PathBuf;
use thiserror::Error;

/// Failures while loading or invoking a regression model.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model '{model}' is unavailable: cannot read {}", .path.display())]
    Unavailable {
        model: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("model '{model}' is unavailable: {} is not a valid ensemble export", .path.display())]
    Malformed {
        model: &'static str,
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("model '{model}' is unavailable: {reason}")]
    Invalid { model: &'static str, reason: String },
    #[error("model expects {expected} feature columns, got {actual}")]
    FeatureCount { expected: usize, actual: usize },
    #[error("model returned no prediction")]
    EmptyOutput,
}

/// Everything that can stop a performance report from rendering.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("invalid request body: {0}")]
    InvalidBody(String),
    #[error("unrecognized {field} value '{label}'")]
    CategoryUnrecognized { field: &'static str, label: String },
    #[error("unknown model '{0}', expected RandomForest or XGBoost")]
    UnknownModel(String),
    #[error("{field} must be between {min} and {max}, got {value}")]
    InputOutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("prediction failed: {0}")]
    Prediction(#[from] ModelError),
    #[error("feature export failed: {0}")]
    Export(#[from] csv::Error),
}

impl ResponseError for ReportError {
    fn status_code(&self) -> StatusCode {
        match self {
            ReportError::InvalidBody(_)
            | ReportError::CategoryUnrecognized { .. }
            | ReportError::UnknownModel(_)
            | ReportError::InputOutOfRange { .. } => StatusCode::BAD_REQUEST,
            ReportError::Prediction(_) | ReportError::Export(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}
