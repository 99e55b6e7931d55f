//! Status-carrying results.
//!
//! Analysis stages never raise on thin or degenerate data. They hand back an
//! [`AnalysisOutcome`] whose variant says what happened, so a caller can still
//! render whatever partial information it has. Serialized, the variant becomes
//! a `"status"` field next to the payload.

use serde::Serialize;
use strum_macros::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    Success,
    InsufficientData,
    NoResults,
}

/// Why a stage produced no payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shortfall {
    pub message: String,
    /// What the stage had to work with (swing points, bars, samples)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<usize>,
    /// What it would have needed, when there is a fixed threshold
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnalysisOutcome<T> {
    Success(T),
    InsufficientData(Shortfall),
    NoResults(Shortfall),
}

impl<T> AnalysisOutcome<T> {
    pub fn insufficient_data(
        message: impl Into<String>,
        available: usize,
        required: Option<usize>,
    ) -> Self {
        AnalysisOutcome::InsufficientData(Shortfall {
            message: message.into(),
            available: Some(available),
            required,
        })
    }

    pub fn no_results(message: impl Into<String>) -> Self {
        AnalysisOutcome::NoResults(Shortfall {
            message: message.into(),
            available: Some(0),
            required: None,
        })
    }

    pub fn status(&self) -> AnalysisStatus {
        match self {
            AnalysisOutcome::Success(_) => AnalysisStatus::Success,
            AnalysisOutcome::InsufficientData(_) => AnalysisStatus::InsufficientData,
            AnalysisOutcome::NoResults(_) => AnalysisStatus::NoResults,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, AnalysisOutcome::Success(_))
    }

    pub fn success(&self) -> Option<&T> {
        match self {
            AnalysisOutcome::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn shortfall(&self) -> Option<&Shortfall> {
        match self {
            AnalysisOutcome::Success(_) => None,
            AnalysisOutcome::InsufficientData(s) | AnalysisOutcome::NoResults(s) => Some(s),
        }
    }

    /// Unwraps the payload, or re-types the failure so it can be returned
    /// unchanged from a stage with a different payload.
    pub fn into_success<U>(self) -> Result<T, AnalysisOutcome<U>> {
        match self {
            AnalysisOutcome::Success(value) => Ok(value),
            AnalysisOutcome::InsufficientData(s) => Err(AnalysisOutcome::InsufficientData(s)),
            AnalysisOutcome::NoResults(s) => Err(AnalysisOutcome::NoResults(s)),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> AnalysisOutcome<U> {
        match self.into_success() {
            Ok(value) => AnalysisOutcome::Success(f(value)),
            Err(failure) => failure,
        }
    }
}
