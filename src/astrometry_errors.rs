use thiserror::Error;

use crate::constants::Minutes;
use crate::element_set::ParseTleError;
use crate::regime::Regime;

#[derive(Error, Debug)]
pub enum AstrometryError {
    #[error("Couldn't open input file {path}: {source}")]
    InputUnavailable {
        path: String,
        source: std::io::Error,
    },

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Unable to write CSV record: {0}")]
    CsvError(#[from] csv::Error),

    #[error("TLE parsing error: {0}")]
    TleParsing(ParseTleError),

    #[error("Propagator initialization failed: {0}")]
    PropagatorInit(String),

    #[error("Element set belongs to the {found} regime, not {expected}")]
    RegimeMismatch { expected: Regime, found: Regime },

    #[error("Ephemeris error at {minutes:.3} min from epoch: {message}")]
    Ephemeris { minutes: Minutes, message: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl AstrometryError {
    /// Whether the error must stop the run.
    ///
    /// Parse, initialization and ephemeris failures only skip the element set
    /// or the sample point they belong to; I/O failures end the process.
    pub fn is_fatal(&self) -> bool {
        use AstrometryError::*;
        matches!(
            self,
            InputUnavailable { .. } | IoError(_) | CsvError(_) | InvalidConfig(_)
        )
    }
}

impl From<ParseTleError> for AstrometryError {
    fn from(err: ParseTleError) -> Self {
        AstrometryError::TleParsing(err)
    }
}

impl PartialEq for AstrometryError {
    fn eq(&self, other: &Self) -> bool {
        use AstrometryError::*;
        match (self, other) {
            // I/O errors are not comparable: equal when the variant matches
            (InputUnavailable { path: a, .. }, InputUnavailable { path: b, .. }) => a == b,
            (IoError(_), IoError(_)) => true,
            (CsvError(_), CsvError(_)) => true,

            (TleParsing(a), TleParsing(b)) => a == b,
            (PropagatorInit(a), PropagatorInit(b)) => a == b,
            (
                RegimeMismatch {
                    expected: e1,
                    found: f1,
                },
                RegimeMismatch {
                    expected: e2,
                    found: f2,
                },
            ) => e1 == e2 && f1 == f2,
            (
                Ephemeris {
                    minutes: m1,
                    message: s1,
                },
                Ephemeris {
                    minutes: m2,
                    message: s2,
                },
            ) => m1 == m2 && s1 == s2,
            (InvalidConfig(a), InvalidConfig(b)) => a == b,

            _ => false,
        }
    }
}
