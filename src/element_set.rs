//! # Two-line element sets
//!
//! Wraps the TLE decoder of the [`sgp4`] crate into an [`ElementSet`]: the decoded elements
//! plus everything the observation pipeline needs and the decoder does not keep.
//!
//! ## Field layout (line 1 subset used here)
//! -----------------
//! * `0..2`   – line number and space (`"1 "`)
//! * `2..7`   – catalog number
//! * `9..15`  – designator prefix field: launch year and launch number
//! * `9..17`  – full international designator (prefix + piece)
//!
//! ## Parse status
//! -----------------
//! Decoding yields either an [`ElementSet`] (possibly carrying [`ParseWarning`]s with a positive
//! code) or a [`ParseTleError`]. Warnings never discard the record; errors always do.
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::{
    constants::{DESIGNATOR_COLUMNS, JD, TLE_LINE_LENGTH},
    regime::{select_regime, Regime},
    time::datetime_to_jd,
};

static LINE1_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^1 [ 0-9A-Z]{5}[A-Z ] ").unwrap());
static LINE2_SHAPE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^2 [ 0-9A-Z]{5} ").unwrap());

/// Line-level parsing errors for two-line element sets.
///
/// Variants
/// -----------------
/// * `TooShortLine` – The line does not reach 69 columns.
/// * `NonAscii` – The line holds characters outside the ASCII range.
/// * `Rejected` – The TLE decoder refused the pair; payload carries its diagnostic.
/// * `InvalidMeanMotion` – Mean motion (rev/day) is not strictly positive.
/// * `InvalidEccentricity` – Eccentricity is outside [0, 1).
#[derive(Error, Debug, PartialEq)]
pub enum ParseTleError {
    #[error("Line {line} is too short ({length} columns)")]
    TooShortLine { line: u8, length: usize },
    #[error("Line {line} contains non-ASCII characters")]
    NonAscii { line: u8 },
    #[error("Rejected by the TLE decoder: {0}")]
    Rejected(String),
    #[error("Invalid mean motion: {0} rev/day")]
    InvalidMeanMotion(f64),
    #[error("Invalid eccentricity: {0}")]
    InvalidEccentricity(f64),
}

/// Defects that do not prevent decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseWarning {
    /// Columns past 69 were dropped from the given line
    TrailingColumns { line: u8 },
    /// The international designator field of line 1 is blank
    MissingDesignator,
}

impl ParseWarning {
    /// Positive status code of the warning.
    pub fn code(&self) -> i32 {
        match self {
            ParseWarning::TrailingColumns { line } => *line as i32,
            ParseWarning::MissingDesignator => 3,
        }
    }
}

impl std::fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseWarning::TrailingColumns { line } => {
                write!(f, "columns past {TLE_LINE_LENGTH} ignored on line {line}")
            }
            ParseWarning::MissingDesignator => write!(f, "blank international designator"),
        }
    }
}

/// Check whether two consecutive lines have the shape of a TLE pair.
///
/// This is a cheap pre-filter used while scanning text that may also contain name lines or
/// comments; it does not validate the content.
pub fn looks_like_tle_pair(line1: &str, line2: &str) -> bool {
    LINE1_SHAPE.is_match(line1) && LINE2_SHAPE.is_match(line2)
}

/// Strip line terminators and trailing blanks, then cut the line to 69 columns.
fn normalize_line<'a>(
    line: &'a str,
    number: u8,
    warnings: &mut Vec<ParseWarning>,
) -> Result<&'a str, ParseTleError> {
    let line = line.trim_end();
    if !line.is_ascii() {
        return Err(ParseTleError::NonAscii { line: number });
    }
    if line.len() < TLE_LINE_LENGTH {
        return Err(ParseTleError::TooShortLine {
            line: number,
            length: line.len(),
        });
    }
    match line.get(..TLE_LINE_LENGTH) {
        Some(head) if head.len() < line.len() => {
            warnings.push(ParseWarning::TrailingColumns { line: number });
            Ok(head)
        }
        _ => Ok(line),
    }
}

/// One decoded orbital element set, immutable once parsed.
#[derive(Debug, Clone)]
pub struct ElementSet {
    elements: sgp4::Elements,
    epoch_jd: JD,
    designator: String,
    regime: Regime,
    warnings: Vec<ParseWarning>,
}

impl ElementSet {
    /// Decode a TLE pair.
    ///
    /// Arguments
    /// -----------------
    /// * `line1`, `line2` – The two lines of the element set, terminators allowed.
    ///
    /// Return
    /// ----------
    /// * The decoded [`ElementSet`], its regime tag already selected, or a [`ParseTleError`].
    pub fn from_tle(line1: &str, line2: &str) -> Result<Self, ParseTleError> {
        let mut warnings = Vec::new();
        let line1 = normalize_line(line1, 1, &mut warnings)?;
        let line2 = normalize_line(line2, 2, &mut warnings)?;

        let elements = sgp4::Elements::from_tle(None, line1.as_bytes(), line2.as_bytes())
            .map_err(|err| ParseTleError::Rejected(format!("{err:?}")))?;

        if elements.mean_motion.is_nan() || elements.mean_motion <= 0.0 {
            return Err(ParseTleError::InvalidMeanMotion(elements.mean_motion));
        }
        if !(0.0..1.0).contains(&elements.eccentricity) {
            return Err(ParseTleError::InvalidEccentricity(elements.eccentricity));
        }

        let raw_designator = line1[DESIGNATOR_COLUMNS].trim();
        let designator = if raw_designator.is_empty() {
            warnings.push(ParseWarning::MissingDesignator);
            elements.norad_id.to_string()
        } else {
            raw_designator.to_string()
        };

        let mut element_set = ElementSet {
            epoch_jd: datetime_to_jd(&elements.datetime),
            elements,
            designator,
            regime: Regime::NearEarth,
            warnings,
        };
        element_set.regime = select_regime(&element_set);
        Ok(element_set)
    }

    /// The decoded elements, as expected by the propagator library.
    pub fn elements(&self) -> &sgp4::Elements {
        &self.elements
    }

    /// Epoch of the element set as a UTC julian date.
    pub fn epoch_jd(&self) -> JD {
        self.epoch_jd
    }

    /// International designator (columns 10–17 of line 1), or the catalog number when blank.
    pub fn designator(&self) -> &str {
        &self.designator
    }

    pub fn norad_id(&self) -> u64 {
        self.elements.norad_id
    }

    /// Regime selected when the element set was decoded.
    pub fn regime(&self) -> Regime {
        self.regime
    }

    pub fn warnings(&self) -> &[ParseWarning] {
        &self.warnings
    }
}
