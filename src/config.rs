//! Run configuration of the observation generator.
use std::{fmt, str::FromStr};

use crate::{
    astrometry_errors::AstrometryError,
    constants::{DEFAULT_SAMPLE_COUNT, DEFAULT_STEP_DAYS, DESIGNATOR_COLUMNS, DESIGNATOR_PREFIX_WIDTH},
    propagator::ComplianceMode,
};

/// Identifier filter on the designator prefix field (columns 10–15 of TLE line 1).
///
/// The comparison is made on the raw text of line 1, before decoding, so that element sets
/// can be skipped without being parsed. Only the first six characters of the filter are used;
/// a shorter filter matches every prefix field starting with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesignatorFilter(String);

impl DesignatorFilter {
    pub fn new(prefix: &str) -> Self {
        DesignatorFilter(prefix.chars().take(DESIGNATOR_PREFIX_WIDTH).collect())
    }

    /// Check the raw first line of an element set against the filter.
    pub fn matches(&self, line1: &str) -> bool {
        let prefix_field = DESIGNATOR_COLUMNS.start..DESIGNATOR_COLUMNS.start + DESIGNATOR_PREFIX_WIDTH;
        line1
            .get(prefix_field)
            .is_some_and(|field| field.starts_with(self.0.as_str()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Layout of the emitted observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Fixed-width text lines
    #[default]
    Text,
    /// Comma-separated values with a header row
    Csv,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("unknown output format '{s}' (expected 'text' or 'csv')")),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

/// Parameters of an observation generation run.
///
/// # Fields
///
/// * `designator_filter` - Restrict the run to element sets whose designator prefix field
///   matches, `None` processes every element set
/// * `sample_count` - Number of sample points per element set
/// * `step_days` - Spacing between two sample points, in days
/// * `compliance` - Numerical compliance mode of the propagator, shared by the whole run
/// * `output_format` - Layout of the emitted records
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    pub designator_filter: Option<DesignatorFilter>,
    pub sample_count: usize,
    pub step_days: f64,
    pub compliance: ComplianceMode,
    pub output_format: OutputFormat,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            designator_filter: None,
            sample_count: DEFAULT_SAMPLE_COUNT,
            step_days: DEFAULT_STEP_DAYS,
            compliance: ComplianceMode::default(),
            output_format: OutputFormat::default(),
        }
    }
}

impl GeneratorConfig {
    pub fn with_designator_filter(mut self, prefix: &str) -> Self {
        self.designator_filter = Some(DesignatorFilter::new(prefix));
        self
    }

    pub fn with_sample_count(mut self, sample_count: usize) -> Self {
        self.sample_count = sample_count;
        self
    }

    pub fn with_step_days(mut self, step_days: f64) -> Self {
        self.step_days = step_days;
        self
    }

    pub fn with_compliance(mut self, compliance: ComplianceMode) -> Self {
        self.compliance = compliance;
        self
    }

    pub fn with_output_format(mut self, output_format: OutputFormat) -> Self {
        self.output_format = output_format;
        self
    }

    /// Reject configurations that cannot produce evenly spaced, increasing dates.
    pub fn validate(&self) -> Result<(), AstrometryError> {
        if !self.step_days.is_finite() || self.step_days <= 0.0 {
            return Err(AstrometryError::InvalidConfig(format!(
                "step size must be a positive number of days, got {}",
                self.step_days
            )));
        }
        Ok(())
    }

    /// Whether the raw first line of an element set passes the identifier filter.
    pub fn accepts(&self, line1: &str) -> bool {
        self.designator_filter
            .as_ref()
            .is_none_or(|filter| filter.matches(line1))
    }
}
