//! # Constants and type definitions
//!
//! This module centralizes the **physical constants**, **conversion factors**, and **common type
//! aliases** used by the observation generator.
//!
//! ## Overview
//!
//! - Unit conversions (degrees ↔ radians, days ↔ minutes, JD ↔ MJD)
//! - Reference epochs (J2000 in MJD and JD)
//! - WGS-72 geopotential values used to recover the Brouwer mean motion of a TLE
//! - Sampling defaults and the fixed metadata written with each observation

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Number of minutes in a day
pub const MINUTES_PER_DAY: f64 = 1440.0;

/// MJD epoch of J2000.0 (2000-01-01 12:00:00 TT)
pub const T2000: f64 = 51544.5;

/// Julian Date of J2000.0
pub const JD2000: f64 = 2_451_545.0;

/// Conversion factor between Julian Date and Modified Julian Date
pub const JDTOMJD: f64 = 2400000.5;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Square root of GM in Earth radii^1.5 per minute (WGS-72)
pub const WGS72_KE: f64 = 0.07436691613317342;

/// Second zonal harmonic of the geopotential (WGS-72)
pub const WGS72_J2: f64 = 0.001082616;

/// Orbital period (minutes) at and above which the deep-space theory applies
pub const DEEP_SPACE_PERIOD_THRESHOLD: f64 = 225.0;

// -------------------------------------------------------------------------------------------------
// Sampling defaults and output metadata
// -------------------------------------------------------------------------------------------------

/// Default number of sample points per element set
pub const DEFAULT_SAMPLE_COUNT: usize = 100;

/// Default spacing between two sample points, in days
pub const DEFAULT_STEP_DAYS: f64 = 0.1;

/// Number of columns of a TLE line
pub const TLE_LINE_LENGTH: usize = 69;

/// Columns of line 1 holding the international designator
pub const DESIGNATOR_COLUMNS: std::ops::Range<usize> = 9..17;

/// Width of the designator prefix field compared by the identifier filter
pub const DESIGNATOR_PREFIX_WIDTH: usize = 6;

/// Frame marker written after the designator
pub const FRAME_MARKER: char = 'C';

/// Source tag written in the trailing metadata
pub const SOURCE_TAG: &str = "TLEs";

/// MPC code of the geocenter
pub const GEOCENTRIC_MPC_CODE: &str = "500";

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in radians
pub type Radian = f64;
/// Distance in kilometers
pub type Kilometer = f64;
/// Time offset in minutes
pub type Minutes = f64;
/// Julian Date (days)
pub type JD = f64;
/// Modified Julian Date (days)
pub type MJD = f64;
