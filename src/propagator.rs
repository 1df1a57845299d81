//! # Regime-typed propagator state
//!
//! The SGP4/SDP4 mathematics come from the [`sgp4`] crate. This module owns the
//! per-element-set coefficients and makes the regime part of their type:
//!
//! ```text
//! PropagatorState
//! ├── NearEarth(NearEarthState)   SGP4 coefficients
//! └── DeepSpace(DeepSpaceState)   SDP4 coefficients (lunar/solar terms, resonances)
//! ```
//!
//! Each variant is built by its own initializer, which refuses element sets of the other regime,
//! and both expose the same [`Stepper`] interface. The library picks SGP4 or SDP4 by itself when
//! its coefficients are computed; the initializers recompute that choice with the library's own
//! orbit recovery ([`ComplianceMode::library_regime`]) and refuse the element set when it differs
//! from the regime tag. A state is created once per element set, is
//! owned by that element set's sampling run and is dropped with it.
//!
//! ## Compliance mode
//!
//! [`ComplianceMode`] selects the constants and the variant of the library used for every
//! initialization and step of a run. It is passed explicitly rather than stored globally.
use std::{fmt, str::FromStr};

use nalgebra::Vector3;

use crate::{
    astrometry_errors::AstrometryError,
    constants::{Minutes, DPI, MINUTES_PER_DAY, RADEG},
    element_set::ElementSet,
    regime::{regime_for_period, Regime},
};

/// Numerical compliance of the propagator library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComplianceMode {
    /// Constants and code path of the AFSPC reference implementation
    #[default]
    Afspc,
    /// Improved-mode library defaults
    Standard,
}

impl ComplianceMode {
    /// Geopotential the library uses in this mode.
    fn geopotential(&self) -> sgp4::Geopotential {
        match self {
            ComplianceMode::Afspc => sgp4::WGS72,
            ComplianceMode::Standard => sgp4::WGS84,
        }
    }

    /// Regime the propagator library routes `elements` to in this mode.
    ///
    /// The library recovers the Brouwer mean motion from the TLE mean motion with the mode's
    /// geopotential and switches to SDP4 when the resulting period reaches 225 minutes.
    pub fn library_regime(&self, elements: &sgp4::Elements) -> Result<Regime, AstrometryError> {
        let orbit = sgp4::Orbit::from_kozai_elements(
            &self.geopotential(),
            elements.inclination * RADEG,
            elements.right_ascension * RADEG,
            elements.eccentricity,
            elements.argument_of_perigee * RADEG,
            elements.mean_anomaly * RADEG,
            elements.mean_motion * DPI / MINUTES_PER_DAY,
        )
        .map_err(|err| AstrometryError::PropagatorInit(format!("{err:?}")))?;
        Ok(regime_for_period(DPI / orbit.mean_motion))
    }

    fn initialize(&self, elements: &sgp4::Elements) -> Result<sgp4::Constants, AstrometryError> {
        let constants = match self {
            ComplianceMode::Afspc => sgp4::Constants::from_elements_afspc_compatibility_mode(elements),
            ComplianceMode::Standard => sgp4::Constants::from_elements(elements),
        };
        constants.map_err(|err| AstrometryError::PropagatorInit(format!("{err:?}")))
    }

    fn propagate(
        &self,
        constants: &sgp4::Constants,
        minutes: Minutes,
    ) -> Result<StateVector, AstrometryError> {
        let t = sgp4::MinutesSinceEpoch(minutes);
        let prediction = match self {
            ComplianceMode::Afspc => constants.propagate_afspc_compatibility_mode(t),
            ComplianceMode::Standard => constants.propagate(t),
        }
        .map_err(|err| AstrometryError::Ephemeris {
            minutes,
            message: format!("{err:?}"),
        })?;

        Ok(StateVector {
            position: Vector3::from(prediction.position),
            velocity: Vector3::from(prediction.velocity),
        })
    }
}

impl FromStr for ComplianceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "afspc" => Ok(ComplianceMode::Afspc),
            "standard" => Ok(ComplianceMode::Standard),
            _ => Err(format!(
                "unknown compliance mode '{s}' (expected 'afspc' or 'standard')"
            )),
        }
    }
}

impl fmt::Display for ComplianceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComplianceMode::Afspc => write!(f, "afspc"),
            ComplianceMode::Standard => write!(f, "standard"),
        }
    }
}

/// Inertial (TEME) position and velocity, in km and km/s.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateVector {
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
}

/// Common stepping interface of both regimes.
pub trait Stepper {
    /// Regime of the coefficients held by the stepper.
    fn regime(&self) -> Regime;

    /// Propagate to `minutes` after the element set epoch (negative values go backward).
    ///
    /// Fails with [`AstrometryError::Ephemeris`] when the propagated orbit is no longer
    /// physically valid (decay, eccentricity out of range, ...).
    fn step(&self, minutes: Minutes) -> Result<StateVector, AstrometryError>;
}

/// Both the regime tag and the library's own routing must agree with `expected`.
fn expect_regime(
    element_set: &ElementSet,
    expected: Regime,
    compliance: ComplianceMode,
) -> Result<(), AstrometryError> {
    let tagged = element_set.regime();
    if tagged != expected {
        return Err(AstrometryError::RegimeMismatch {
            expected,
            found: tagged,
        });
    }
    let routed = compliance.library_regime(element_set.elements())?;
    if routed != expected {
        return Err(AstrometryError::RegimeMismatch {
            expected,
            found: routed,
        });
    }
    Ok(())
}

/// SGP4 coefficients of one near-Earth element set.
pub struct NearEarthState {
    constants: sgp4::Constants,
    compliance: ComplianceMode,
}

impl NearEarthState {
    pub fn init(element_set: &ElementSet, compliance: ComplianceMode) -> Result<Self, AstrometryError> {
        expect_regime(element_set, Regime::NearEarth, compliance)?;
        Ok(NearEarthState {
            constants: compliance.initialize(element_set.elements())?,
            compliance,
        })
    }
}

impl Stepper for NearEarthState {
    fn regime(&self) -> Regime {
        Regime::NearEarth
    }

    fn step(&self, minutes: Minutes) -> Result<StateVector, AstrometryError> {
        self.compliance.propagate(&self.constants, minutes)
    }
}

/// SDP4 coefficients of one deep-space element set.
#[derive(Debug)]
pub struct DeepSpaceState {
    constants: sgp4::Constants,
    compliance: ComplianceMode,
}

impl DeepSpaceState {
    pub fn init(element_set: &ElementSet, compliance: ComplianceMode) -> Result<Self, AstrometryError> {
        expect_regime(element_set, Regime::DeepSpace, compliance)?;
        Ok(DeepSpaceState {
            constants: compliance.initialize(element_set.elements())?,
            compliance,
        })
    }
}

impl Stepper for DeepSpaceState {
    fn regime(&self) -> Regime {
        Regime::DeepSpace
    }

    fn step(&self, minutes: Minutes) -> Result<StateVector, AstrometryError> {
        self.compliance.propagate(&self.constants, minutes)
    }
}

/// Propagator coefficients of one element set, tagged by regime.
pub enum PropagatorState {
    NearEarth(NearEarthState),
    DeepSpace(DeepSpaceState),
}

impl PropagatorState {
    /// Run the initializer matching the regime tag of `element_set`.
    pub fn init(element_set: &ElementSet, compliance: ComplianceMode) -> Result<Self, AstrometryError> {
        match element_set.regime() {
            Regime::NearEarth => {
                NearEarthState::init(element_set, compliance).map(PropagatorState::NearEarth)
            }
            Regime::DeepSpace => {
                DeepSpaceState::init(element_set, compliance).map(PropagatorState::DeepSpace)
            }
        }
    }

    pub fn compliance(&self) -> ComplianceMode {
        match self {
            PropagatorState::NearEarth(state) => state.compliance,
            PropagatorState::DeepSpace(state) => state.compliance,
        }
    }
}

impl Stepper for PropagatorState {
    fn regime(&self) -> Regime {
        match self {
            PropagatorState::NearEarth(state) => state.regime(),
            PropagatorState::DeepSpace(state) => state.regime(),
        }
    }

    fn step(&self, minutes: Minutes) -> Result<StateVector, AstrometryError> {
        match self {
            PropagatorState::NearEarth(state) => state.step(minutes),
            PropagatorState::DeepSpace(state) => state.step(minutes),
        }
    }
}

impl fmt::Debug for PropagatorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropagatorState")
            .field("regime", &self.regime())
            .field("compliance", &self.compliance())
            .finish_non_exhaustive()
    }
}
