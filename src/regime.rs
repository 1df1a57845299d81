//! # Propagator selection
//!
//! SGP4 (near-Earth) and SDP4 (deep-space) are two incompatible perturbation theories.
//! The choice is made once per element set from the orbital period recovered from the
//! *Brouwer* mean motion, i.e. the TLE mean motion with the J2 secular contribution
//! removed (the "un-Kozai" step every SGP4 implementation performs at initialization).
//!
//! ```text
//! a₁  = (kₑ / n₀)^(2/3)
//! δ₁  = 3/2 · k₂ · (3 cos² i − 1) / (a₁² (1 − e²)^(3/2))
//! a₀  = a₁ (1 − δ₁/3 − δ₁² − 134/81 δ₁³)
//! δ₀  = 3/2 · k₂ · (3 cos² i − 1) / (a₀² (1 − e²)^(3/2))
//! n₀″ = n₀ / (1 + δ₀)
//! ```
//!
//! The element set is routed to the deep-space theory when `2π / n₀″ ≥ 225 min`.
use std::fmt;

use crate::constants::{
    Minutes, Radian, DEEP_SPACE_PERIOD_THRESHOLD, DPI, MINUTES_PER_DAY, RADEG, WGS72_J2, WGS72_KE,
};
use crate::element_set::ElementSet;

/// Propagation regime of an element set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Regime {
    /// Period below 225 minutes, SGP4 theory
    NearEarth,
    /// Period of 225 minutes or more, SDP4 theory
    DeepSpace,
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Regime::NearEarth => write!(f, "near-Earth"),
            Regime::DeepSpace => write!(f, "deep-space"),
        }
    }
}

/// Brouwer mean motion in radians per minute.
///
/// Arguments
/// ---------
/// * `mean_motion`: TLE (Kozai) mean motion in revolutions per day
/// * `eccentricity`: orbit eccentricity, in [0, 1)
/// * `inclination`: orbit inclination in radians
pub fn brouwer_mean_motion(mean_motion: f64, eccentricity: f64, inclination: Radian) -> f64 {
    let n0 = mean_motion * DPI / MINUTES_PER_DAY;
    let k2 = 0.5 * WGS72_J2;

    let a1 = (WGS72_KE / n0).powf(2.0 / 3.0);
    let cosio = inclination.cos();
    let beta0_cubed = (1.0 - eccentricity * eccentricity).powf(1.5);
    let temp = 1.5 * k2 * (3.0 * cosio * cosio - 1.0) / beta0_cubed;

    let del1 = temp / (a1 * a1);
    let a0 = a1 * (1.0 - del1 * (1.0 / 3.0 + del1 * (1.0 + del1 * 134.0 / 81.0)));
    let del0 = temp / (a0 * a0);

    n0 / (1.0 + del0)
}

/// Orbital period in minutes derived from the Brouwer mean motion.
pub fn brouwer_period_minutes(mean_motion: f64, eccentricity: f64, inclination: Radian) -> Minutes {
    DPI / brouwer_mean_motion(mean_motion, eccentricity, inclination)
}

/// Regime for an orbital period in minutes.
pub fn regime_for_period(period: Minutes) -> Regime {
    if period >= DEEP_SPACE_PERIOD_THRESHOLD {
        Regime::DeepSpace
    } else {
        Regime::NearEarth
    }
}

/// Regime for raw orbital elements, see [`brouwer_mean_motion`] for the arguments.
pub fn regime_for(mean_motion: f64, eccentricity: f64, inclination: Radian) -> Regime {
    regime_for_period(brouwer_period_minutes(mean_motion, eccentricity, inclination))
}

/// Select the propagation regime of a parsed element set.
///
/// Pure and total: the element set has been validated at parse time
/// (positive mean motion, eccentricity in [0, 1)).
pub fn select_regime(element_set: &ElementSet) -> Regime {
    let elements = element_set.elements();
    regime_for(
        elements.mean_motion,
        elements.eccentricity,
        elements.inclination * RADEG,
    )
}
