//! Cartesian ↔ equatorial angle conversions.
//!
//! The observation pipeline works with geocentric inertial positions (TEME, treated as the
//! equator and equinox of date). The observer defaults to the geocenter, so the line of sight
//! is the satellite position vector itself.
use nalgebra::Vector3;

use crate::constants::{Kilometer, Radian, DPI};

/// Observer position used by the pipeline: the center of the Earth.
pub fn geocenter() -> Vector3<f64> {
    Vector3::zeros()
}

/// Convert a 3D Cartesian position vector to right ascension and declination.
///
/// Arguments
/// ---------
/// * `cartesian_position`: 3D position vector in an equatorial frame [any length unit].
///
/// Returns
/// --------
/// * Tuple `(α, δ, ρ)`:
///     - `α`: right ascension in radians, in the range [0, 2π).
///     - `δ`: declination in radians, in the range [−π/2, +π/2].
///     - `ρ`: Euclidean norm of the vector.
///
/// Remarks
/// -------
/// * If the input vector has zero norm, the result is `(0.0, 0.0, 0.0)`.
/// * On the celestial poles the right ascension is undefined and set to `0.0`.
pub fn cartesian_to_radec(cartesian_position: Vector3<f64>) -> (Radian, Radian, f64) {
    let pos_norm = cartesian_position.norm();
    if pos_norm == 0. {
        return (0.0, 0.0, pos_norm);
    }

    let delta = (cartesian_position.z / pos_norm).clamp(-1.0, 1.0).asin();

    if cartesian_position.x == 0.0 && cartesian_position.y == 0.0 {
        return (0.0, delta, pos_norm);
    }

    let alpha = cartesian_position.y.atan2(cartesian_position.x);
    (wrap_ra(alpha), delta, pos_norm)
}

/// Unit vector pointing toward `(ra, dec)`.
pub fn radec_to_unit_vector(ra: Radian, dec: Radian) -> Vector3<f64> {
    let cos_dec = dec.cos();
    Vector3::new(cos_dec * ra.cos(), cos_dec * ra.sin(), dec.sin())
}

/// Wrap a right ascension into [0, 2π).
pub fn wrap_ra(ra: Radian) -> Radian {
    let wrapped = ra.rem_euclid(DPI);
    // rem_euclid can round up to exactly 2π for tiny negative inputs
    if wrapped >= DPI {
        0.0
    } else {
        wrapped
    }
}

/// Right ascension, declination and distance of `target` as seen from `observer`.
///
/// Both vectors must be expressed in the same frame and length unit.
pub fn radec_delta(
    observer: &Vector3<f64>,
    target: &Vector3<f64>,
) -> (Radian, Radian, Kilometer) {
    cartesian_to_radec(target - observer)
}

#[cfg(test)]
mod geometry_test {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    #[test]
    fn test_cartesian_to_radec() {
        let (ra, dec, rho) = cartesian_to_radec(Vector3::new(1.0, 1.0, 0.0));
        assert_abs_diff_eq!(ra, FRAC_PI_4, epsilon = 1e-15);
        assert_eq!(dec, 0.0);
        assert_abs_diff_eq!(rho, 2f64.sqrt(), epsilon = 1e-15);

        let (ra, dec, _) = cartesian_to_radec(Vector3::new(0.0, -2.0, 0.0));
        assert_abs_diff_eq!(ra, 3.0 * FRAC_PI_2, epsilon = 1e-15);
        assert_eq!(dec, 0.0);

        let (ra, dec, rho) = cartesian_to_radec(Vector3::new(0.0, 0.0, -5.0));
        assert_eq!(ra, 0.0);
        assert_abs_diff_eq!(dec, -FRAC_PI_2, epsilon = 1e-15);
        assert_eq!(rho, 5.0);
    }

    #[test]
    fn test_degenerate_vector() {
        assert_eq!(cartesian_to_radec(Vector3::zeros()), (0.0, 0.0, 0.0));
        let position = Vector3::new(7000.0, 0.0, 0.0);
        assert_eq!(radec_delta(&position, &position), (0.0, 0.0, 0.0));
    }

    #[test]
    fn test_radec_delta_observer_offset() {
        let observer = Vector3::new(6378.0, 0.0, 0.0);
        let target = Vector3::new(6378.0, 0.0, 1000.0);
        let (ra, dec, range) = radec_delta(&observer, &target);
        assert_eq!(ra, 0.0);
        assert_abs_diff_eq!(dec, FRAC_PI_2, epsilon = 1e-15);
        assert_abs_diff_eq!(range, 1000.0, epsilon = 1e-12);

        let target = Vector3::new(-7000.0, 100.0, 300.0);
        assert_eq!(radec_delta(&geocenter(), &target), cartesian_to_radec(target));
    }

    #[test]
    fn test_unit_vector_round_trip() {
        for (ra, dec) in [(0.3, -1.2), (PI, 0.0), (6.0, 1.5), (1e-3, 0.7)] {
            let (ra2, dec2, norm) = cartesian_to_radec(radec_to_unit_vector(ra, dec));
            assert_abs_diff_eq!(ra2, ra, epsilon = 1e-12);
            assert_abs_diff_eq!(dec2, dec, epsilon = 1e-12);
            assert_abs_diff_eq!(norm, 1.0, epsilon = 1e-15);
        }
    }

    #[test]
    fn test_wrap_ra() {
        assert_abs_diff_eq!(wrap_ra(-FRAC_PI_2), 3.0 * FRAC_PI_2, epsilon = 1e-15);
        assert_abs_diff_eq!(wrap_ra(DPI + 1.0), 1.0, epsilon = 1e-12);
        assert_eq!(wrap_ra(DPI), 0.0);
        assert!(wrap_ra(-1e-300) < DPI);
    }
}
