//! # Equatorial reference frames
//!
//! The propagator delivers positions referred to the equator and equinox **of date**: every
//! observation lives in its own frame. Before being written out, each RA/Dec pair is rotated
//! to the mean equator and equinox of **J2000** with the IAU 1976 precession model.
//!
//! The rotation depends on the observation epoch and is rebuilt for every sample point.
//!
//! ## Conventions
//!
//! * Dates handed to the public functions are **UTC julian dates**; the precession angles are
//!   evaluated in **MJD TT** after conversion with [`hifitime`].
//! * Matrices follow the `x₂ = R · x₁` convention: they map a vector expressed in the source
//!   frame to the same vector expressed in the target frame.
use nalgebra::{Matrix3, Rotation3, Vector3};

use crate::{
    constants::{Radian, JD, MJD, RADEG, T2000},
    geometry::{cartesian_to_radec, radec_to_unit_vector},
    time::jd_utc_to_mjd_tt,
};

/// Epoch of a mean equatorial frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RefEpoch {
    J2000,
    /// Mean equator and equinox of the given date (MJD, TT scale)
    Epoch(MJD),
}

impl RefEpoch {
    /// Equator and equinox of a UTC julian date.
    pub fn of_date(jd: JD) -> Self {
        RefEpoch::Epoch(jd_utc_to_mjd_tt(jd))
    }

    pub fn date(&self) -> MJD {
        match *self {
            RefEpoch::J2000 => T2000,
            RefEpoch::Epoch(d) => d,
        }
    }
}

/// Principal axis of a frame rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    X,
    Y,
    Z,
}

/// Right-handed 3×3 rotation matrix around one of the principal axes.
///
/// The matrix is an **active rotation** of a vector by `alpha` around `axis`,
/// counter-clockwise when looking down the axis toward the origin.
/// A change of basis by the angle `φ` is therefore `rotmt(-φ, axis)`.
fn rotmt(alpha: f64, axis: Axis) -> Matrix3<f64> {
    let axis = match axis {
        Axis::X => Vector3::x_axis(),
        Axis::Y => Vector3::y_axis(),
        Axis::Z => Vector3::z_axis(),
    };

    Rotation3::from_axis_angle(&axis, alpha).into()
}

/// Compute the precession matrix from J2000 to the mean equator and equinox of a given epoch (IAU 1976 model).
///
/// Arguments
/// ---------
/// * `tjm`: Modified Julian Date in TT scale.
///
/// Returns
/// --------
/// * `P` such that `x_mean(tjm) = P · x_J2000`.
///
/// Method
/// ------
/// `P = R₃(−z) · R₂(θ) · R₃(−ζ)` with the frame rotations `Rₖ`, where the angles are the
/// Lieske (1977) polynomials in Julian centuries `T = (tjm − T2000) / 36525`:
///
/// ```text
/// ζ(T) = (0.6406161 + 0.0000839·T + 0.0000050·T²) · T  [deg]
/// θ(T) = (0.5567530 - 0.0001185·T - 0.0000116·T²) · T  [deg]
/// z(T) = (0.6406161 + 0.0003041·T + 0.0000051·T²) · T  [deg]
/// ```
pub fn prec(tjm: MJD) -> Matrix3<f64> {
    // Precession polynomial coefficients (in radians)
    let zed = 0.6406161 * RADEG;
    let zd = 0.6406161 * RADEG;
    let thd = 0.5567530 * RADEG;

    let zedd = 0.0000839 * RADEG;
    let zdd = 0.0003041 * RADEG;
    let thdd = -0.0001185 * RADEG;

    let zeddd = 0.0000050 * RADEG;
    let zddd = 0.0000051 * RADEG;
    let thddd = -0.0000116 * RADEG;

    let t = (tjm - T2000) / 36525.0;

    let zeta = ((zeddd * t + zedd) * t + zed) * t;
    let z = ((zddd * t + zdd) * t + zd) * t;
    let theta = ((thddd * t + thdd) * t + thd) * t;

    rotmt(z, Axis::Z) * rotmt(-theta, Axis::Y) * rotmt(zeta, Axis::Z)
}

/// Rotation between two mean equatorial frames, passing through J2000.
///
/// Returns `R` such that `x_to = R · x_from`.
pub fn precession_rotation(from: RefEpoch, to: RefEpoch) -> Matrix3<f64> {
    let from_to_j2000 = match from {
        RefEpoch::J2000 => Matrix3::identity(),
        RefEpoch::Epoch(d) => prec(d).transpose(),
    };
    let j2000_to_target = match to {
        RefEpoch::J2000 => Matrix3::identity(),
        RefEpoch::Epoch(d) => prec(d),
    };
    j2000_to_target * from_to_j2000
}

/// Apply a frame rotation to a direction given by its equatorial angles, in place.
fn rotate_radec(rot: &Matrix3<f64>, ra: &mut Radian, dec: &mut Radian) {
    let (new_ra, new_dec, _) = cartesian_to_radec(rot * radec_to_unit_vector(*ra, *dec));
    *ra = new_ra;
    *dec = new_dec;
}

/// Rotate an of-date RA/Dec pair to the mean equator and equinox of J2000.
///
/// Arguments
/// ---------
/// * `jd`: UTC julian date of the observation, which defines the of-date frame
/// * `ra`, `dec`: angles in radians, replaced by their J2000 values (RA in [0, 2π))
pub fn of_date_to_j2000(jd: JD, ra: &mut Radian, dec: &mut Radian) {
    let rot = precession_rotation(RefEpoch::of_date(jd), RefEpoch::J2000);
    rotate_radec(&rot, ra, dec);
}

/// Inverse of [`of_date_to_j2000`].
pub fn j2000_to_of_date(jd: JD, ra: &mut Radian, dec: &mut Radian) {
    let rot = precession_rotation(RefEpoch::J2000, RefEpoch::of_date(jd));
    rotate_radec(&rot, ra, dec);
}
