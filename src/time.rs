use chrono::{Datelike, NaiveDateTime, Timelike};
use hifitime::{Epoch, TimeScale};

use crate::constants::{JD, MJD};

/// Transformation from a TLE epoch (UTC calendar date) to julian date (JD)
///
/// Argument
/// --------
/// * `datetime`: the epoch decoded from line 1 of a TLE, in the UTC frame
///
/// Return
/// ------
/// * a float representing the epoch in julian date (JD), UTC frame
pub fn datetime_to_jd(datetime: &NaiveDateTime) -> JD {
    let epoch = Epoch::from_gregorian(
        datetime.year(),
        datetime.month() as u8,
        datetime.day() as u8,
        datetime.hour() as u8,
        datetime.minute() as u8,
        datetime.second() as u8,
        datetime.nanosecond(),
        TimeScale::UTC,
    );
    epoch.to_jde_utc_days()
}

/// Transformation from julian date (JD, UTC frame) to modified julian date (MJD, TT frame)
///
/// The precession model is expressed in TT; the sample dates are UTC julian dates.
pub fn jd_utc_to_mjd_tt(jd: JD) -> MJD {
    Epoch::from_jde_utc(jd).to_mjd_tt_days()
}
