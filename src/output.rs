//! # Observation records and sinks
//!
//! An [`ObservationRecord`] is produced for every successfully propagated sample point and handed
//! to an [`ObservationSink`] immediately; nothing is kept in memory by the generator itself.
//!
//! ## Sinks
//! -----------------
//! * [`FixedWidthWriter`] – one fixed-width text line per record:
//!
//! ```text
//! 58002B        C2451718.28495    123.4568    -05.4321                    TLEs 500
//! └ designator ─┘│└─── JD ─────┘    └ RA ──┘    └ Dec ─┘                    └ metadata
//!                └ frame marker
//! ```
//!
//! * [`CsvObservationWriter`] – header row plus one row per record, range and ephemeris
//!   error flag included.
//!
//! Every sample point yields a record. When the propagator failed at that point the record
//! carries the last valid position and `ephemeris_error` is set; the text layout is unchanged.
//! * [`VecSink`] – in-memory collection, for library callers and tests.
use std::io::Write;

use serde::Serialize;

use crate::{
    astrometry_errors::AstrometryError,
    constants::{Degree, Kilometer, Radian, FRAME_MARKER, GEOCENTRIC_MPC_CODE, JD, SOURCE_TAG},
};

/// One simulated geocentric observation, angles referred to J2000.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObservationRecord {
    pub designator: String,
    pub jd: JD,
    pub ra_deg: Degree,
    pub dec_deg: Degree,
    pub range_km: Kilometer,
    pub ephemeris_error: bool,
}

impl ObservationRecord {
    /// Build a record from angles in radians.
    pub fn new(designator: &str, jd: JD, ra: Radian, dec: Radian, range_km: Kilometer) -> Self {
        ObservationRecord {
            designator: designator.to_string(),
            jd,
            ra_deg: ra.to_degrees(),
            dec_deg: dec.to_degrees(),
            range_km,
            ephemeris_error: false,
        }
    }

    /// Mark the record as computed from a position the propagator could not update.
    pub fn with_ephemeris_error(mut self, failed: bool) -> Self {
        self.ephemeris_error = failed;
        self
    }

    /// Fixed-width text line of the record, without line terminator.
    pub fn to_fixed_width(&self) -> String {
        format!(
            "{:<14}{}{:13.5}    {:08.4}    {:+08.4}                    {} {}",
            self.designator,
            FRAME_MARKER,
            self.jd,
            self.ra_deg,
            self.dec_deg,
            SOURCE_TAG,
            GEOCENTRIC_MPC_CODE
        )
    }
}

/// Destination of the generated observations.
pub trait ObservationSink {
    fn write_record(&mut self, record: &ObservationRecord) -> Result<(), AstrometryError>;

    /// Flush buffered output. Called once, after the last record.
    fn finish(&mut self) -> Result<(), AstrometryError> {
        Ok(())
    }
}

/// Text sink writing [`ObservationRecord::to_fixed_width`] lines.
pub struct FixedWidthWriter<W: Write> {
    writer: W,
}

impl<W: Write> FixedWidthWriter<W> {
    pub fn new(writer: W) -> Self {
        FixedWidthWriter { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ObservationSink for FixedWidthWriter<W> {
    fn write_record(&mut self, record: &ObservationRecord) -> Result<(), AstrometryError> {
        writeln!(self.writer, "{}", record.to_fixed_width())?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), AstrometryError> {
        self.writer.flush()?;
        Ok(())
    }
}

/// CSV sink; the header row is written with the first record.
pub struct CsvObservationWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvObservationWriter<W> {
    pub fn new(writer: W) -> Self {
        CsvObservationWriter {
            writer: csv::Writer::from_writer(writer),
        }
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(self) -> Result<W, AstrometryError> {
        self.writer
            .into_inner()
            .map_err(|err| AstrometryError::IoError(err.into_error()))
    }
}

impl<W: Write> ObservationSink for CsvObservationWriter<W> {
    fn write_record(&mut self, record: &ObservationRecord) -> Result<(), AstrometryError> {
        self.writer.serialize(record)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), AstrometryError> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Sink keeping every record in memory.
#[derive(Debug, Default)]
pub struct VecSink {
    pub records: Vec<ObservationRecord>,
}

impl ObservationSink for VecSink {
    fn write_record(&mut self, record: &ObservationRecord) -> Result<(), AstrometryError> {
        self.records.push(record.clone());
        Ok(())
    }
}
