//! # tle-astrometry
//!
//! Generate simulated geocentric astrometry from two-line element sets.
//!
//! For every element set of a TLE file, the satellite is propagated with SGP4 (near-Earth
//! orbits) or SDP4 (deep-space orbits) at evenly spaced epochs around the element set epoch.
//! Each position is converted to a geocentric right ascension and declination, rotated from the
//! equator and equinox of date to J2000, and emitted as one observation record.
//!
//! ```no_run
//! use camino::Utf8Path;
//! use tle_astrometry::{FixedWidthWriter, GeneratorConfig, ObservationGenerator};
//!
//! let config = GeneratorConfig::default().with_designator_filter("98067A");
//! let generator = ObservationGenerator::new(config)?;
//! let mut sink = FixedWidthWriter::new(std::io::stdout().lock());
//! let summary = generator.run_file(Utf8Path::new("stations.tle"), &mut sink)?;
//! eprintln!("{} observations", summary.records_emitted);
//! # Ok::<(), tle_astrometry::AstrometryError>(())
//! ```
pub mod astrometry_errors;
pub mod config;
pub mod constants;
pub mod element_set;
pub mod geometry;
pub mod output;
pub mod propagator;
pub mod ref_system;
pub mod regime;
pub mod sampling;
pub mod time;

pub use astrometry_errors::AstrometryError;
pub use config::{DesignatorFilter, GeneratorConfig, OutputFormat};
pub use element_set::{ElementSet, ParseTleError, ParseWarning};
pub use output::{CsvObservationWriter, FixedWidthWriter, ObservationRecord, ObservationSink, VecSink};
pub use propagator::{ComplianceMode, PropagatorState, StateVector, Stepper};
pub use regime::Regime;
pub use sampling::{ObservationGenerator, RunSummary, Sample, SamplingRun};
