//! # Sampling driver
//!
//! Turns a stream of TLE text into observation records.
//!
//! ## State machine
//! -----------------
//! ```text
//!                   pair passes filter and parses
//! AwaitingElementSet ─────────────────────────────▶ Initializing
//!        ▲                                              │ regime selected, state created
//!        │                                              ▼
//!        └──────────────── Done ◀─── points exhausted ─ Stepping ◀─┐
//!                                                          │       │ one sample point:
//!                                                          └───────┘ step → RA/Dec → J2000
//! ```
//!
//! The input is scanned one line at a time: every pair of consecutive lines is a candidate
//! element set, so name lines between TLEs are skipped naturally. Lines are read as bytes and
//! decoded lossily; only the ASCII TLE lines themselves are interpreted.
//!
//! Rejected candidates (filtered out, unparsable, or failing initialization) never stop the
//! scan. A sample point where the propagator fails still produces a record, flagged with
//! `ephemeris_error` and holding the last valid position, so every accepted element set yields
//! exactly `sample_count` records. Only I/O failures end a run early.
use std::{
    fs::File,
    io::{BufRead, BufReader},
    ops::Range,
};

use camino::Utf8Path;
use itertools::Itertools;
use log::{debug, info, warn};
use nalgebra::Vector3;

use crate::{
    astrometry_errors::AstrometryError,
    config::GeneratorConfig,
    constants::{Minutes, JD, MINUTES_PER_DAY},
    element_set::{looks_like_tle_pair, ElementSet},
    geometry::{geocenter, radec_delta},
    output::{ObservationRecord, ObservationSink},
    propagator::{PropagatorState, Stepper},
    ref_system::of_date_to_j2000,
};

/// One evaluation epoch of a sampling run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePoint {
    pub index: usize,
    pub minutes_since_epoch: Minutes,
    pub jd: JD,
}

impl SamplePoint {
    /// Sample `index` of `count`, centered on the epoch: offset `(index − count/2) · step_days`.
    pub fn new(epoch_jd: JD, index: usize, count: usize, step_days: f64) -> Self {
        let offset_days = (index as f64 - (count / 2) as f64) * step_days;
        SamplePoint {
            index,
            minutes_since_epoch: offset_days * MINUTES_PER_DAY,
            jd: epoch_jd + offset_days,
        }
    }
}

/// Evenly spaced sample points around `epoch_jd`, in increasing date order.
pub fn sample_points(
    epoch_jd: JD,
    count: usize,
    step_days: f64,
) -> impl Iterator<Item = SamplePoint> {
    (0..count).map(move |index| SamplePoint::new(epoch_jd, index, count, step_days))
}

/// Outcome of one sample point.
///
/// `error` holds the propagator failure at this point, in which case `record` was computed
/// from the last valid position of the run (the geocenter when there is none yet).
#[derive(Debug)]
pub struct Sample {
    pub point: SamplePoint,
    pub record: ObservationRecord,
    pub error: Option<AstrometryError>,
}

/// Sampling of one element set: owns the element set and its propagator state.
#[derive(Debug)]
pub struct SamplingRun<S = PropagatorState> {
    element_set: ElementSet,
    state: S,
    count: usize,
    step_days: f64,
    indices: Range<usize>,
    last_position: Option<Vector3<f64>>,
}

impl SamplingRun<PropagatorState> {
    /// Initialize the propagator for `element_set` with the regime chosen at parse time.
    pub fn start(element_set: ElementSet, config: &GeneratorConfig) -> Result<Self, AstrometryError> {
        let state = PropagatorState::init(&element_set, config.compliance)?;
        Ok(SamplingRun::with_stepper(element_set, state, config))
    }
}

impl<S: Stepper> SamplingRun<S> {
    pub fn with_stepper(element_set: ElementSet, state: S, config: &GeneratorConfig) -> Self {
        SamplingRun {
            element_set,
            state,
            count: config.sample_count,
            step_days: config.step_days,
            indices: 0..config.sample_count,
            last_position: None,
        }
    }

    pub fn element_set(&self) -> &ElementSet {
        &self.element_set
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    /// Geocentric J2000 observation of an of-date `position` at the date of `point`.
    ///
    /// A position on the geocenter gives RA 0, Dec 0, range 0 and is left unrotated.
    pub fn observe(&self, point: &SamplePoint, position: &Vector3<f64>) -> ObservationRecord {
        let (mut ra, mut dec, range) = radec_delta(&geocenter(), position);
        if range > 0.0 {
            of_date_to_j2000(point.jd, &mut ra, &mut dec);
        }
        ObservationRecord::new(self.element_set.designator(), point.jd, ra, dec, range)
    }

    fn sample(&mut self, point: SamplePoint) -> Sample {
        match self.state.step(point.minutes_since_epoch) {
            Ok(state_vector) => {
                self.last_position = Some(state_vector.position);
                Sample {
                    point,
                    record: self.observe(&point, &state_vector.position),
                    error: None,
                }
            }
            Err(err) => {
                let position = self.last_position.unwrap_or_else(geocenter);
                Sample {
                    point,
                    record: self.observe(&point, &position).with_ephemeris_error(true),
                    error: Some(err),
                }
            }
        }
    }
}

impl<S: Stepper> Iterator for SamplingRun<S> {
    type Item = Sample;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.indices.next()?;
        let point = SamplePoint::new(
            self.element_set.epoch_jd(),
            index,
            self.count,
            self.step_days,
        );
        Some(self.sample(point))
    }
}

/// States of the driver for one candidate line pair.
#[derive(Debug)]
pub enum DriverState {
    AwaitingElementSet,
    Initializing(ElementSet),
    Stepping(SamplingRun),
    Done,
}

/// Counters of a generation run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub element_sets_accepted: usize,
    pub element_sets_rejected: usize,
    pub records_emitted: usize,
    pub step_failures: usize,
}

/// Lines may come in any encoding; invalid UTF-8 is replaced rather than refused.
fn decode_line(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .trim_end_matches('\r')
        .to_string()
}

/// Drives the observation pipeline over TLE input.
#[derive(Debug, Clone)]
pub struct ObservationGenerator {
    config: GeneratorConfig,
}

impl ObservationGenerator {
    /// Create a generator, validating the configuration.
    pub fn new(config: GeneratorConfig) -> Result<Self, AstrometryError> {
        config.validate()?;
        Ok(ObservationGenerator { config })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Process a TLE file.
    ///
    /// Return
    /// ----------
    /// * The [`RunSummary`], or [`AstrometryError::InputUnavailable`] when the file cannot be
    ///   opened, in which case nothing has been written to `sink`.
    pub fn run_file<S: ObservationSink>(
        &self,
        path: &Utf8Path,
        sink: &mut S,
    ) -> Result<RunSummary, AstrometryError> {
        let file = File::open(path).map_err(|source| AstrometryError::InputUnavailable {
            path: path.to_string(),
            source,
        })?;
        self.process_reader(BufReader::new(file), sink)
    }

    /// Process a TLE stream line pair by line pair, writing records as they are produced.
    pub fn process_reader<R: BufRead, S: ObservationSink>(
        &self,
        reader: R,
        sink: &mut S,
    ) -> Result<RunSummary, AstrometryError> {
        let mut summary = RunSummary::default();
        itertools::process_results(reader.split(b'\n'), |lines| {
            lines
                .map(|bytes| decode_line(&bytes))
                .tuple_windows()
                .try_for_each(|(line1, line2): (String, String)| {
                    self.drive(&line1, &line2, sink, &mut summary)
                })
        })??;
        sink.finish()?;

        info!(
            "{} element set(s) processed, {} rejected, {} observation(s) written, {} ephemeris error(s)",
            summary.element_sets_accepted,
            summary.element_sets_rejected,
            summary.records_emitted,
            summary.step_failures
        );
        Ok(summary)
    }

    pub fn process_str<S: ObservationSink>(
        &self,
        text: &str,
        sink: &mut S,
    ) -> Result<RunSummary, AstrometryError> {
        self.process_reader(text.as_bytes(), sink)
    }

    /// Run the state machine on one candidate pair, from `AwaitingElementSet` back to it.
    fn drive<S: ObservationSink>(
        &self,
        line1: &str,
        line2: &str,
        sink: &mut S,
        summary: &mut RunSummary,
    ) -> Result<(), AstrometryError> {
        let mut state = DriverState::AwaitingElementSet;
        loop {
            state = match state {
                DriverState::AwaitingElementSet => match self.decode_pair(line1, line2) {
                    Ok(Some(element_set)) => DriverState::Initializing(element_set),
                    Ok(None) => return Ok(()),
                    Err(err) => return reject(err, line1, summary),
                },
                DriverState::Initializing(element_set) => {
                    let designator = element_set.designator().to_string();
                    match SamplingRun::start(element_set, &self.config) {
                        Ok(run) => {
                            debug!("{designator}: {} propagator ready", run.state().regime());
                            summary.element_sets_accepted += 1;
                            DriverState::Stepping(run)
                        }
                        Err(err) => return reject(err, &designator, summary),
                    }
                }
                DriverState::Stepping(mut run) => match run.next() {
                    Some(sample) => {
                        if let Some(err) = &sample.error {
                            warn!(
                                "{}: sample {} (JD {:.5}): {err}",
                                run.element_set().designator(),
                                sample.point.index,
                                sample.point.jd
                            );
                            summary.step_failures += 1;
                        }
                        sink.write_record(&sample.record)?;
                        summary.records_emitted += 1;
                        DriverState::Stepping(run)
                    }
                    None => DriverState::Done,
                },
                DriverState::Done => return Ok(()),
            };
        }
    }

    /// `AwaitingElementSet` transition.
    ///
    /// `Ok(None)` when the pair is not a TLE or does not pass the identifier filter.
    fn decode_pair(
        &self,
        line1: &str,
        line2: &str,
    ) -> Result<Option<ElementSet>, AstrometryError> {
        if !looks_like_tle_pair(line1, line2) {
            debug!("not a TLE pair: {line1:?}");
            return Ok(None);
        }
        if !self.config.accepts(line1) {
            debug!("filtered out: {line1:?}");
            return Ok(None);
        }

        let element_set = ElementSet::from_tle(line1, line2)?;
        for warning in element_set.warnings() {
            warn!(
                "{}: TLE parsing warning {}: {warning}",
                element_set.designator(),
                warning.code()
            );
        }
        Ok(Some(element_set))
    }
}

/// Skip an element set on a recoverable error; fatal errors end the run.
fn reject(
    err: AstrometryError,
    context: &str,
    summary: &mut RunSummary,
) -> Result<(), AstrometryError> {
    if err.is_fatal() {
        return Err(err);
    }
    warn!("{context}: {err}");
    summary.element_sets_rejected += 1;
    Ok(())
}

#[cfg(test)]
mod sampling_test {
    use std::io::{self, Read};

    use super::*;
    use crate::{
        geometry::cartesian_to_radec, output::VecSink, propagator::StateVector,
        ref_system::j2000_to_of_date, regime::Regime,
    };
    use approx::assert_abs_diff_eq;

    const VANGUARD: &str = "VANGUARD 1
1 00005U 58002B   00179.78495062  .00000023  00000-0  28098-4 0  4753
2 00005  34.2682 348.7242 1859667 331.7664  19.3264 10.82419157413667
";

    fn vanguard() -> ElementSet {
        let lines = VANGUARD.lines().collect_vec();
        ElementSet::from_tle(lines[1], lines[2]).unwrap()
    }

    /// Propagates normally up to `decay_minutes`, fails afterwards.
    #[derive(Debug)]
    struct DecayingStepper {
        inner: PropagatorState,
        decay_minutes: Minutes,
    }

    impl Stepper for DecayingStepper {
        fn regime(&self) -> Regime {
            self.inner.regime()
        }

        fn step(&self, minutes: Minutes) -> Result<StateVector, AstrometryError> {
            if minutes > self.decay_minutes {
                Err(AstrometryError::Ephemeris {
                    minutes,
                    message: "satellite has decayed".to_string(),
                })
            } else {
                self.inner.step(minutes)
            }
        }
    }

    #[test]
    fn test_sample_points_centered() {
        let points = sample_points(100.0, 100, 0.1).collect_vec();
        assert_eq!(points.len(), 100);
        assert_abs_diff_eq!(points[0].jd, 95.0, epsilon = 1e-12);
        assert_abs_diff_eq!(points[50].jd, 100.0, epsilon = 1e-12);
        assert_abs_diff_eq!(points[99].jd, 104.9, epsilon = 1e-12);
        assert_abs_diff_eq!(points[0].minutes_since_epoch, -7200.0, epsilon = 1e-9);
        assert_eq!(points[50].minutes_since_epoch, 0.0);

        let odd = sample_points(0.0, 5, 1.0).map(|p| p.jd).collect_vec();
        assert_eq!(odd, vec![-2.0, -1.0, 0.0, 1.0, 2.0]);

        assert_eq!(sample_points(0.0, 0, 1.0).count(), 0);
        assert_eq!(sample_points(0.0, 1, 1.0).map(|p| p.jd).collect_vec(), vec![0.0]);
    }

    #[test]
    fn test_sampling_run() {
        let config = GeneratorConfig::default().with_sample_count(10);
        let element_set = vanguard();
        let epoch = element_set.epoch_jd();

        let run = SamplingRun::start(element_set, &config).unwrap();
        let samples = run.collect_vec();
        assert_eq!(samples.len(), 10);
        for (i, sample) in samples.iter().enumerate() {
            let record = &sample.record;
            assert!(sample.error.is_none());
            assert!(!record.ephemeris_error);
            assert_eq!(sample.point.index, i);
            assert_eq!(record.jd, sample.point.jd);
            assert_abs_diff_eq!(record.jd, epoch + (i as f64 - 5.0) * 0.1, epsilon = 1e-9);
            assert!((0.0..360.0).contains(&record.ra_deg));
            assert!((-90.0..=90.0).contains(&record.dec_deg));
            assert!(record.range_km > 6378.0);
            assert_eq!(record.designator, "58002B");
        }
    }

    #[test]
    fn test_records_undo_to_propagated_direction() {
        let config = GeneratorConfig::default().with_sample_count(20);
        let run = SamplingRun::start(vanguard(), &config).unwrap();
        let state = PropagatorState::init(&vanguard(), config.compliance).unwrap();

        for sample in run {
            let position = state.step(sample.point.minutes_since_epoch).unwrap().position;
            let (ra_of_date, dec_of_date, range) = cartesian_to_radec(position);

            let mut ra = sample.record.ra_deg.to_radians();
            let mut dec = sample.record.dec_deg.to_radians();
            j2000_to_of_date(sample.record.jd, &mut ra, &mut dec);

            let mut dra = (ra - ra_of_date).abs();
            if dra > std::f64::consts::PI {
                dra = crate::constants::DPI - dra;
            }
            assert!(dra < 1e-9, "ra {ra} vs {ra_of_date}");
            assert_abs_diff_eq!(dec, dec_of_date, epsilon = 1e-9);
            assert_abs_diff_eq!(sample.record.range_km, range, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_decay_keeps_every_sample() {
        let config = GeneratorConfig::default();
        let stepper = DecayingStepper {
            inner: PropagatorState::init(&vanguard(), config.compliance).unwrap(),
            decay_minutes: 0.0,
        };
        let samples = SamplingRun::with_stepper(vanguard(), stepper, &config).collect_vec();
        assert_eq!(samples.len(), 100);

        let last_valid = &samples[50].record;
        assert!(samples[..=50].iter().all(|s| s.error.is_none()));
        for sample in &samples[51..] {
            assert!(matches!(sample.error, Some(AstrometryError::Ephemeris { .. })));
            assert!(sample.record.ephemeris_error);
            assert_eq!(sample.record.range_km, last_valid.range_km);
            // same position, only the precession date moves
            assert_abs_diff_eq!(sample.record.dec_deg, last_valid.dec_deg, epsilon = 1e-3);
            assert!(sample.record.jd > last_valid.jd);
        }
    }

    #[test]
    fn test_failure_before_any_position() {
        let config = GeneratorConfig::default().with_sample_count(4);
        let stepper = DecayingStepper {
            inner: PropagatorState::init(&vanguard(), config.compliance).unwrap(),
            decay_minutes: f64::NEG_INFINITY,
        };
        for sample in SamplingRun::with_stepper(vanguard(), stepper, &config) {
            assert!(sample.error.is_some());
            assert!(sample.record.ephemeris_error);
            assert_eq!(
                (sample.record.ra_deg, sample.record.dec_deg, sample.record.range_km),
                (0.0, 0.0, 0.0)
            );
        }
    }

    #[test]
    fn test_process_str() {
        let generator = ObservationGenerator::new(GeneratorConfig::default()).unwrap();
        let mut sink = VecSink::default();
        let summary = generator.process_str(VANGUARD, &mut sink).unwrap();
        assert_eq!(
            summary,
            RunSummary {
                element_sets_accepted: 1,
                element_sets_rejected: 0,
                records_emitted: 100,
                step_failures: 0
            }
        );
        assert_eq!(sink.records.len(), 100);
        for pair in sink.records.windows(2) {
            assert_abs_diff_eq!(pair[1].jd - pair[0].jd, 0.1, epsilon = 1e-8);
        }
    }

    #[test]
    fn test_non_utf8_name_line() {
        let mut input = b"SAT \xE9t\xE9 \xFF\r\n".to_vec();
        input.extend_from_slice(VANGUARD.replace('\n', "\r\n").as_bytes());

        let generator =
            ObservationGenerator::new(GeneratorConfig::default().with_sample_count(5)).unwrap();
        let mut sink = VecSink::default();
        let summary = generator.process_reader(&input[..], &mut sink).unwrap();
        assert_eq!(summary.element_sets_accepted, 1);
        assert_eq!(summary.element_sets_rejected, 0);
        assert_eq!(sink.records.len(), 5);
    }

    #[test]
    fn test_unreadable_stream_is_fatal() {
        struct BrokenPipe;

        impl Read for BrokenPipe {
            fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "stream closed"))
            }
        }

        let generator = ObservationGenerator::new(GeneratorConfig::default()).unwrap();
        let mut sink = VecSink::default();
        let err = generator
            .process_reader(BufReader::new(BrokenPipe), &mut sink)
            .unwrap_err();
        assert!(matches!(err, AstrometryError::IoError(_)));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_unparsable_pair_is_skipped() {
        let broken = VANGUARD.replace(" 34.2682", " 3X.2682");
        let text = format!("{broken}{VANGUARD}");
        let generator =
            ObservationGenerator::new(GeneratorConfig::default().with_sample_count(3)).unwrap();
        let mut sink = VecSink::default();
        let summary = generator.process_str(&text, &mut sink).unwrap();
        assert_eq!(summary.element_sets_rejected, 1);
        assert_eq!(summary.element_sets_accepted, 1);
        assert_eq!(sink.records.len(), 3);
    }

    #[test]
    fn test_parse_errors_are_recoverable() {
        let lines = VANGUARD.lines().collect_vec();
        let generator = ObservationGenerator::new(GeneratorConfig::default()).unwrap();
        let err = generator
            .decode_pair(&lines[1][..60], lines[2])
            .unwrap_err();
        assert!(matches!(err, AstrometryError::TleParsing(_)));
        assert!(!err.is_fatal());
        assert!(generator.decode_pair(lines[0], lines[1]).unwrap().is_none());
    }

    #[test]
    fn test_invalid_config() {
        let err = ObservationGenerator::new(GeneratorConfig::default().with_step_days(0.0));
        assert!(matches!(err, Err(AstrometryError::InvalidConfig(_))));
    }
}
