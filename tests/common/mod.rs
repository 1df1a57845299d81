use camino::Utf8PathBuf;
use tle_astrometry::{
    GeneratorConfig, ObservationGenerator, ObservationRecord, RunSummary, VecSink,
};

pub fn data_path(file_name: &str) -> Utf8PathBuf {
    Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(file_name)
}

/// Run the generator on a file of `tests/data`, keeping the records in memory.
pub fn generate(file_name: &str, config: GeneratorConfig) -> (RunSummary, Vec<ObservationRecord>) {
    let generator = ObservationGenerator::new(config).unwrap();
    let mut sink = VecSink::default();
    let summary = generator.run_file(&data_path(file_name), &mut sink).unwrap();
    (summary, sink.records)
}

pub fn records_of<'a>(
    records: &'a [ObservationRecord],
    designator: &str,
) -> Vec<&'a ObservationRecord> {
    records
        .iter()
        .filter(|record| record.designator == designator)
        .collect()
}
