use std::{io, process::ExitCode};

use camino::Utf8PathBuf;
use clap::Parser;
use log::error;
use tle_astrometry::{
    constants::{DEFAULT_SAMPLE_COUNT, DEFAULT_STEP_DAYS},
    AstrometryError, ComplianceMode, CsvObservationWriter, FixedWidthWriter, GeneratorConfig,
    ObservationGenerator, OutputFormat, RunSummary,
};

/// Generate simulated geocentric J2000 astrometry from a TLE file.
///
/// Observations are written to standard output, diagnostics to standard error
/// (verbosity controlled by RUST_LOG, default "warn").
#[derive(Parser)]
#[command(name = "fake_ast", version)]
struct Cli {
    /// TLE file to read
    input: Utf8PathBuf,

    /// Only process element sets whose designator starts with this prefix.
    ///
    /// Compared against columns 10-15 of line 1 (launch year and number); only the first
    /// 6 characters are used. A shorter prefix such as "98067" selects every piece of a
    /// launch, an extension over an exact 6-character match.
    #[arg(short = 'i', long = "intl-id")]
    intl_id: Option<String>,

    /// Number of observations per element set
    #[arg(short = 'n', long = "steps", default_value_t = DEFAULT_SAMPLE_COUNT)]
    steps: usize,

    /// Spacing between observations, in days
    #[arg(short = 's', long = "step-size", default_value_t = DEFAULT_STEP_DAYS)]
    step_size: f64,

    /// Propagator compliance mode: afspc or standard
    #[arg(long, default_value_t = ComplianceMode::Afspc)]
    compliance: ComplianceMode,

    /// Output layout: text or csv
    #[arg(long, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

impl Cli {
    fn config(&self) -> GeneratorConfig {
        let config = GeneratorConfig::default()
            .with_sample_count(self.steps)
            .with_step_days(self.step_size)
            .with_compliance(self.compliance)
            .with_output_format(self.format);
        match &self.intl_id {
            Some(prefix) => config.with_designator_filter(prefix),
            None => config,
        }
    }
}

fn run(cli: &Cli) -> Result<RunSummary, AstrometryError> {
    let generator = ObservationGenerator::new(cli.config())?;
    let stdout = io::stdout().lock();
    match generator.config().output_format {
        OutputFormat::Text => generator.run_file(&cli.input, &mut FixedWidthWriter::new(stdout)),
        OutputFormat::Csv => generator.run_file(&cli.input, &mut CsvObservationWriter::new(stdout)),
    }
}

/// Process exit status of a run: 0 on success, 1 after a fatal error.
fn exit_status(result: &Result<RunSummary, AstrometryError>) -> u8 {
    match result {
        Ok(_) => 0,
        Err(err) => {
            error!("{err}");
            1
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    ExitCode::from(exit_status(&run(&cli)))
}
