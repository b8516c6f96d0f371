use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Args;
use tp_analysis::{
    provenance, sha256_file, Analysis, AnalysisConfig, JsonLinesSource, RunSummary, Runner,
    TagProbeAnalysis,
};

use crate::write_json;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// YAML analysis configuration.
    #[arg(long)]
    pub config: PathBuf,
    /// JSON-lines event file.
    #[arg(long = "in")]
    pub input: PathBuf,
    /// Output directory for `summary.json`.
    #[arg(long)]
    pub out: PathBuf,
    /// Worker threads, overriding `runner.threads`; `0` lets rayon pick.
    #[arg(long)]
    pub threads: Option<usize>,
}

pub fn run(args: &RunArgs) -> Result<(), Box<dyn Error>> {
    let config_text = fs::read_to_string(&args.config)?;
    let mut config = AnalysisConfig::from_yaml_str(&config_text)?;
    if let Some(threads) = args.threads {
        config.runner.threads = threads;
    }

    let analysis = TagProbeAnalysis::new(&config);
    let runner = Runner::new(&config.runner)?;
    let mut source = JsonLinesSource::open(&args.input)?;
    let outcome = runner.run(&mut source, &analysis)?;

    let provenance = provenance(sha256_file(&args.input)?, &config_text);
    let summary = RunSummary::from_outcome(analysis.name(), outcome, provenance);
    let path = args.out.join("summary.json");
    write_json(&path, &summary)?;
    tracing::info!(
        path = %path.display(),
        events_read = summary.events_read,
        events_analyzed = summary.events_analyzed,
        "summary written"
    );
    Ok(())
}
