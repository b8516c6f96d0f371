use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use tp_analysis::{EventSource, JsonLinesSource};
use tp_core::{StatusClass, TpError};
use tp_history::{AncestryOutcome, ParticleHistoryGraph};

#[derive(Args, Debug)]
pub struct TraceArgs {
    /// JSON-lines event file.
    #[arg(long = "in")]
    pub input: PathBuf,
    /// 1-based position of the record in the file.
    #[arg(long)]
    pub event: usize,
    /// Particle the walk starts from.
    #[arg(long)]
    pub particle: usize,
    /// Candidate ancestor.
    #[arg(long)]
    pub ancestor: usize,
}

#[derive(Debug, Serialize)]
struct TraceReport {
    event: usize,
    event_number: Option<u64>,
    particle: usize,
    particle_class: Option<StatusClass>,
    ancestor: usize,
    is_ancestor: bool,
    outcome: AncestryOutcome,
}

pub fn run(args: &TraceArgs) -> Result<(), Box<dyn Error>> {
    if args.event == 0 {
        return Err("--event is 1-based".into());
    }
    let mut source = JsonLinesSource::open(&args.input)?;
    let mut seen = 0;
    let record = loop {
        match source.next_record()? {
            Some(record) => {
                seen += 1;
                if seen == args.event {
                    break record;
                }
            }
            None => {
                return Err(format!(
                    "{} holds {seen} records, event {} requested",
                    args.input.display(),
                    args.event
                )
                .into())
            }
        }
    };

    let graph = ParticleHistoryGraph::new(&record.event);
    let outcome = graph.trace_ancestry(args.particle, args.ancestor);
    let particle = match outcome {
        AncestryOutcome::Malformed(fault) if !fault.is_corrupt_record() => {
            let err = TpError::from(fault);
            return Err(err.into());
        }
        _ => record.event.get(args.particle),
    };
    let report = TraceReport {
        event: args.event,
        event_number: record.event.number,
        particle: args.particle,
        particle_class: particle.map(|p| p.status_class()),
        ancestor: args.ancestor,
        is_ancestor: outcome.is_found(),
        outcome,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
