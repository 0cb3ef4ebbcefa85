//! bfrt-id-mapper command line tool.
//!
//! Loads a P4Info, a `bf-rt.json` and optionally a `context.json`, pushes
//! them into a mapper and prints the resulting mapping.

use bfrt::{dev_pipe_id, BfRtError, BfRtId, BfRtInfo};
use bfrt_id_mapper::{BfrtIdMapper, IdMapperConfig, IdMapperError, IdMapperResult, MapperRegistry};
use clap::Parser;
use log::{error, info};
use p4rt_types::{P4Info, P4InfoId, ParseError};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

/// Map P4Runtime object IDs to BfRt object IDs
#[derive(Parser, Debug)]
#[command(name = "bfrt-id-mapper")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// P4Info file (JSON encoding)
    #[arg(long)]
    p4info: PathBuf,

    /// BfRt metadata file (bf-rt.json)
    #[arg(long)]
    bfrt: PathBuf,

    /// Compiler context file (context.json) for action selector wiring
    #[arg(long)]
    context: Option<PathBuf>,

    /// Device unit
    #[arg(short = 'd', long, default_value = "0")]
    device: i32,

    /// Only join names that match exactly, without stripping the pipeline
    /// prefix from BfRt names
    #[arg(long)]
    exact_names: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, default_value = "warn")]
    log_level: String,

    /// Print the mapping of these P4Info IDs instead of the full table
    #[arg(long, value_name = "P4INFO_ID")]
    lookup: Vec<P4InfoId>,
}

/// Failures of one tool run.
#[derive(Debug, Error)]
enum CliError {
    #[error("P4Info: {0}")]
    P4Info(#[from] ParseError),

    #[error("BfRt: {0}")]
    BfRt(#[from] BfRtError),

    #[error(transparent)]
    Mapper(#[from] IdMapperError),

    #[error("failed to read {path}: {message}")]
    Io { path: String, message: String },

    #[error("failed to encode output: {0}")]
    Output(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
struct LookupReport {
    p4info_id: P4InfoId,
    bfrt_id: BfRtId,
    device_id: i32,
    pipe_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    action_selector_id: Option<BfRtId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    action_profile_id: Option<BfRtId>,
}

fn lookup(mapper: &BfrtIdMapper, p4info_id: P4InfoId) -> IdMapperResult<LookupReport> {
    let bfrt_id = mapper.get_bfrt_id(p4info_id)?;
    let target = mapper.get_device_target(bfrt_id)?;
    Ok(LookupReport {
        p4info_id,
        bfrt_id,
        device_id: target.device_id,
        pipe_id: dev_pipe_id(&target.pipe),
        action_selector_id: mapper.get_action_selector_id(bfrt_id).ok(),
        action_profile_id: mapper.get_action_profile_id(bfrt_id).ok(),
    })
}

fn run(args: &Args) -> Result<String, CliError> {
    let p4info = P4Info::from_file(&args.p4info)?;
    let bfrt_info = BfRtInfo::from_file(&args.bfrt)?;
    let context = args
        .context
        .as_ref()
        .map(|path| {
            std::fs::read_to_string(path).map_err(|e| CliError::Io {
                path: path.display().to_string(),
                message: e.to_string(),
            })
        })
        .transpose()?;

    info!(
        "Loaded {} P4Info objects and {} BfRt tables",
        p4info.object_count(),
        bfrt_info.tables.len()
    );

    let config = if args.exact_names {
        IdMapperConfig::exact_names()
    } else {
        IdMapperConfig::default()
    };

    let registry = MapperRegistry::new();
    let mapper = registry.attach_with_config(args.device, config)?;
    mapper.push_forwarding_pipeline(&p4info, &bfrt_info, context.as_deref())?;

    let output = if args.lookup.is_empty() {
        serde_json::to_string_pretty(&mapper.snapshot())?
    } else {
        let reports = args
            .lookup
            .iter()
            .map(|id| lookup(&mapper, *id))
            .collect::<IdMapperResult<Vec<_>>>()?;
        serde_json::to_string_pretty(&reports)?
    };
    Ok(output)
}

fn main() -> ExitCode {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&args.log_level))
        .init();

    match run(&args) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
