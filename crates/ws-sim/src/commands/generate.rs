use std::error::Error;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use clap::{Args, ValueEnum};
use serde::Serialize;
use ws_core::errors::WsError;
use ws_core::{non_negative, OddDegreePolicy, RunProvenance, StreamMode};
use ws_graph::{
    generate, graph_stats, write_graph, GeneratorConfig, GraphStats, OutputFormat, RewireReport,
};

#[derive(Args, Debug, Default)]
pub struct GenerateArgs {
    /// Number of nodes N.
    #[arg(allow_negative_numbers = true)]
    pub nodes: Option<i64>,
    /// Lattice degree k (neighbours per node).
    #[arg(allow_negative_numbers = true)]
    pub degree: Option<i64>,
    /// Probability of rewiring each edge.
    #[arg(allow_negative_numbers = true)]
    pub probability: Option<f64>,
    /// YAML configuration; positional values and flags override it.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Master seed. Derived from the wall clock when omitted.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Output encoding.
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,
    /// Write the graph here instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
    /// Handling of odd degrees.
    #[arg(long, value_enum)]
    pub odd_degree: Option<OddDegreeArg>,
    /// Random stream layout for rewiring.
    #[arg(long, value_enum)]
    pub streams: Option<StreamsArg>,
    /// Candidate draws allowed per rewired slot.
    #[arg(long)]
    pub max_attempts: Option<usize>,
    /// Write a JSON manifest with provenance and diagnostics.
    #[arg(long)]
    pub manifest: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatArg {
    Adjlist,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Adjlist => OutputFormat::Adjlist,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OddDegreeArg {
    ExtraSuccessor,
    Reject,
}

impl From<OddDegreeArg> for OddDegreePolicy {
    fn from(value: OddDegreeArg) -> Self {
        match value {
            OddDegreeArg::ExtraSuccessor => OddDegreePolicy::ExtraSuccessor,
            OddDegreeArg::Reject => OddDegreePolicy::Reject,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum StreamsArg {
    Shared,
    PerNode,
}

impl From<StreamsArg> for StreamMode {
    fn from(value: StreamsArg) -> Self {
        match value {
            StreamsArg::Shared => StreamMode::Shared,
            StreamsArg::PerNode => StreamMode::PerNode,
        }
    }
}

#[derive(Debug, Serialize)]
struct RunManifest<'a> {
    provenance: &'a RunProvenance,
    report: &'a RewireReport,
    stats: GraphStats,
}

pub fn run(args: &GenerateArgs) -> Result<(), Box<dyn Error>> {
    let config = resolve_config(args)?;
    let params = config.to_params()?;
    let seed = match config.seed {
        Some(seed) => seed,
        None => {
            let seed = clock_seed();
            tracing::info!(seed, "no seed given, using wall clock");
            seed
        }
    };

    let graph = generate(&params, seed, config.streams)?;

    match &args.out {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            write_graph(&graph.adjacency, config.format, &mut writer)?;
            writer.flush()?;
        }
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            write_graph(&graph.adjacency, config.format, &mut writer)?;
            writer.flush()?;
        }
    }

    if let Some(path) = &args.manifest {
        let manifest = RunManifest {
            provenance: &graph.provenance,
            report: &graph.report,
            stats: graph_stats(&graph.adjacency),
        };
        write_json(path, &manifest)?;
    }
    Ok(())
}

/// Loads the optional config file and layers the command-line values on top.
pub fn resolve_config(args: &GenerateArgs) -> Result<GeneratorConfig, WsError> {
    let mut config = match &args.config {
        Some(path) => GeneratorConfig::load(path)?,
        None => GeneratorConfig::default(),
    };
    if let Some(nodes) = args.nodes {
        config.nodes = Some(non_negative("nodes", nodes)?);
    }
    if let Some(degree) = args.degree {
        config.degree = Some(non_negative("degree", degree)?);
    }
    if let Some(probability) = args.probability {
        config.rewire_probability = Some(probability);
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(format) = args.format {
        config.format = format.into();
    }
    if let Some(policy) = args.odd_degree {
        config.odd_degree = policy.into();
    }
    if let Some(streams) = args.streams {
        config.streams = streams.into();
    }
    if let Some(attempts) = args.max_attempts {
        config.max_attempts_per_slot = attempts;
    }
    Ok(config)
}

fn clock_seed() -> u64 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    now.as_secs().wrapping_add(u64::from(now.subsec_nanos()))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)?;
    Ok(())
}
