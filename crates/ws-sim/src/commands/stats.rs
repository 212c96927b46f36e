use std::error::Error;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::PathBuf;

use clap::Args;
use ws_graph::{graph_from_json, graph_stats, read_adjlist, AdjacencyStructure, GraphStats};

use super::generate::FormatArg;

#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Graph produced by `ws-sim generate`.
    #[arg(long)]
    pub input: PathBuf,
    /// Encoding of the input file.
    #[arg(long, value_enum, default_value = "adjlist")]
    pub input_format: FormatArg,
}

pub fn run(args: &StatsArgs) -> Result<(), Box<dyn Error>> {
    let stats = compute(args)?;
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

fn compute(args: &StatsArgs) -> Result<GraphStats, Box<dyn Error>> {
    let graph = load(args)?;
    let stats = graph_stats(&graph);
    if let Some(reciprocity) = stats.reciprocity {
        if reciprocity < 1.0 {
            tracing::info!(reciprocity, "adjacency is not symmetric");
        }
    }
    Ok(stats)
}

fn load(args: &StatsArgs) -> Result<AdjacencyStructure, Box<dyn Error>> {
    let graph = match args.input_format {
        FormatArg::Adjlist => read_adjlist(BufReader::new(File::open(&args.input)?))?,
        FormatArg::Json => graph_from_json(&fs::read_to_string(&args.input)?)?,
    };
    Ok(graph)
}
