use std::error::Error;

use clap::{Parser, Subcommand};
use commands::{
    generate::{self, GenerateArgs},
    stats::{self, StatsArgs},
};

mod commands;
mod logging;

#[derive(Parser, Debug)]
#[command(name = "ws-sim", about = "Watts-Strogatz small-world graph generator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a graph and print it as an adjacency list.
    Generate(GenerateArgs),
    /// Print structural diagnostics for a stored graph.
    Stats(StatsArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    logging::init_logging()?;
    let cli = Cli::parse();
    let result = match cli.command {
        Command::Generate(args) => generate::run(&args),
        Command::Stats(args) => stats::run(&args),
    };
    if let Err(err) = &result {
        tracing::error!(error = %err, "command execution failed");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classic_positional_invocation_parses() {
        let cli = Cli::try_parse_from(["ws-sim", "generate", "1000", "10", "0.1"]).unwrap();
        match cli.command {
            Command::Generate(args) => {
                assert_eq!(args.nodes, Some(1000));
                assert_eq!(args.degree, Some(10));
                assert_eq!(args.probability, Some(0.1));
                assert_eq!(args.seed, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn negative_positionals_reach_validation() {
        let cli = Cli::try_parse_from(["ws-sim", "generate", "-5", "2", "0.5"]).unwrap();
        match cli.command {
            Command::Generate(args) => {
                let err = generate::resolve_config(&args).unwrap_err();
                assert_eq!(err.info().code, "negative-parameter");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn flags_parse() {
        let cli = Cli::try_parse_from([
            "ws-sim",
            "generate",
            "--config",
            "gen.yaml",
            "--seed",
            "4",
            "--format",
            "json",
            "--odd-degree",
            "reject",
            "--streams",
            "per-node",
            "--max-attempts",
            "20",
        ])
        .unwrap();
        match cli.command {
            Command::Generate(args) => {
                assert_eq!(args.nodes, None);
                assert_eq!(args.format, Some(generate::FormatArg::Json));
                assert_eq!(args.odd_degree, Some(generate::OddDegreeArg::Reject));
                assert_eq!(args.streams, Some(generate::StreamsArg::PerNode));
                assert_eq!(args.max_attempts, Some(20));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn stats_requires_input() {
        assert!(Cli::try_parse_from(["ws-sim", "stats"]).is_err());
    }
}
