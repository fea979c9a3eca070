mod dump;
mod generate;
mod markers;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "protoweave",
    version,
    about = "Schema-driven code generation over protoc requests",
    long_about = "Protoweave reads a protoc CodeGeneratorRequest, rebuilds the AST of the compiled \
                  proto files and lets plugins edit the generated sources at their insertion points."
)]
pub struct Cli {
    /// Also print warnings and errors of the log to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the code generation pipeline over a request
    Run(generate::RunArgs),
    /// Print the AST of the files to generate as JSON
    Dump {
        /// Serialized CodeGeneratorRequest
        #[arg(long, value_name = "FILE")]
        request: PathBuf,

        /// Include the dependency files
        #[arg(long)]
        dependencies: bool,
    },
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let _guard = protoweave_core::logging::init_logging("cli", cli.verbose);

    match cli.command {
        Commands::Run(args) => generate::run(args)?,
        Commands::Dump {
            request,
            dependencies,
        } => dump::run(&request, dependencies)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_with_repeated_roots() {
        let cli = Cli::try_parse_from([
            "protoweave",
            "run",
            "--request",
            "req.bin",
            "--source-root",
            "gen/java",
            "--source-root",
            "gen/kotlin",
            "--target-root",
            "out/java",
            "--target-root",
            "out/kotlin",
            "--print-markers",
            "java",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Run(_)));
    }

    #[test]
    fn test_parse_dump() {
        let cli = Cli::try_parse_from(["protoweave", "dump", "--request", "req.bin"]).unwrap();
        match cli.command {
            Commands::Dump {
                request,
                dependencies,
            } => {
                assert_eq!(request, PathBuf::from("req.bin"));
                assert!(!dependencies);
            }
            _ => panic!("expected dump"),
        }
    }

    #[test]
    fn test_dump_requires_a_request() {
        assert!(Cli::try_parse_from(["protoweave", "dump"]).is_err());
    }
}
