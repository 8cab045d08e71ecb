// SPDX-License-Identifier: MIT

use anyhow::Context;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use markflow::config::CompilerConfig;
use markflow::workflow::command::build_event_aware_command_condition;
use markflow::workflow::compiler::{lock_file_path, Compiler};
use markflow::workflow::condition::{parse, strip_expression_wrapper};
use markflow::workflow::types::Frontmatter;

use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compile a markdown workflow into a lock file
    Compile {
        /// Path to the markdown workflow
        file: PathBuf,

        /// Output path, defaults to <name>.lock.yml next to the source
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Longest condition line in the output
        #[arg(long)]
        max_line_length: Option<usize>,

        /// Length after which condition lines break at the next operator
        #[arg(long)]
        break_threshold: Option<usize>,
    },
    /// Parse a condition expression and print it normalized
    Parse {
        /// The expression, with or without a ${{ }} wrapper
        expression: String,

        /// Print the syntax tree as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the activation condition for a slash command
    Command {
        /// Command name (repeatable)
        #[arg(short, long = "name", required = true)]
        names: Vec<String>,

        /// Comment event to listen on (repeatable); all when omitted
        #[arg(short, long = "events")]
        events: Vec<String>,

        /// The workflow also has triggers that cannot carry a command
        #[arg(long)]
        other_events: bool,
    },
    /// Print the JSON schema of the workflow frontmatter
    Schema,
}

fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let args = Args::parse();

    match args.command {
        Commands::Compile {
            file,
            output,
            max_line_length,
            break_threshold,
        } => {
            let config =
                CompilerConfig::from_env()?.with_overrides(max_line_length, break_threshold)?;
            let compiler = Compiler::new(config);
            let lock = compiler
                .compile_file(&file)
                .with_context(|| format!("failed to compile {}", file.display()))?;

            let output = output.unwrap_or_else(|| lock_file_path(&file));
            fs::write(&output, lock)
                .with_context(|| format!("failed to write {}", output.display()))?;
            log::info!("Wrote {}", output.display());
            println!("Compiled {} -> {}", file.display(), output.display());
        }
        Commands::Parse { expression, json } => {
            let tree = parse(strip_expression_wrapper(&expression))?;
            if json {
                println!("{}", tree.to_json()?);
            } else {
                let breaker = CompilerConfig::from_env()?.line_breaker();
                for line in breaker.break_expression(&tree.render()) {
                    println!("{}", line);
                }
            }
        }
        Commands::Command {
            names,
            events,
            other_events,
        } => {
            let config = CompilerConfig::from_env()?;
            let condition = build_event_aware_command_condition(&names, &events, other_events)?;
            for line in config.line_breaker().break_expression(&condition.render()) {
                println!("{}", line);
            }
        }
        Commands::Schema => {
            let schema = schemars::schema_for!(Frontmatter);
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
    }

    Ok(())
}
