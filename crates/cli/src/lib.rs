pub mod commands;
pub mod util;

use clap::{Parser, Subcommand, ValueEnum};
use commands::{compile, functions};
use tracing_subscriber::EnvFilter;
use util::CliResult;

#[derive(Parser, Debug)]
#[command(name = "xsltc", version, about = "Translate node-name calls to JVM bytecode")]
pub struct Cli {
    /// Log translation steps at debug level.
    #[arg(long, short, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile one call and print its instructions.
    Compile(compile::CompileArgs),
    /// List the supported functions and the runtime operations they call.
    Functions(functions::FunctionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

pub fn run() -> CliResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let output = execute(&cli.command)?;
    println!("{output}");
    Ok(())
}

pub fn execute(command: &Command) -> CliResult<String> {
    match command {
        Command::Compile(args) => compile::run(args),
        Command::Functions(args) => functions::run(args),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    // a subscriber may already be installed when embedded
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn parses_compile_with_variables() {
        let cli = Cli::try_parse_from([
            "xsltc", "compile", "name($n)", "--var", "n=node", "--format", "json", "-v",
        ])
        .expect("parse");
        assert!(cli.verbose);
        let Command::Compile(args) = cli.command else {
            panic!("expected compile");
        };
        assert_eq!(args.call, "name($n)");
        assert_eq!(args.variables.len(), 1);
        assert_eq!(args.format, OutputFormat::Json);
    }

    #[rstest]
    fn rejects_malformed_variable() {
        assert!(Cli::try_parse_from(["xsltc", "compile", "name()", "--var", "n"]).is_err());
        assert!(Cli::try_parse_from(["xsltc", "compile", "name()", "--var", "n=tree"]).is_err());
    }

    #[rstest]
    fn execute_functions_lists_family() {
        let cli = Cli::try_parse_from(["xsltc", "functions"]).expect("parse");
        let out = execute(&cli.command).expect("run");
        assert!(out.contains("local-name"));
    }
}
