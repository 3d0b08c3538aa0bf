use std::path::{Path, PathBuf};

use argbind_core::{
    ArgumentTable, CommandLine, CommandLineError, ExitReason, ParseOutcome, Registry, Syntax,
    TableArgs, UsageMode,
};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::{Level, debug, info};

/// CLI-specific syntax enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliSyntax {
    /// `--name:value`, `--name=value` and `-n value`.
    Mixed,
    /// `--name:value` and `-n:value` only.
    Inline,
    /// `--name=value` and `-n value`.
    NextToken,
}

impl From<CliSyntax> for Syntax {
    fn from(syntax: CliSyntax) -> Self {
        match syntax {
            CliSyntax::Mixed => Self::mixed(),
            CliSyntax::Inline => Self::inline(),
            CliSyntax::NextToken => Self::next_token(),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "argbind", version)]
#[command(about = "Check, render and exercise argument tables")]
struct Cli {
    /// Log parser decisions to stderr.
    #[arg(long, global = true)]
    debug: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the usage document of an argument table.
    Usage(UsageArgs),
    /// Report configuration errors in one or more argument tables.
    Check(CheckArgs),
    /// Bind an argument vector against a table and print the result as JSON.
    Parse(ParseArgs),
}

#[derive(Debug, Args)]
struct TableOptions {
    /// Argument table file (.json, .yaml or .yml).
    #[arg(long)]
    table: PathBuf,
    /// Program name for the synopsis (defaults to the table's, then its file stem).
    #[arg(long)]
    program: Option<String>,
    /// Value-attachment convention.
    #[arg(long, value_enum, default_value_t = CliSyntax::Mixed)]
    syntax: CliSyntax,
    /// Accept `/` as an option prefix.
    #[arg(long)]
    slash_prefix: bool,
}

#[derive(Debug, Args)]
struct UsageArgs {
    #[command(flatten)]
    options: TableOptions,
    /// Extra positional names appended to the synopsis.
    positionals: Vec<String>,
}

#[derive(Debug, Args)]
struct CheckArgs {
    /// Argument table files to check.
    #[arg(long = "table", required = true, num_args = 1..)]
    tables: Vec<PathBuf>,
}

#[derive(Debug, Args)]
struct ParseArgs {
    #[command(flatten)]
    options: TableOptions,
    /// Print usage to stdout and exit with status 2 on help or failure.
    #[arg(long)]
    automate: bool,
    /// Arguments to bind, after `--`.
    #[arg(last = true)]
    args: Vec<String>,
}

/// JSON shape printed by `parse`.
#[derive(Debug, Serialize)]
struct ParseReport {
    values: TableArgs,
    extra_arguments: Vec<String>,
    extra_options: Vec<String>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let result = match cli.command {
        Command::Usage(args) => run_usage(args),
        Command::Check(args) => run_check(args),
        Command::Parse(args) => run_parse(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(debug: bool) {
    let level = if debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.as_str())),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// A loaded table with its registry and the command line configured for it.
struct Loaded {
    registry: Registry<TableArgs>,
    command_line: CommandLine,
}

fn load(options: &TableOptions) -> Result<Loaded, String> {
    let table = ArgumentTable::load(&options.table)
        .map_err(|err| format!("Failed to load '{}': {err}", options.table.display()))?;
    let registry = table
        .registry()
        .map_err(|err| format!("Invalid table '{}': {err}", options.table.display()))?;

    let program = options
        .program
        .clone()
        .or(table.program)
        .unwrap_or_else(|| file_stem(&options.table));
    let mut syntax = Syntax::from(options.syntax);
    if options.slash_prefix {
        syntax = syntax.with_slash_prefix();
    }
    debug!(program = %program, arguments = registry.len(), "loaded table");

    Ok(Loaded {
        registry,
        command_line: CommandLine::new()
            .with_program_name(&program)
            .with_syntax(syntax),
    })
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "program".to_string())
}

fn run_usage(args: UsageArgs) -> Result<(), String> {
    let loaded = load(&args.options)?;
    let positionals: Vec<&str> = args.positionals.iter().map(String::as_str).collect();
    let doc = loaded.command_line.usage_doc(&loaded.registry, &positionals);
    print!("{doc}");
    Ok(())
}

fn run_check(args: CheckArgs) -> Result<(), String> {
    let mut failed = 0usize;
    for path in &args.tables {
        let checked = ArgumentTable::load(path)
            .map_err(|err| err.to_string())
            .and_then(|table| table.registry().map_err(|err| err.to_string()));
        match checked {
            Ok(registry) => println!("{}: ok ({} argument(s))", path.display(), registry.len()),
            Err(err) => {
                eprintln!("{}: {err}", path.display());
                failed += 1;
            }
        }
    }

    if failed > 0 {
        return Err(format!(
            "{failed} of {} table(s) failed the check",
            args.tables.len()
        ));
    }
    info!(tables = args.tables.len(), "all tables passed");
    Ok(())
}

fn run_parse(args: ParseArgs) -> Result<(), String> {
    let loaded = load(&args.options)?;
    let mode = UsageMode::from(args.automate);

    let outcome = loaded
        .command_line
        .parse_with(&loaded.registry, args.args, mode);

    let parsed = match outcome {
        Ok(ParseOutcome::Bound(parsed)) => parsed,
        Ok(ParseOutcome::Exit(exit)) => {
            if let ExitReason::Failed(err) = &exit.reason {
                debug!(error = %err, "exiting with usage");
            }
            print!("{}", exit.usage);
            std::process::exit(exit.status());
        }
        Err(CommandLineError::HelpRequested { usage }) => {
            print!("{usage}");
            return Ok(());
        }
        Err(err) => return Err(err.to_string()),
    };

    let report = ParseReport {
        values: parsed.value,
        extra_arguments: parsed.extra_arguments,
        extra_options: parsed.extra_options,
    };
    let json = serde_json::to_string_pretty(&report)
        .map_err(|err| format!("Failed to serialize parse result: {err}"))?;
    println!("{json}");
    Ok(())
}
