mod commands;
mod logging;

use std::any::Any;
use std::fmt::Write as _;

use argbind_core::{CommandInput, CommandSchema, SchemaSet, initialize_command, parse_command_input};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::debug;

use crate::commands::registry;

const PACKAGE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Output format for inspection commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
    Text,
}

#[derive(Debug, Parser)]
#[command(name = "argbind", version)]
#[command(about = "Tokenize, inspect and run declaratively bound commands")]
struct Cli {
    /// Enable debug logging.
    #[arg(long, global = true)]
    verbose: bool,
    /// Log filter directives (e.g. `argbind_core=trace`).
    #[arg(long, global = true, env = "ARGBIND_LOG")]
    log: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse tokens and print the structured input.
    Tokenize(TokenizeArgs),
    /// List the demo command schemas.
    Schemas(SchemasArgs),
    /// Resolve, bind and execute a demo command.
    Run(RunArgs),
}

#[derive(Debug, Args)]
struct TokenizeArgs {
    /// Output format.
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
    /// Tokens to parse, after `--`.
    #[arg(last = true)]
    tokens: Vec<String>,
}

#[derive(Debug, Args)]
struct SchemasArgs {
    /// Output format.
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Command tokens, after `--`.
    #[arg(last = true)]
    tokens: Vec<String>,
}

fn main() {
    let cli = Cli::parse();

    let debug_directive = match &cli.command {
        Command::Run(args) => parse_command_input(&args.tokens).is_debug_directive_specified(),
        _ => false,
    };
    logging::init_stderr_logging(cli.log.as_deref(), cli.verbose || debug_directive);

    let result = match cli.command {
        Command::Tokenize(args) => run_tokenize(args),
        Command::Schemas(args) => run_schemas(args),
        Command::Run(args) => run_command(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run_tokenize(args: TokenizeArgs) -> Result<(), String> {
    let input = parse_command_input(&args.tokens);
    debug!(tokens = args.tokens.len(), options = input.options.len(), "Tokenized input");
    let output = match args.format {
        OutputFormat::Text => format_input_text(&input),
        format => serialize(&input, format)?,
    };
    print!("{output}");
    Ok(())
}

fn run_schemas(args: SchemasArgs) -> Result<(), String> {
    let registry = registry().map_err(|err| format!("Invalid demo schemas: {err}"))?;
    let output = match args.format {
        OutputFormat::Text => format_schemas_text(registry.schemas()),
        format => serialize(registry.schemas(), format)?,
    };
    print!("{output}");
    Ok(())
}

fn run_command(args: RunArgs) -> Result<(), String> {
    let registry = registry().map_err(|err| format!("Invalid demo schemas: {err}"))?;
    let input = parse_command_input(&args.tokens);

    if input.is_preview_directive_specified() {
        println!("{input}");
        return Ok(());
    }

    if input.is_version_option_specified() {
        println!("{PACKAGE_VERSION}");
        return Ok(());
    }

    let schema = registry
        .schemas()
        .resolve(&input.unbound_arguments)
        .ok_or_else(|| format!("No command matches '{}'", input.unbound_arguments.join(" ")))?;

    if input.is_help_option_specified() {
        print!("{}", format_help(schema));
        return Ok(());
    }

    let mut command = registry
        .instantiate(schema)
        .ok_or_else(|| format!("No constructor registered for '{}'", schema.type_name))?;
    let target: &mut dyn Any = &mut *command;
    initialize_command(target, schema, &input).map_err(|err| err.to_string())?;

    let output = command.execute()?;
    println!("{output}");
    Ok(())
}

fn serialize<T: Serialize + ?Sized>(value: &T, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)
            .map(|json| format!("{json}\n"))
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(value).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        OutputFormat::Text => Err("text output is not serialized".to_string()),
    }
}

fn format_input_text(input: &CommandInput) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Unbound: {}", input.unbound_arguments.join(" "));
    let _ = writeln!(out, "Directives: {}", input.directives.join(" "));
    let _ = writeln!(out, "Options:");
    for option in &input.options {
        let _ = writeln!(out, "  {option}");
    }
    out
}

fn format_schemas_text(schemas: &SchemaSet) -> String {
    let mut out = String::new();
    for schema in schemas {
        out.push_str(&format_help(schema));
        out.push('\n');
    }
    out
}

fn display_name(schema: &CommandSchema) -> &str {
    if schema.is_default() {
        "(default)"
    } else {
        &schema.name
    }
}

fn format_help(schema: &CommandSchema) -> String {
    let mut out = String::new();
    match &schema.description {
        Some(description) => {
            let _ = writeln!(out, "{} - {description}", display_name(schema));
        }
        None => {
            let _ = writeln!(out, "{}", display_name(schema));
        }
    }

    if !schema.arguments.is_empty() {
        let _ = writeln!(out, "Arguments:");
        for argument in schema.sorted_arguments() {
            let _ = writeln!(
                out,
                "  {:<20} {}",
                argument.to_string(),
                argument.description.as_deref().unwrap_or_default()
            );
        }
    }

    if !schema.options.is_empty() {
        let _ = writeln!(out, "Options:");
        for option in &schema.options {
            let _ = writeln!(
                out,
                "  {:<20} {}",
                option.to_string(),
                option.description.as_deref().unwrap_or_default()
            );
        }
    }
    out
}
