//! # azurerm_windows_web_app_slot tooling
//!
//! '''bash
//! cargo run --bin slotgen -- --help
//! '''

use azurerm_webapp_slot::config::BindingOptions;
use azurerm_webapp_slot::registry::{export_resource, generate_serde};
use azurerm_webapp_slot::resource::synthesize_body;
use azurerm_webapp_slot::schema::{embedded_schema, read_tf_schema_from_file};
use serde_json::Value;
use std::error::Error;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use structopt::StructOpt;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "slotgen",
    about = "Generate and synthesize azurerm_windows_web_app_slot bindings"
)]
struct Options {
    /// Log debug events (overridden by RUST_LOG).
    #[structopt(short, long)]
    verbose: bool,

    #[structopt(subcommand)]
    command: Command,
}

#[derive(Debug, StructOpt)]
enum Command {
    /// Print Serde containers for a resource of a provider schema.
    Emit {
        /// Path to the JSON-encoded terraform schema; the embedded azurerm schema
        /// when omitted.
        #[structopt(long, parse(from_os_str))]
        schema: Option<PathBuf>,

        #[structopt(long, default_value = "azurerm_windows_web_app_slot")]
        resource: String,

        #[structopt(long, default_value = "bindings")]
        module: String,
    },
    /// Declare a slot from a JSON resource body and print its Terraform JSON.
    Synth {
        #[structopt(parse(from_os_str))]
        input: PathBuf,

        /// Logical id of the resource.
        #[structopt(long, default_value = "slot")]
        id: String,

        #[structopt(long)]
        provider_alias: Option<String>,

        /// Set a top-level attribute after declaration, e.g. `--set https_only=true`.
        /// Values are read as JSON; anything else is taken as a string.
        #[structopt(long = "set", parse(try_from_str = parse_assignment))]
        assignments: Vec<(String, Value)>,

        /// Skip runtime type checks of `--set` values.
        #[structopt(long)]
        no_type_check: bool,
    },
}

fn parse_assignment(s: &str) -> Result<(String, Value), String> {
    let (name, raw) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got `{}`", s))?;
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_owned()));
    Ok((name.to_owned(), value))
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let options = Options::from_args();
    init_logging(options.verbose);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match options.command {
        Command::Emit {
            schema,
            resource,
            module,
        } => {
            let schema = match schema {
                Some(path) => read_tf_schema_from_file(path)?,
                None => embedded_schema()?,
            };
            let item = schema
                .resource(&resource)
                .ok_or_else(|| format!("resource `{}` is not part of the schema", resource))?;
            let (registry, comments) = export_resource(&module, &resource, item)?;
            info!(resource = %resource, containers = registry.len(), "emitting bindings");
            generate_serde(&module, &mut out, &registry, comments)?;
        }
        Command::Synth {
            input,
            id,
            provider_alias,
            assignments,
            no_type_check,
        } => {
            let body: Value = serde_json::from_str(&fs::read_to_string(&input)?)?;
            let options = BindingOptions::new()
                .with_type_check(!no_type_check)
                .with_provider_alias(provider_alias);
            let doc = synthesize_body(body, &id, options, &assignments)?;
            writeln!(out, "{}", serde_json::to_string_pretty(&doc)?)?;
        }
    }
    Ok(())
}
