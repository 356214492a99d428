//! Schema command: JSON Schema for `analyze --json` output.

use clap::Args;
use readgate_core::Report;
use tracing::{debug, instrument};

/// Arguments for the `schema` subcommand.
#[derive(Args, Debug, Default)]
pub struct SchemaArgs {}

/// Print the JSON Schema describing the analysis report.
#[instrument(name = "cmd_schema", skip_all)]
pub fn cmd_schema(_args: SchemaArgs) -> anyhow::Result<()> {
    debug!("executing schema command");
    println!("{}", render()?);
    Ok(())
}

fn render() -> serde_json::Result<String> {
    serde_json::to_string_pretty(&schemars::schema_for!(Report))
}
