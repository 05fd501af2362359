//! Output formatting helpers for CLI results.

use clap::ValueEnum;
use comfy_table::{ContentArrangement, Table};
use packstone_core::stack::ResolvedStack;

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Two-column field/value table
    Table,
    /// Pretty-printed JSON
    Json,
    /// YAML document
    Yaml,
}

/// Create a styled table with the given headers.
pub fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.load_preset(comfy_table::presets::NOTHING);
    table.set_header(headers);
    table
}

/// Render a resolved stack in the requested format.
pub fn render_resolved_stack(
    stack: &ResolvedStack,
    format: OutputFormat,
) -> Result<String, Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(stack)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(stack)?),
        OutputFormat::Table => Ok(resolved_stack_table(stack)),
    }
}

fn resolved_stack_table(stack: &ResolvedStack) -> String {
    let mut table = new_table(&["FIELD", "VALUE"]);
    table.add_row(["Stack", &stack.id]);
    table.add_row(["Build image", &stack.build_image.image]);
    table.add_row(["Build digest", &stack.build_image.latest_image]);
    table.add_row(["Run image", &stack.run_image.image]);
    table.add_row(["Run digest", &stack.run_image.latest_image]);
    table.add_row(["Mixins", &stack.mixins.join(", ")]);
    table.add_row(["User ID", &stack.user_id.to_string()]);
    table.add_row(["Group ID", &stack.group_id.to_string()]);
    table.to_string()
}
