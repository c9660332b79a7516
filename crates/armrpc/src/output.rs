use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde_json::Value;

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

/// Print a single record. Table form renders FIELD/VALUE pairs.
pub fn print_record(format: OutputFormat, value: &impl serde::Serialize) {
    let value = serde_json::to_value(value).unwrap_or(Value::Null);
    match format {
        OutputFormat::Json => println!("{value}"),
        OutputFormat::Pretty => {
            println!(
                "{}",
                serde_json::to_string_pretty(&value).unwrap_or_else(|_| "null".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = new_table(vec!["FIELD", "VALUE"]);
            match &value {
                Value::Object(map) => {
                    for (key, field) in map {
                        table.add_row(vec![key.clone(), cell_text(field)]);
                    }
                }
                other => {
                    table.add_row(vec!["value".to_string(), cell_text(other)]);
                }
            }
            println!("{table}");
        }
    }
}

/// Print a list of records with explicit table columns.
pub fn print_rows(
    format: OutputFormat,
    headers: Vec<&str>,
    rows: Vec<Vec<String>>,
    value: &impl serde::Serialize,
) {
    match format {
        OutputFormat::Json | OutputFormat::Pretty => print_record(format, value),
        OutputFormat::Table => {
            let mut table = new_table(headers);
            for row in rows {
                table.add_row(row);
            }
            println!("{table}");
        }
    }
}

fn new_table(headers: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers);
    table
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
