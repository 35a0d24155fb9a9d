use std::collections::BTreeMap;
use std::io::{IsTerminal, Write};

use base64::{engine::general_purpose::STANDARD, Engine};
use bytes::Bytes;
use ceprims_binary::Headers;
use ceprims_event::{format_time, Event};
use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
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

/// Print a structured event document.
pub fn print_document(document: &[u8], format: OutputFormat) {
    match format {
        OutputFormat::Raw => print_raw(document),
        OutputFormat::Json => {
            print_raw(document);
            println!();
        }
        OutputFormat::Pretty | OutputFormat::Table => {
            let pretty = serde_json::from_slice::<serde_json::Value>(document)
                .ok()
                .and_then(|value| serde_json::to_string_pretty(&value).ok());
            match pretty {
                Some(text) => println!("{text}"),
                None => print_raw(document),
            }
        }
    }
}

#[derive(Serialize)]
struct BinaryOutput<'a> {
    schema_id: &'a str,
    headers: BTreeMap<&'a str, String>,
    body: Option<String>,
    body_base64: Option<String>,
}

/// Print a binary-mode record: headers plus body.
pub fn print_binary(headers: &Headers, body: Option<&Bytes>, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let (text, encoded) = split_body(body);
            let out = BinaryOutput {
                schema_id: "https://schemas.3leaps.dev/ceprims/cli/v1/binary-record.schema.json",
                headers: headers
                    .iter()
                    .map(|(name, value)| (name, String::from_utf8_lossy(value).into_owned()))
                    .collect(),
                body: text,
                body_base64: encoded,
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["HEADER", "VALUE"]);
            for (name, value) in headers.iter() {
                table.add_row(vec![name.to_string(), payload_preview(value)]);
            }
            table.add_row(vec![
                "(body)".to_string(),
                body.map(|b| payload_preview(b))
                    .unwrap_or_else(|| "<none>".to_string()),
            ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for (name, value) in headers.iter() {
                println!("{name}: {}", payload_preview(value));
            }
            println!();
            if let Some(body) = body {
                println!("{}", payload_preview(body));
            }
        }
        OutputFormat::Raw => {
            if let Some(body) = body {
                print_raw(body);
            }
        }
    }
}

/// Print a decoded event. `document` is its structured JSON rendering.
pub fn print_event(event: &Event, document: &[u8], format: OutputFormat) {
    match format {
        OutputFormat::Json => print_document(document, OutputFormat::Json),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["ATTRIBUTE", "KIND", "VALUE"]);
            for (name, kind, value) in attribute_rows(event) {
                table.add_row(vec![name, kind.to_string(), value]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for (name, _, value) in attribute_rows(event) {
                println!("{name}={value}");
            }
        }
        OutputFormat::Raw => {
            if let Some(data) = event.data() {
                print_raw(data);
            }
        }
    }
}

#[derive(Serialize)]
struct FormatsOutput<'a> {
    schema_id: &'a str,
    content_types: &'a [String],
}

pub fn print_formats(content_types: &[String], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = FormatsOutput {
                schema_id: "https://schemas.3leaps.dev/ceprims/cli/v1/formats.schema.json",
                content_types,
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["CONTENT TYPE"]);
            for content_type in content_types {
                table.add_row(vec![content_type.clone()]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty | OutputFormat::Raw => {
            for content_type in content_types {
                println!("{content_type}");
            }
        }
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

fn attribute_rows(event: &Event) -> Vec<(String, &'static str, String)> {
    let mut rows = vec![
        ("specversion".to_string(), "string", event.spec_version().to_string()),
        ("id".to_string(), "string", event.id().to_string()),
        ("source".to_string(), "string", event.source().to_string()),
        ("type".to_string(), "string", event.ty().to_string()),
    ];
    if let Some(subject) = event.subject() {
        rows.push(("subject".to_string(), "string", subject.to_string()));
    }
    if let Some(time) = event.time() {
        rows.push(("time".to_string(), "timestamp", format_time(time)));
    }
    if let Some(content_type) = event.data_content_type() {
        rows.push(("datacontenttype".to_string(), "string", content_type.to_string()));
    }
    if let Some(schema) = event.data_schema() {
        rows.push(("dataschema".to_string(), "string", schema.to_string()));
    }
    for (name, value) in event.extensions() {
        rows.push((name.clone(), value.kind(), value.to_string()));
    }
    if let Some(data) = event.data() {
        rows.push(("data".to_string(), "bytes", payload_preview(data)));
    }
    rows
}

fn split_body(body: Option<&Bytes>) -> (Option<String>, Option<String>) {
    match body.map(|b| std::str::from_utf8(b)) {
        Some(Ok(text)) => (Some(text.to_string()), None),
        Some(Err(_)) => (None, body.map(|b| STANDARD.encode(b))),
        None => (None, None),
    }
}

fn payload_preview(payload: &[u8]) -> String {
    match std::str::from_utf8(payload) {
        Ok(text) => text.to_string(),
        Err(_) => format!("<binary {} bytes>", payload.len()),
    }
}
