// UI layer: tables, status lines and prompts. Nothing here talks to the
// network; the `app` module hands records in and gets text back.

use crate::api::FileRecord;
use crossterm::style::Stylize;
use dialoguer::{Input, Password};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use std::io::{self, IsTerminal, Write};
use std::time::Duration;
use tabled::settings::Style;
use tabled::{Table, Tabled};

pub const NOT_AVAILABLE: &str = "N/A";

pub const BANNER: &str = r"  _____ _             _             _____ _      _____
 |  __ (_)           | |           / ____| |    |_   _|
 | |__) | _ __   __ _| |_ __ _    | |    | |      | |
 |  ___/ | '_ \ / _` | __/ _` |   | |    | |      | |
 | |   | | | | | (_| | || (_| |   | |____| |____ _| |_
 |_|   |_|_| |_|\__,_|\__\__,_|    \_____|______|_____|
";

/// One row of the `--listfiles` table.
#[derive(Tabled, Debug, Clone, PartialEq)]
pub struct FileRow {
    #[tabled(rename = "ID", display_with = "display_or_empty")]
    pub id: Option<String>,
    #[tabled(rename = "Name", display_with = "display_or_empty")]
    pub name: Option<String>,
    #[tabled(rename = "CID", display_with = "display_or_empty")]
    pub cid: Option<String>,
    #[tabled(rename = "Group ID", display_with = "display_or_empty")]
    pub group_id: Option<String>,
}

impl From<&FileRecord> for FileRow {
    fn from(record: &FileRecord) -> Self {
        FileRow {
            id: record.id.clone(),
            name: record.name.clone(),
            cid: record.cid.clone(),
            group_id: record.group_id.clone(),
        }
    }
}

/// One field/value row of the `--getfile` table.
#[derive(Tabled, Debug, Clone, PartialEq)]
pub struct DetailRow {
    #[tabled(rename = "Field")]
    pub field: &'static str,
    #[tabled(rename = "Value")]
    pub value: String,
}

fn display_or_empty(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn or_na(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Project records onto the list columns, keeping the service's order.
pub fn file_rows(records: &[FileRecord]) -> Vec<FileRow> {
    records.iter().map(FileRow::from).collect()
}

pub fn render_file_list(records: &[FileRecord]) -> String {
    Table::new(file_rows(records))
        .with(Style::ascii())
        .to_string()
}

/// Fixed field order; the Keyvalues row only appears when there is
/// metadata to show.
pub fn detail_rows(record: &FileRecord) -> Vec<DetailRow> {
    let mut rows = vec![
        DetailRow { field: "ID", value: or_na(&record.id) },
        DetailRow { field: "Name", value: or_na(&record.name) },
        DetailRow { field: "CID", value: or_na(&record.cid) },
        DetailRow { field: "Size (bytes)", value: or_na(&record.size) },
        DetailRow { field: "Number of Files", value: or_na(&record.number_of_files) },
        DetailRow { field: "MIME Type", value: or_na(&record.mime_type) },
        DetailRow { field: "Group ID", value: or_na(&record.group_id) },
        DetailRow { field: "Created At", value: or_na(&record.created_at) },
    ];

    if let Some(keyvalues) = record.keyvalues.as_ref().filter(|kv| !kv.is_empty()) {
        let value = keyvalues
            .iter()
            .map(|(k, v)| match v {
                Value::String(s) => format!("{}: {}", k, s),
                other => format!("{}: {}", k, other),
            })
            .collect::<Vec<_>>()
            .join(", ");
        rows.push(DetailRow { field: "Keyvalues", value });
    }
    rows
}

pub fn render_file_detail(record: &FileRecord) -> String {
    Table::new(detail_rows(record))
        .with(Style::ascii())
        .to_string()
}

/// Print a success line on stdout, green when stdout is a terminal.
pub fn success(msg: &str) {
    if io::stdout().is_terminal() {
        println!("{}", msg.green());
    } else {
        println!("{}", msg);
    }
}

/// Print an error line on stderr, red when stderr is a terminal.
pub fn error(msg: &str) {
    let line = format!("Error: {}", msg);
    if io::stderr().is_terminal() {
        eprintln!("{}", line.red());
    } else {
        eprintln!("{}", line);
    }
}

/// Progress notice shown while a request is in flight: a spinner on a
/// terminal, a plain line on stderr otherwise.
pub fn spinner(msg: &str) -> ProgressBar {
    progress(msg, io::stderr().is_terminal(), &mut io::stderr())
}

fn progress<W: Write>(msg: &str, interactive: bool, out: &mut W) -> ProgressBar {
    if !interactive {
        let _ = writeln!(out, "{}", msg);
        return ProgressBar::hidden();
    }
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(msg.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Source of interactive answers. The terminal implementation uses
/// `dialoguer`; tests drive the flows with canned answers.
pub trait Prompter {
    /// Read a value without echoing it.
    fn secret(&self, prompt: &str) -> io::Result<String>;
    /// Read one line of free text; may be empty.
    fn line(&self, prompt: &str) -> io::Result<String>;
}

pub struct TermPrompter;

impl Prompter for TermPrompter {
    fn secret(&self, prompt: &str) -> io::Result<String> {
        Password::new().with_prompt(prompt).interact()
    }

    fn line(&self, prompt: &str) -> io::Result<String> {
        Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
    }
}

/// Only "y" and "yes" (any case) count as agreement.
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
