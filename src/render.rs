//! Output of operation results.
//!
//! Tables, raw JSON and plain lines go to standard output; `error` goes to
//! standard error. Operations only ever talk to the [`Renderer`] trait so the
//! output can be captured in tests.

use serde::Serialize;
use tabled::builder::Builder;

use crate::{error, info, success, types::Row, warning};

/// How list and lookup results are displayed.
#[derive(clap::ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    #[default]
    Table,
    Json,
}

pub trait Renderer {
    fn table(&mut self, rows: &[Row]);

    fn text(&mut self, line: &str);

    fn json(&mut self, value: &serde_json::Value) {
        match serde_json::to_string_pretty(value) {
            Ok(json) => self.text(&json),
            Err(e) => self.error(&e.to_string()),
        }
    }

    fn info(&mut self, message: &str);

    fn success(&mut self, message: &str);

    fn warning(&mut self, message: &str);

    fn error(&mut self, message: &str);
}

/// Serializes `value` and hands it to [`Renderer::json`].
pub fn render_json<T: Serialize + ?Sized>(renderer: &mut dyn Renderer, value: &T) {
    match serde_json::to_value(value) {
        Ok(json) => renderer.json(&json),
        Err(e) => renderer.error(&format!("Cannot serialize response: {}", e)),
    }
}

/// Builds a `tabled` table from rows that may not share the same columns.
///
/// Column order follows the first appearance of each label; missing cells are
/// left blank.
pub fn build_table(rows: &[Row]) -> tabled::Table {
    let mut labels: Vec<&str> = Vec::new();
    for row in rows {
        for label in row.labels() {
            if !labels.contains(&label) {
                labels.push(label);
            }
        }
    }

    let mut builder = Builder::default();
    builder.push_record(labels.iter().map(|l| l.to_string()));
    for row in rows {
        builder.push_record(
            labels
                .iter()
                .map(|label| row.get(label).unwrap_or_default().to_string()),
        );
    }
    builder.build()
}

/// Renderer writing to the terminal with the crate's status macros.
#[derive(Debug, Default)]
pub struct TerminalRenderer;

impl Renderer for TerminalRenderer {
    fn table(&mut self, rows: &[Row]) {
        if rows.is_empty() {
            return;
        }
        println!("{}", build_table(rows));
    }

    fn text(&mut self, line: &str) {
        println!("{}", line);
    }

    fn info(&mut self, message: &str) {
        info!("{}", message);
    }

    fn success(&mut self, message: &str) {
        success!("{}", message);
    }

    fn warning(&mut self, message: &str) {
        warning!("{}", message);
    }

    fn error(&mut self, message: &str) {
        error!("{}", message);
    }
}
