//! Tabular data container shared by every stage.
//!
//! Stages hand each other CSV files on disk; in memory the data lives in a
//! [`DataFrame`] of named columns and JSON-typed cells. The CSV reader parses
//! cells as int, float, or bool where possible and falls back to strings.

use crate::error::PipelineError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A table of rows with named columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataFrame {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<serde_json::Value>>,
}

impl DataFrame {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// `(rows, columns)` shape, for logging.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.columns.len())
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Read a CSV file with a header line into a frame.
    pub fn read_csv(path: &Path) -> Result<Self, PipelineError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| PipelineError::dataset(format!("Failed to read {}: {e}", path.display())))?;
        let mut lines = content.lines();

        let columns: Vec<String> = split_line(
            lines.next().ok_or_else(|| {
                PipelineError::dataset(format!("Empty CSV file: {}", path.display()))
            })?,
        )
        .into_iter()
        .map(|s| s.trim().to_string())
        .collect();

        let mut rows = Vec::new();
        for line in lines {
            if line.trim().is_empty() {
                continue;
            }
            let row: Vec<serde_json::Value> =
                split_line(line).iter().map(|s| parse_cell(s)).collect();
            if row.len() != columns.len() {
                return Err(PipelineError::dataset(format!(
                    "Row with {} cells in a {}-column CSV: {}",
                    row.len(),
                    columns.len(),
                    path.display()
                )));
            }
            rows.push(row);
        }

        Ok(Self { columns, rows })
    }

    /// Write the frame as CSV. Goes through the atomic-write helper so a
    /// crashed stage never leaves a truncated dataset behind.
    pub fn write_csv(&self, path: &Path) -> Result<(), PipelineError> {
        let mut out = String::new();
        out.push_str(&self.columns.join(","));
        out.push('\n');
        for row in &self.rows {
            let rendered: Vec<String> = row.iter().map(render_cell).collect();
            out.push_str(&rendered.join(","));
            out.push('\n');
        }
        crate::artifacts::atomic_write(path, out.as_bytes())?;
        Ok(())
    }

    /// Build a frame from a list of JSON objects (the `/predict` body shape).
    /// Column order comes from the first record; missing keys become null.
    pub fn from_records(records: &[serde_json::Value]) -> Result<Self, PipelineError> {
        let first = records
            .first()
            .ok_or_else(|| PipelineError::dataset("Empty record list"))?;
        let obj = first
            .as_object()
            .ok_or_else(|| PipelineError::dataset("Records must be JSON objects"))?;
        let columns: Vec<String> = obj.keys().cloned().collect();

        let mut rows = Vec::with_capacity(records.len());
        for record in records {
            let obj = record
                .as_object()
                .ok_or_else(|| PipelineError::dataset("Records must be JSON objects"))?;
            let row: Vec<serde_json::Value> = columns
                .iter()
                .map(|c| obj.get(c).cloned().unwrap_or(serde_json::Value::Null))
                .collect();
            rows.push(row);
        }

        Ok(Self { columns, rows })
    }

    /// Remove a column and return its cells. Errors if the column is absent.
    pub fn drop_column(&mut self, name: &str) -> Result<Vec<serde_json::Value>, PipelineError> {
        let idx = self
            .column_index(name)
            .ok_or_else(|| PipelineError::dataset(format!("No such column: {name}")))?;
        self.columns.remove(idx);
        let mut cells = Vec::with_capacity(self.rows.len());
        for row in &mut self.rows {
            cells.push(row.remove(idx));
        }
        Ok(cells)
    }

    /// Extract the named columns as an all-f64 matrix (row major).
    pub fn numeric_matrix(&self, columns: &[String]) -> Result<Vec<Vec<f64>>, PipelineError> {
        let indices: Vec<usize> = columns
            .iter()
            .map(|c| {
                self.column_index(c)
                    .ok_or_else(|| PipelineError::dataset(format!("No such column: {c}")))
            })
            .collect::<Result<_, _>>()?;

        let mut matrix = Vec::with_capacity(self.rows.len());
        for (row_idx, row) in self.rows.iter().enumerate() {
            let mut values = Vec::with_capacity(indices.len());
            for (&idx, name) in indices.iter().zip(columns) {
                values.push(cell_to_f64(&row[idx]).ok_or_else(|| {
                    PipelineError::dataset(format!(
                        "Non-numeric value in column '{name}' at row {row_idx}"
                    ))
                })?);
            }
            matrix.push(values);
        }
        Ok(matrix)
    }
}

/// Split one CSV line on commas, honoring double-quoted cells with `""`
/// escapes. The inverse of the quoting done by [`render_cell`].
fn split_line(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => cells.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    cells.push(current);
    cells
}

fn parse_cell(raw: &str) -> serde_json::Value {
    let s = raw.trim();
    if s.is_empty() {
        return serde_json::Value::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return serde_json::Value::Number(i.into());
    }
    if let Ok(f) = s.parse::<f64>() {
        return serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or_else(|| serde_json::Value::String(s.to_string()));
    }
    if s == "true" || s == "false" {
        return serde_json::Value::Bool(s == "true");
    }
    serde_json::Value::String(s.to_string())
}

fn render_cell(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => {
            if s.contains(',') || s.contains('"') {
                format!("\"{}\"", s.replace('"', "\"\""))
            } else {
                s.clone()
            }
        }
        other => other.to_string(),
    }
}

fn cell_to_f64(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}
