//! Multi-axis Signal Table

use crate::error::SignalError;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Per-column storage. A column that fails to parse is kept so that only
/// requests for that axis fail.
#[derive(Debug, Clone)]
enum ColumnData {
    Numeric(Vec<f64>),
    Invalid { row: usize, value: String },
}

#[derive(Debug, Clone)]
struct Column {
    name: String,
    data: ColumnData,
}

/// Rectangular recording: one column per axis, one row per sample.
///
/// Read-only once loaded.
#[derive(Debug, Clone)]
pub struct SignalTable {
    columns: Vec<Column>,
    rows: usize,
}

impl SignalTable {
    /// Load a CSV recording with a header row
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SignalError> {
        let path = path.as_ref();
        info!("Loading recording from {}", path.display());
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Load CSV data from any reader
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, SignalError> {
        let mut reader = csv::Reader::from_reader(reader);
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        if headers.is_empty() || headers.iter().all(String::is_empty) {
            return Err(SignalError::MissingHeader);
        }

        let mut data: Vec<ColumnData> = vec![ColumnData::Numeric(Vec::new()); headers.len()];
        let mut rows = 0;

        for (row, record) in reader.records().enumerate() {
            let record = record?;
            for (col, field) in record.iter().enumerate() {
                let Some(ColumnData::Numeric(values)) = data.get_mut(col) else {
                    continue;
                };
                match field.trim().parse::<f64>() {
                    Ok(v) => values.push(v),
                    Err(_) => {
                        debug!("Column '{}' not numeric at row {}", headers[col], row);
                        data[col] = ColumnData::Invalid {
                            row,
                            value: field.to_string(),
                        };
                    }
                }
            }
            rows += 1;
        }

        let columns = headers
            .into_iter()
            .zip(data)
            .map(|(name, data)| Column { name, data })
            .collect::<Vec<_>>();

        info!("Loaded recording: {} columns x {} rows", columns.len(), rows);
        Ok(Self { columns, rows })
    }

    /// Build a table from in-memory columns
    pub fn from_columns<S: Into<String>>(columns: Vec<(S, Vec<f64>)>) -> Self {
        let rows = columns.iter().map(|(_, v)| v.len()).max().unwrap_or(0);
        let columns = columns
            .into_iter()
            .map(|(name, values)| Column {
                name: name.into(),
                data: ColumnData::Numeric(values),
            })
            .collect();
        Self { columns, rows }
    }

    /// Column labels in file order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Number of sample rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Whether `axis` is a column of this table
    pub fn has_column(&self, axis: &str) -> bool {
        self.columns.iter().any(|c| c.name == axis)
    }

    /// Samples of one column
    pub fn column(&self, axis: &str) -> Result<&[f64], SignalError> {
        let column = self
            .columns
            .iter()
            .find(|c| c.name == axis)
            .ok_or_else(|| SignalError::AxisNotFound(axis.to_string()))?;

        match &column.data {
            ColumnData::Numeric(values) => Ok(values),
            ColumnData::Invalid { row, value } => Err(SignalError::NonNumeric {
                axis: axis.to_string(),
                row: *row,
                value: value.clone(),
            }),
        }
    }
}
