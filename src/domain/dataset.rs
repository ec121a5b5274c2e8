// Tabular dataset domain model
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;

/// Cell contents treated as missing, in addition to the empty string.
const MISSING_TOKENS: [&str; 12] = [
    "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "null", "NULL", "None", "#N/A", "<NA>", "-nan",
];

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

// Ambiguous day/month orders read month-first.
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%m.%d.%Y"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Number,
    Boolean,
    Date,
    Text,
}

impl ColumnKind {
    /// Infer the type shared by every present cell.
    /// A column with no present cells is numeric, like an all-NaN float column.
    fn infer(cells: &[Option<String>]) -> Self {
        let mut present = cells.iter().flatten().peekable();
        if present.peek().is_none() {
            return ColumnKind::Number;
        }

        let present: Vec<&String> = present.collect();
        if present.iter().all(|c| parse_number(c).is_some()) {
            ColumnKind::Number
        } else if present.iter().all(|c| parse_bool(c).is_some()) {
            ColumnKind::Boolean
        } else if present.iter().all(|c| parse_timestamp(c).is_some()) {
            ColumnKind::Date
        } else {
            ColumnKind::Text
        }
    }
}

#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
    cells: Vec<Option<String>>,
}

impl Column {
    pub fn new(name: String, cells: Vec<Option<String>>) -> Self {
        let cells: Vec<Option<String>> = cells
            .into_iter()
            .map(|c| c.filter(|v| !is_missing(v)))
            .collect();
        let kind = ColumnKind::infer(&cells);
        Self { name, kind, cells }
    }

    /// Booleans count as numeric and read as `1.0` / `0.0`.
    pub fn is_numeric(&self) -> bool {
        matches!(self.kind, ColumnKind::Number | ColumnKind::Boolean)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn text(&self, row: usize) -> Option<&str> {
        self.cells.get(row).and_then(|c| c.as_deref())
    }

    pub fn number(&self, row: usize) -> Option<f64> {
        let text = self.text(row)?;
        match self.kind {
            ColumnKind::Boolean => parse_bool(text).map(|b| if b { 1.0 } else { 0.0 }),
            _ => parse_number(text),
        }
    }

    pub fn timestamp(&self, row: usize) -> Option<NaiveDateTime> {
        self.text(row).and_then(parse_timestamp)
    }

    pub fn texts(&self) -> impl Iterator<Item = Option<&str>> + '_ {
        self.cells.iter().map(|c| c.as_deref())
    }

    fn renamed(&self, name: String) -> Self {
        Self {
            name,
            kind: self.kind,
            cells: self.cells.clone(),
        }
    }

    fn truncated(&self, rows: usize) -> Self {
        Self {
            name: self.name.clone(),
            kind: self.kind,
            cells: self.cells.iter().take(rows).cloned().collect(),
        }
    }
}

/// An ordered set of named columns of equal length.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    columns: Vec<Column>,
    row_count: usize,
}

impl Dataset {
    /// Build a dataset from a header and raw rows. Short rows are padded with
    /// missing cells.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let row_count = rows.len();
        let mut cells: Vec<Vec<Option<String>>> = vec![Vec::with_capacity(row_count); headers.len()];

        for row in rows {
            for (idx, column) in cells.iter_mut().enumerate() {
                column.push(row.get(idx).filter(|v| !v.is_empty()).cloned());
            }
        }

        let columns = headers
            .into_iter()
            .zip(cells)
            .map(|(name, cells)| Column::new(name, cells))
            .collect();

        Self { columns, row_count }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0 || self.columns.is_empty()
    }

    /// Working copy with lower-cased column names. Cell values are untouched.
    pub fn with_lowercase_headers(&self) -> Self {
        Self {
            columns: self
                .columns
                .iter()
                .map(|c| c.renamed(c.name.to_lowercase()))
                .collect(),
            row_count: self.row_count,
        }
    }

    pub fn head(&self, rows: usize) -> Self {
        Self {
            columns: self.columns.iter().map(|c| c.truncated(rows)).collect(),
            row_count: self.row_count.min(rows),
        }
    }
}

fn is_missing(value: &str) -> bool {
    value.is_empty() || MISSING_TOKENS.contains(&value)
}

pub fn parse_number(value: &str) -> Option<f64> {
    let value = value.trim();
    // Rust accepts "inf"/"infinity" spellings that a CSV number column would not.
    if value.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') {
        return None;
    }
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Lenient timestamp coercion. Month-only values land on the first of the month.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }

    for format in ["%Y-%m-%d", "%Y/%m/%d"] {
        let first_of_month = if format.contains('-') {
            format!("{value}-01")
        } else {
            format!("{value}/01")
        };
        if let Ok(date) = NaiveDate::parse_from_str(&first_of_month, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }

    None
}
