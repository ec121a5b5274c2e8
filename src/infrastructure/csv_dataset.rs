// CSV decoding into datasets
use crate::domain::dataset::Dataset;
use csv::StringRecord;
use std::collections::HashMap;

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("file has no header row")]
    MissingHeader,

    #[error("line {line}: expected {expected} fields, found {found}")]
    RaggedRow {
        line: usize,
        expected: usize,
        found: usize,
    },
}

/// Decode comma-separated bytes with a header row.
///
/// Field values are trimmed, header names are kept as written. Rows shorter
/// than the header are padded with missing cells; longer rows are rejected.
pub fn decode_dataset(bytes: &[u8]) -> Result<Dataset, DatasetError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Fields)
        .from_reader(bytes);

    let headers = reader.headers()?.clone();
    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(DatasetError::MissingHeader);
    }
    let headers = dedupe_headers(&headers);

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result?;
        // records() starts after the header, CSV lines are 1-based.
        let line = idx + 2;

        if record.len() > headers.len() {
            return Err(DatasetError::RaggedRow {
                line,
                expected: headers.len(),
                found: record.len(),
            });
        }
        // A blank line reads as one empty field.
        if record.iter().all(|f| f.is_empty()) {
            continue;
        }

        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(Dataset::from_rows(headers, rows))
}

/// Strip a UTF-8 BOM and suffix repeated names with `.1`, `.2`, ...
fn dedupe_headers(headers: &StringRecord) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();

    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let name = if idx == 0 {
                name.trim_start_matches('\u{feff}')
            } else {
                name
            };

            let count = seen.entry(name.to_string()).or_insert(0);
            let unique = if *count == 0 {
                name.to_string()
            } else {
                format!("{}.{}", name, count)
            };
            *count += 1;
            unique
        })
        .collect()
}
