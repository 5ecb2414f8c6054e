//! CSV loading for labeled transactions.
//!
//! The reader is strict: the header must name exactly the feature columns and
//! the label column, every feature must be a finite number, and the label must
//! be binary. Any violation is returned as a [`DataError`]; nothing is skipped.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, info};

use super::schema::{ModelInput, FEATURE_COLUMNS, LABEL_COLUMN, N_FEATURES};
use super::DataError;

/// Text-file options for the transaction CSV.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvOptions {
    /// First line is a header row. Without a header, columns are positional:
    /// the feature columns in order, then the label.
    pub has_header: bool,
    /// Field separator.
    pub separator: u8,
    /// Fields may be wrapped in double quotes.
    pub allow_quoting: bool,
    /// Sparse (`index:value`) rows. Not supported; must stay `false`.
    pub allow_sparse: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            has_header: true,
            separator: b',',
            allow_quoting: true,
            allow_sparse: false,
        }
    }
}

/// Load all transactions from a CSV file.
///
/// # Errors
///
/// Returns [`DataError`] if the file cannot be opened, the header does not
/// match the transaction schema, or any row is malformed.
pub fn load_csv(path: impl AsRef<Path>, options: &CsvOptions) -> Result<Vec<ModelInput>, DataError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| DataError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let rows = read_csv(file, options)?;
    info!(path = %path.display(), rows = rows.len(), "loaded transactions");
    Ok(rows)
}

/// Read transactions from any CSV source.
pub fn read_csv<R: Read>(reader: R, options: &CsvOptions) -> Result<Vec<ModelInput>, DataError> {
    if options.allow_sparse {
        return Err(DataError::Schema("sparse encoding is not supported".into()));
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(options.has_header)
        .delimiter(options.separator)
        .quoting(options.allow_quoting)
        .flexible(false)
        .from_reader(reader);

    let layout = if options.has_header {
        ColumnLayout::from_header(reader.headers()?)?
    } else {
        ColumnLayout::positional()
    };
    debug!(?layout, "resolved CSV column layout");

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record?;
        let row = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(idx + 1);
        rows.push(layout.parse_record(&record, row)?);
    }

    if rows.is_empty() {
        return Err(DataError::Empty);
    }
    Ok(rows)
}

// =============================================================================
// Column layout
// =============================================================================

/// Field positions of each schema column inside a CSV record.
#[derive(Debug, Clone)]
struct ColumnLayout {
    /// `features[i]` = record field holding `FEATURE_COLUMNS[i]`.
    features: [usize; N_FEATURES],
    label: usize,
    n_fields: usize,
}

impl ColumnLayout {
    fn positional() -> Self {
        let mut features = [0usize; N_FEATURES];
        for (i, f) in features.iter_mut().enumerate() {
            *f = i;
        }
        Self {
            features,
            label: N_FEATURES,
            n_fields: N_FEATURES + 1,
        }
    }

    fn from_header(header: &StringRecord) -> Result<Self, DataError> {
        let names: Vec<&str> = header.iter().map(str::trim).collect();

        for (i, name) in names.iter().enumerate() {
            if names[..i].contains(name) {
                return Err(DataError::Schema(format!("duplicate column {name:?}")));
            }
            if *name != LABEL_COLUMN && !FEATURE_COLUMNS.contains(name) {
                return Err(DataError::Schema(format!("unexpected column {name:?}")));
            }
        }

        let find = |column: &str| {
            names
                .iter()
                .position(|&n| n == column)
                .ok_or_else(|| DataError::MissingColumn(column.to_string()))
        };

        let mut features = [0usize; N_FEATURES];
        for (slot, column) in features.iter_mut().zip(FEATURE_COLUMNS) {
            *slot = find(column)?;
        }
        let label = find(LABEL_COLUMN)?;

        Ok(Self {
            features,
            label,
            n_fields: names.len(),
        })
    }

    fn parse_record(&self, record: &StringRecord, row: usize) -> Result<ModelInput, DataError> {
        if record.len() != self.n_fields {
            return Err(DataError::Schema(format!(
                "row {row}: expected {} fields, found {}",
                self.n_fields,
                record.len()
            )));
        }

        let mut values = [0.0f32; N_FEATURES];
        for (i, &field) in self.features.iter().enumerate() {
            let raw = record.get(field).unwrap_or_default().trim();
            values[i] = raw
                .parse::<f32>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| DataError::InvalidValue {
                    row,
                    column: FEATURE_COLUMNS[i].to_string(),
                    value: raw.to_string(),
                })?;
        }

        let raw_label = record.get(self.label).unwrap_or_default().trim();
        let class = parse_label(raw_label).ok_or_else(|| DataError::InvalidLabel {
            row,
            value: raw_label.to_string(),
        })?;

        Ok(ModelInput::new(values, class))
    }
}

fn parse_label(raw: &str) -> Option<bool> {
    if raw.eq_ignore_ascii_case("true") {
        return Some(true);
    }
    if raw.eq_ignore_ascii_case("false") {
        return Some(false);
    }
    match raw.parse::<f32>().ok()? {
        v if v == 0.0 => Some(false),
        v if v == 1.0 => Some(true),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> String {
        let mut cols: Vec<String> = FEATURE_COLUMNS.iter().map(|c| format!("\"{c}\"")).collect();
        cols.push(format!("\"{LABEL_COLUMN}\""));
        cols.join(",")
    }

    fn row(base: f32, class: &str) -> String {
        let mut fields: Vec<String> = (0..N_FEATURES).map(|i| format!("{}", base + i as f32)).collect();
        fields.push(class.to_string());
        fields.join(",")
    }

    #[test]
    fn reads_quoted_header_and_labels() {
        let csv = format!("{}\n{}\n{}\n", header(), row(0.0, "\"0\""), row(1.5, "\"1\""));
        let rows = read_csv(csv.as_bytes(), &CsvOptions::default()).unwrap();

        assert_eq!(rows.len(), 2);
        assert!(!rows[0].class);
        assert!(rows[1].class);
        assert_eq!(rows[1].time(), 1.5);
        assert_eq!(rows[1].amount(), 1.5 + 29.0);
    }

    #[test]
    fn header_columns_are_mapped_by_name() {
        let mut cols: Vec<&str> = FEATURE_COLUMNS.to_vec();
        cols.reverse();
        cols.insert(0, LABEL_COLUMN);
        let mut fields = vec!["1".to_string()];
        fields.extend((0..N_FEATURES).rev().map(|i| i.to_string()));
        let csv = format!("{}\n{}\n", cols.join(","), fields.join(","));

        let rows = read_csv(csv.as_bytes(), &CsvOptions::default()).unwrap();
        assert_eq!(rows[0].column("Time"), Some(0.0));
        assert_eq!(rows[0].column("Amount"), Some(29.0));
        assert!(rows[0].class);
    }

    #[test]
    fn headerless_input_is_positional() {
        let options = CsvOptions {
            has_header: false,
            ..Default::default()
        };
        let csv = format!("{}\n", row(2.0, "0"));
        let rows = read_csv(csv.as_bytes(), &options).unwrap();
        assert_eq!(rows[0].time(), 2.0);
    }

    #[test]
    fn missing_label_column_is_rejected() {
        let csv = format!("{}\n", FEATURE_COLUMNS.join(","));
        let err = read_csv(csv.as_bytes(), &CsvOptions::default()).unwrap_err();
        assert!(matches!(err, DataError::MissingColumn(ref c) if c == "Class"));
    }

    #[test]
    fn extra_column_is_rejected() {
        let csv = format!("{},Extra\n", header());
        let err = read_csv(csv.as_bytes(), &CsvOptions::default()).unwrap_err();
        assert!(matches!(err, DataError::Schema(_)));
    }

    #[test]
    fn non_numeric_feature_is_rejected() {
        let bad = row(0.0, "0").replacen("0,", "abc,", 1);
        let csv = format!("{}\n{}\n", header(), bad);
        let err = read_csv(csv.as_bytes(), &CsvOptions::default()).unwrap_err();
        assert!(matches!(err, DataError::InvalidValue { ref column, .. } if column == "Time"));
    }

    #[test]
    fn non_binary_label_is_rejected() {
        let csv = format!("{}\n{}\n", header(), row(0.0, "2"));
        let err = read_csv(csv.as_bytes(), &CsvOptions::default()).unwrap_err();
        assert!(matches!(err, DataError::InvalidLabel { .. }));
    }

    #[test]
    fn short_row_is_rejected() {
        let csv = format!("{}\n1,2,3\n", header());
        assert!(read_csv(csv.as_bytes(), &CsvOptions::default()).is_err());
    }

    #[test]
    fn empty_input_is_rejected() {
        let csv = format!("{}\n", header());
        let err = read_csv(csv.as_bytes(), &CsvOptions::default()).unwrap_err();
        assert!(matches!(err, DataError::Empty));
    }

    #[test]
    fn sparse_option_is_rejected() {
        let options = CsvOptions {
            allow_sparse: true,
            ..Default::default()
        };
        let err = read_csv(header().as_bytes(), &options).unwrap_err();
        assert!(matches!(err, DataError::Schema(_)));
    }
}
