use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use crate::classifier::{Classifier, ClassifierError};
use crate::data::loader::{RawTable, UnsupportedFormat, load_file};
use crate::data::model::{Field, FraudFlag};
use crate::data::validate::{ValidationErrors, parse_record, validate_customer_id, validate_order_id};

/// Name of the column appended to scored tables.
pub const FLAG_COLUMN: &str = "is_fraud";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Per-line messages for rows that failed full validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowErrors {
    /// 1-based file line (data row index + 2, header included).
    pub line: usize,
    pub messages: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BatchError {
    #[error("The file contains no orders.")]
    Empty,
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("Invalid Order or Customer ID format at rows: {0:?}")]
    InvalidIds(Vec<usize>),
    #[error("Invalid values at rows: {}", format_rows(.0))]
    InvalidRows(Vec<RowErrors>),
}

fn format_rows(rows: &[RowErrors]) -> String {
    rows.iter()
        .map(|r| format!("\nRow {}: {}", r.line, r.messages.join(" ")))
        .collect()
}

#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error("Model is not loaded.")]
    ModelNotLoaded,
    #[error("Please upload a file first.")]
    NoFile,
    #[error("{0}")]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Batch(#[from] BatchError),
    #[error(transparent)]
    Format(#[from] UnsupportedFormat),
    #[error("Failed to load file: {0:#}")]
    File(anyhow::Error),
    #[error("Failed to process prediction: {0}")]
    Classifier(#[from] ClassifierError),
}

impl ScoringError {
    /// Dialog title for this error.
    pub fn title(&self) -> &'static str {
        match self {
            ScoringError::Validation(_) => "Validation Error",
            _ => "Error",
        }
    }
}

// ---------------------------------------------------------------------------
// Single record
// ---------------------------------------------------------------------------

/// Validate, preprocess and classify one manually entered order.
pub fn score_single(
    classifier: Option<&dyn Classifier>,
    values: &BTreeMap<Field, String>,
) -> Result<FraudFlag, ScoringError> {
    let classifier = classifier.ok_or(ScoringError::ModelNotLoaded)?;
    let record = parse_record(values)?;
    let features = classifier.schema().transform(&record);
    let flags = classifier.predict(std::slice::from_ref(&features))?;
    let flag = single_label(flags)?;
    log::info!("Order {} scored as {}", record.order_id, flag.as_u8());
    Ok(flag)
}

fn single_label(flags: Vec<FraudFlag>) -> Result<FraudFlag, ClassifierError> {
    match flags.as_slice() {
        [flag] => Ok(*flag),
        other => Err(ClassifierError::LabelCount {
            expected: 1,
            got: other.len(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Batch
// ---------------------------------------------------------------------------

/// Original rows with the fraud flag appended.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredBatch {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub flags: Vec<FraudFlag>,
}

impl ScoredBatch {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn suspicious_count(&self) -> usize {
        self.flags.iter().filter(|f| f.is_suspicious()).count()
    }
}

impl fmt::Display for ScoredBatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} orders scored, {} suspicious",
            self.len(),
            self.suspicious_count()
        )
    }
}

/// Load a CSV/XLSX file and score every row, all-or-nothing.
pub fn score_file(
    classifier: Option<&dyn Classifier>,
    path: &str,
) -> Result<ScoredBatch, ScoringError> {
    let path = path.trim();
    if path.is_empty() {
        return Err(ScoringError::NoFile);
    }
    let table = load_file(Path::new(path)).map_err(|err| match err.downcast::<UnsupportedFormat>() {
        Ok(format) => ScoringError::Format(format),
        Err(err) => ScoringError::File(err),
    })?;
    let classifier = classifier.ok_or(ScoringError::ModelNotLoaded)?;
    score_table(classifier, table)
}

/// Score an already loaded table. Any invalid row aborts the whole batch
/// before the classifier is called.
pub fn score_table(classifier: &dyn Classifier, table: RawTable) -> Result<ScoredBatch, ScoringError> {
    let columns = table.field_columns().map_err(BatchError::MissingColumns)?;
    if table.is_empty() {
        return Err(BatchError::Empty.into());
    }

    let cell = |row: &[String], field: Field| -> String {
        columns
            .iter()
            .find(|(f, _)| *f == field)
            .and_then(|(_, idx)| row.get(*idx))
            .cloned()
            .unwrap_or_default()
    };

    let bad_ids: Vec<usize> = table
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| {
            !validate_order_id(&cell(row, Field::OrderId))
                || !validate_customer_id(&cell(row, Field::CustomerId))
        })
        .map(|(idx, _)| idx + 2)
        .collect();
    if !bad_ids.is_empty() {
        log::warn!("Rejected batch: invalid identifiers at rows {bad_ids:?}");
        return Err(BatchError::InvalidIds(bad_ids).into());
    }

    let mut records = Vec::with_capacity(table.len());
    let mut bad_rows = Vec::new();
    for (idx, row) in table.rows.iter().enumerate() {
        let values: BTreeMap<Field, String> = Field::ALL.iter().map(|&f| (f, cell(row, f))).collect();
        match parse_record(&values) {
            Ok(record) => records.push(record),
            Err(errors) => bad_rows.push(RowErrors {
                line: idx + 2,
                messages: errors.0,
            }),
        }
    }
    if !bad_rows.is_empty() {
        log::warn!("Rejected batch: {} rows with invalid values", bad_rows.len());
        return Err(BatchError::InvalidRows(bad_rows).into());
    }

    let features = classifier.schema().transform_batch(&records);
    let flags = classifier.predict(&features)?;
    if flags.len() != records.len() {
        return Err(ClassifierError::LabelCount {
            expected: records.len(),
            got: flags.len(),
        }
        .into());
    }

    let RawTable { mut headers, rows } = table;
    let width = headers.len();
    headers.push(FLAG_COLUMN.to_string());
    let rows = rows
        .into_iter()
        .zip(&flags)
        .map(|(mut row, flag)| {
            row.resize(width, String::new());
            row.push(flag.as_u8().to_string());
            row
        })
        .collect();

    let batch = ScoredBatch { headers, rows, flags };
    log::info!("{batch}");
    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::features::{FeatureSchema, FeatureVector};
    use crate::data::fixtures::{csv_text, valid_values};
    use std::cell::RefCell;

    /// Flags every order whose `country_code_PH` indicator is set and records
    /// what it was asked to score.
    struct RecordingClassifier {
        schema: FeatureSchema,
        calls: RefCell<Vec<Vec<FeatureVector>>>,
        extra_labels: usize,
    }

    impl RecordingClassifier {
        fn new() -> Self {
            Self {
                schema: FeatureSchema::default(),
                calls: RefCell::new(Vec::new()),
                extra_labels: 0,
            }
        }
    }

    impl Classifier for RecordingClassifier {
        fn schema(&self) -> &FeatureSchema {
            &self.schema
        }

        fn predict(&self, rows: &[FeatureVector]) -> Result<Vec<FraudFlag>, ClassifierError> {
            self.calls.borrow_mut().push(rows.to_vec());
            let ph = self.schema.index_of("country_code_PH").unwrap();
            let mut flags: Vec<FraudFlag> = rows
                .iter()
                .map(|v| {
                    if v.values[ph] == 1.0 {
                        FraudFlag::Suspicious
                    } else {
                        FraudFlag::Legitimate
                    }
                })
                .collect();
            flags.extend(std::iter::repeat(FraudFlag::Legitimate).take(self.extra_labels));
            Ok(flags)
        }
    }

    fn table_of(rows: &[BTreeMap<Field, String>]) -> RawTable {
        let text = csv_text(rows);
        let mut reader = csv::Reader::from_reader(text.as_bytes());
        let headers = reader.headers().unwrap().iter().map(String::from).collect();
        let rows = reader
            .records()
            .map(|r| r.unwrap().iter().map(String::from).collect())
            .collect();
        RawTable { headers, rows }
    }

    fn with(field: Field, value: &str) -> BTreeMap<Field, String> {
        let mut values = valid_values();
        values.insert(field, value.to_string());
        values
    }

    #[test]
    fn single_order_end_to_end() {
        let classifier = RecordingClassifier::new();
        let flag = score_single(Some(&classifier), &valid_values()).unwrap();
        assert_eq!(flag, FraudFlag::Suspicious);
        assert_eq!(flag.verdict(), "Suspicious Order Detected!");

        {
            let calls = classifier.calls.borrow();
            let v = &calls[0][0];
            let schema = &classifier.schema;
            assert_eq!(v.value(schema, "country_code_PH"), Some(1.0));
            assert_eq!(v.value(schema, "country_code_MY"), Some(0.0));
            assert_eq!(v.value(schema, "collect_type_pickup"), Some(0.0));
            assert_eq!(v.value(schema, "payment_group_Digital Wallets"), Some(1.0));
        }

        let safe = score_single(Some(&classifier), &with(Field::CountryCode, "MY")).unwrap();
        assert_eq!(safe, FraudFlag::Legitimate);
        assert_eq!(safe.verdict(), "Order Appears Safe");
        assert_eq!(classifier.calls.borrow().len(), 2);
    }

    #[test]
    fn single_order_requires_a_model() {
        let err = score_single(None, &valid_values()).unwrap_err();
        assert!(matches!(err, ScoringError::ModelNotLoaded));
        assert_eq!(err.to_string(), "Model is not loaded.");
    }

    #[test]
    fn invalid_form_never_reaches_the_model() {
        let classifier = RecordingClassifier::new();
        let mut values = with(Field::CustomerId, "CUST001");
        values.insert(Field::OrderValue, "1.234".to_string());
        let err = score_single(Some(&classifier), &values).unwrap_err();
        assert_eq!(err.title(), "Validation Error");
        assert_eq!(
            err.to_string(),
            "Customer ID must be 8 alphanumeric characters.\n\
             Order Value must be a number with up to 2 decimal places."
        );
        assert!(classifier.calls.borrow().is_empty());
    }

    #[test]
    fn batch_appends_flag_column() {
        let classifier = RecordingClassifier::new();
        let table = table_of(&[valid_values(), with(Field::CountryCode, "BD")]);
        let batch = score_table(&classifier, table).unwrap();

        assert_eq!(batch.headers.last().map(String::as_str), Some(FLAG_COLUMN));
        assert_eq!(batch.flags, vec![FraudFlag::Suspicious, FraudFlag::Legitimate]);
        assert_eq!(batch.rows[0].last().map(String::as_str), Some("1"));
        assert_eq!(batch.rows[1].last().map(String::as_str), Some("0"));
        assert_eq!(batch.rows[0].len(), batch.headers.len());
        assert_eq!(batch.suspicious_count(), 1);
        assert_eq!(classifier.calls.borrow().len(), 1);
    }

    #[test]
    fn flag_column_lines_up_with_the_header() {
        let classifier = RecordingClassifier::new();
        let mut table = table_of(&[valid_values(), valid_values()]);
        table.rows[1].push("EXTRA".to_string());
        let batch = score_table(&classifier, table).unwrap();

        let flag_idx = batch.headers.len() - 1;
        assert_eq!(batch.headers[flag_idx], FLAG_COLUMN);
        for row in &batch.rows {
            assert_eq!(row.len(), batch.headers.len());
            assert_eq!(row[flag_idx], "1");
        }
    }

    #[test]
    fn wide_csv_rows_never_reach_the_model() {
        let classifier = RecordingClassifier::new();
        let dir = tempfile::tempdir().unwrap();
        let mut text = csv_text(&[valid_values()]);
        let first_row = text.lines().nth(1).unwrap().to_string();
        text.push_str(&format!("{first_row},EXTRA\n"));
        let path = dir.path().join("wide.csv");
        std::fs::write(&path, text).unwrap();

        let err = score_file(Some(&classifier), path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, ScoringError::File(_)));
        assert!(err.to_string().contains("Row 3 has 14 fields"));
        assert!(classifier.calls.borrow().is_empty());
    }

    #[test]
    fn one_bad_customer_id_blocks_the_whole_batch() {
        let classifier = RecordingClassifier::new();
        let mut rows: Vec<_> = (0..10).map(|_| valid_values()).collect();
        rows[6] = with(Field::CustomerId, "BAD-ID");
        let err = score_table(&classifier, table_of(&rows)).unwrap_err();

        assert!(matches!(err, ScoringError::Batch(BatchError::InvalidIds(ref r)) if r == &vec![8]));
        assert_eq!(err.to_string(), "Invalid Order or Customer ID format at rows: [8]");
        assert!(classifier.calls.borrow().is_empty());
    }

    #[test]
    fn other_invalid_fields_also_block_the_batch() {
        let classifier = RecordingClassifier::new();
        let rows = vec![
            valid_values(),
            with(Field::NumItemsOrdered, "-1"),
            with(Field::PaymentGroup, "Crypto"),
        ];
        let err = score_table(&classifier, table_of(&rows)).unwrap_err();
        let ScoringError::Batch(BatchError::InvalidRows(bad)) = &err else {
            panic!("unexpected error: {err}");
        };
        assert_eq!(bad.iter().map(|r| r.line).collect::<Vec<_>>(), vec![3, 4]);
        assert_eq!(bad[0].messages, vec!["Num Items Ordered must be an integer.".to_string()]);
        assert!(err.to_string().contains("Row 4: Payment Group must be one of"));
        assert!(classifier.calls.borrow().is_empty());
    }

    #[test]
    fn missing_columns_and_empty_tables_are_rejected() {
        let classifier = RecordingClassifier::new();
        let mut table = table_of(&[valid_values()]);
        table.headers[0] = "country".to_string();
        let err = score_table(&classifier, table).unwrap_err();
        assert_eq!(err.to_string(), "Missing required columns: country_code");

        let empty = table_of(&[]);
        let err = score_table(&classifier, empty).unwrap_err();
        assert!(matches!(err, ScoringError::Batch(BatchError::Empty)));
    }

    #[test]
    fn wrong_label_count_is_an_error() {
        let mut classifier = RecordingClassifier::new();
        classifier.extra_labels = 1;
        let err = score_table(&classifier, table_of(&[valid_values()])).unwrap_err();
        assert!(matches!(
            err,
            ScoringError::Classifier(ClassifierError::LabelCount { expected: 1, got: 2 })
        ));
        let err = score_single(Some(&classifier), &valid_values()).unwrap_err();
        assert!(matches!(err, ScoringError::Classifier(_)));
    }

    #[test]
    fn file_scoring_checks_path_and_format() {
        let classifier = RecordingClassifier::new();
        assert!(matches!(
            score_file(Some(&classifier), "   "),
            Err(ScoringError::NoFile)
        ));

        let dir = tempfile::tempdir().unwrap();
        let txt = dir.path().join("orders.txt");
        std::fs::write(&txt, "x").unwrap();
        let err = score_file(Some(&classifier), txt.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, ScoringError::Format(_)));
        assert_eq!(err.to_string(), "Invalid file format. Please upload CSV or XLSX.");

        let missing = dir.path().join("missing.csv");
        let err = score_file(Some(&classifier), missing.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, ScoringError::File(_)));
        assert!(err.to_string().starts_with("Failed to load file: "));

        let csv = dir.path().join("orders.csv");
        std::fs::write(&csv, csv_text(&[valid_values()])).unwrap();
        assert!(matches!(
            score_file(None, csv.to_str().unwrap()),
            Err(ScoringError::ModelNotLoaded)
        ));
        let batch = score_file(Some(&classifier), csv.to_str().unwrap()).unwrap();
        assert_eq!(batch.len(), 1);
    }
}
