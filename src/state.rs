use std::collections::BTreeMap;
use std::ops::Range;

use crate::classifier::Classifier;
use crate::data::model::Field;
use crate::scoring::{ScoredBatch, score_file, score_single};

// ---------------------------------------------------------------------------
// Small UI models
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Manual,
    Bulk,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// A modal message waiting to be acknowledged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub body: String,
}

/// Text typed into the manual form, one entry per field.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderForm {
    pub values: BTreeMap<Field, String>,
}

impl Default for OrderForm {
    /// Text fields start empty; drop-downs start on their first option.
    fn default() -> Self {
        let values = Field::ALL
            .iter()
            .map(|&f| {
                let initial = f.options().first().map(|s| s.to_string()).unwrap_or_default();
                (f, initial)
            })
            .collect();
        Self { values }
    }
}

impl OrderForm {
    pub fn value_mut(&mut self, field: Field) -> &mut String {
        self.values.entry(field).or_default()
    }
}

/// 1-based page cursor over the result rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    pub total_rows: usize,
    pub rows_per_page: usize,
    pub page: usize,
}

impl Pager {
    pub fn new(total_rows: usize, rows_per_page: usize) -> Self {
        Self {
            total_rows,
            rows_per_page: rows_per_page.max(1),
            page: 1,
        }
    }

    pub fn total_pages(&self) -> usize {
        self.total_rows.div_ceil(self.rows_per_page)
    }

    /// Row indices shown on the current page.
    pub fn range(&self) -> Range<usize> {
        let start = ((self.page - 1) * self.rows_per_page).min(self.total_rows);
        let end = (start + self.rows_per_page).min(self.total_rows);
        start..end
    }

    pub fn prev(&mut self) {
        if self.page > 1 {
            self.page -= 1;
        }
    }

    pub fn next(&mut self) {
        if self.page < self.total_pages() {
            self.page += 1;
        }
    }
}

/// Scored batch plus its page cursor.
pub struct ResultsView {
    pub batch: ScoredBatch,
    pub pager: Pager,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded classifier (None if the model failed to load).
    classifier: Option<Box<dyn Classifier>>,

    pub tab: Tab,

    pub form: OrderForm,

    /// Path typed or picked on the bulk tab.
    pub file_path: String,

    /// Open result viewer, if any.
    pub results: Option<ResultsView>,

    /// Message dialog currently shown.
    pub notice: Option<Notice>,

    pub rows_per_page: usize,
}

impl AppState {
    pub fn new(classifier: Option<Box<dyn Classifier>>, rows_per_page: usize) -> Self {
        Self {
            classifier,
            tab: Tab::Manual,
            form: OrderForm::default(),
            file_path: String::new(),
            results: None,
            notice: None,
            rows_per_page,
        }
    }

    pub fn model_loaded(&self) -> bool {
        self.classifier.is_some()
    }

    pub fn show_info(&mut self, title: &str, body: impl Into<String>) {
        self.notice = Some(Notice {
            kind: NoticeKind::Info,
            title: title.to_string(),
            body: body.into(),
        });
    }

    pub fn show_error(&mut self, title: &str, body: impl Into<String>) {
        self.notice = Some(Notice {
            kind: NoticeKind::Error,
            title: title.to_string(),
            body: body.into(),
        });
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Score the manual form and show the verdict.
    pub fn single_predict(&mut self) {
        match score_single(self.classifier.as_deref(), &self.form.values) {
            Ok(flag) => self.show_info("Prediction Result", flag.verdict()),
            Err(e) => {
                log::error!("Single prediction failed: {e}");
                self.show_error(e.title(), e.to_string());
            }
        }
    }

    /// Score the selected file and open the result viewer.
    pub fn bulk_predict(&mut self) {
        match score_file(self.classifier.as_deref(), &self.file_path) {
            Ok(batch) => {
                self.show_info(
                    "Success",
                    format!("File validated successfully!\n{batch}."),
                );
                let pager = Pager::new(batch.len(), self.rows_per_page);
                self.results = Some(ResultsView { batch, pager });
            }
            Err(e) => {
                log::error!("Bulk prediction failed: {e}");
                self.show_error(e.title(), e.to_string());
            }
        }
    }

    pub fn close_results(&mut self) {
        self.results = None;
    }

    /// Open a native file picker for CSV/XLSX input.
    pub fn browse_for_file(&mut self) {
        let file = rfd::FileDialog::new()
            .set_title("Import CSV or XLSX File")
            .add_filter("CSV or XLSX", &["csv", "xlsx"])
            .pick_file();

        if let Some(path) = file {
            self.file_path = path.display().to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::ClassifierError;
    use crate::data::features::{FeatureSchema, FeatureVector};
    use crate::data::fixtures::{csv_text, valid_values};
    use crate::data::model::FraudFlag;

    struct AlwaysSuspicious(FeatureSchema);

    impl Classifier for AlwaysSuspicious {
        fn schema(&self) -> &FeatureSchema {
            &self.0
        }

        fn predict(&self, rows: &[FeatureVector]) -> Result<Vec<FraudFlag>, ClassifierError> {
            Ok(vec![FraudFlag::Suspicious; rows.len()])
        }
    }

    fn state_with_model() -> AppState {
        AppState::new(Some(Box::new(AlwaysSuspicious(FeatureSchema::default()))), 20)
    }

    #[test]
    fn pager_walks_pages_and_clamps() {
        let mut pager = Pager::new(45, 20);
        assert_eq!(pager.total_pages(), 3);
        assert_eq!(pager.range(), 0..20);
        pager.prev();
        assert_eq!(pager.page, 1);
        pager.next();
        pager.next();
        assert_eq!(pager.range(), 40..45);
        pager.next();
        assert_eq!(pager.page, 3);
    }

    #[test]
    fn pager_handles_exact_and_empty_sizes() {
        assert_eq!(Pager::new(40, 20).total_pages(), 2);
        let mut empty = Pager::new(0, 20);
        assert_eq!(empty.total_pages(), 0);
        assert_eq!(empty.range(), 0..0);
        empty.next();
        assert_eq!(empty.page, 1);
    }

    #[test]
    fn form_defaults_select_first_option() {
        let form = OrderForm::default();
        assert_eq!(form.values[&Field::CountryCode], "PH");
        assert_eq!(form.values[&Field::CollectType], "delivery");
        assert_eq!(form.values[&Field::PaymentGroup], "Credit/Debit Card Payments");
        assert_eq!(form.values[&Field::OrderId], "");
    }

    #[test]
    fn single_predict_shows_verdict() {
        let mut state = state_with_model();
        state.form.values = valid_values();
        state.single_predict();
        let notice = state.notice.clone().unwrap();
        assert_eq!(notice.kind, NoticeKind::Info);
        assert_eq!(notice.title, "Prediction Result");
        assert_eq!(notice.body, "Suspicious Order Detected!");
    }

    #[test]
    fn empty_form_lists_every_field() {
        let mut state = state_with_model();
        state.single_predict();
        let notice = state.notice.clone().unwrap();
        assert_eq!(notice.kind, NoticeKind::Error);
        assert_eq!(notice.title, "Validation Error");
        // Ten free-text fields; the three drop-downs are pre-filled.
        assert_eq!(notice.body.lines().count(), 10);
    }

    #[test]
    fn without_model_predictions_are_refused() {
        let mut state = AppState::new(None, 20);
        assert!(!state.model_loaded());
        state.form.values = valid_values();
        state.single_predict();
        assert_eq!(state.notice.clone().unwrap().body, "Model is not loaded.");
    }

    #[test]
    fn bulk_predict_opens_results() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.csv");
        let rows: Vec<_> = (0..25).map(|_| valid_values()).collect();
        std::fs::write(&path, csv_text(&rows)).unwrap();

        let mut state = state_with_model();
        state.file_path = path.display().to_string();
        state.bulk_predict();

        let view = state.results.as_ref().unwrap();
        assert_eq!(view.batch.len(), 25);
        assert_eq!(view.pager.total_pages(), 2);
        assert!(state.notice.as_ref().unwrap().body.starts_with("File validated successfully!"));

        state.close_results();
        assert!(state.results.is_none());
    }

    #[test]
    fn bulk_predict_without_file_is_an_error() {
        let mut state = state_with_model();
        state.bulk_predict();
        assert_eq!(state.notice.clone().unwrap().body, "Please upload a file first.");
        assert!(state.results.is_none());
    }
}
