//! Typed keyword access for one report step.

use rf_restart::{KeywordData, RestartSource};

use crate::error::{WellError, WellResult, malformed};

/// Loads keyword arrays of one report step as typed vectors.
///
/// An absent keyword is always an error; nothing is defaulted.
pub struct FieldLoader<'a, S: RestartSource + ?Sized> {
    source: &'a S,
    report_step: i32,
}

impl<'a, S: RestartSource + ?Sized> FieldLoader<'a, S> {
    pub fn new(source: &'a S, report_step: i32) -> Self {
        Self {
            source,
            report_step,
        }
    }

    pub fn report_step(&self) -> i32 {
        self.report_step
    }

    fn fetch(&self, keyword: &str, grid_index: usize) -> WellResult<KeywordData> {
        self.source
            .fetch(keyword, grid_index, self.report_step)?
            .ok_or_else(|| WellError::MissingField {
                keyword: keyword.to_string(),
                grid_index,
                report_step: self.report_step,
            })
    }

    pub fn load_ints(&self, keyword: &str, grid_index: usize) -> WellResult<Vec<i32>> {
        match self.fetch(keyword, grid_index)? {
            KeywordData::Int(values) => Ok(values),
            other => Err(type_mismatch(keyword, "INTE", &other)),
        }
    }

    /// `DOUB` data, or `REAL` data widened to `f64`.
    pub fn load_doubles(&self, keyword: &str, grid_index: usize) -> WellResult<Vec<f64>> {
        match self.fetch(keyword, grid_index)? {
            KeywordData::Double(values) => Ok(values),
            KeywordData::Real(values) => Ok(values.into_iter().map(f64::from).collect()),
            other => Err(type_mismatch(keyword, "DOUB", &other)),
        }
    }

    pub fn load_strings(&self, keyword: &str, grid_index: usize) -> WellResult<Vec<String>> {
        match self.fetch(keyword, grid_index)? {
            KeywordData::Char(values) => Ok(values),
            other => Err(type_mismatch(keyword, "CHAR", &other)),
        }
    }
}

fn type_mismatch(keyword: &str, expected: &str, found: &KeywordData) -> WellError {
    malformed(
        keyword,
        format!("expected {expected} data, found {}", found.type_name()),
    )
}
