use crate::repository::StorageError;
use drill_core::model::{CustomQuestion, ProgressEntry};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// One problem found while validating an imported progress payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ImportIssue {
    #[error("payload is not valid JSON: {0}")]
    Malformed(String),
    #[error("payload root must be an object")]
    NotAnObject,
    #[error("`{field}` must be an array")]
    NotAnArray { field: &'static str },
    #[error("`{field}` item {index} is not usable: {message}")]
    BadItem {
        field: &'static str,
        index: usize,
        message: String,
    },
}

/// Aggregate numbers derived from the progress history.
///
/// Always recomputed from the entries at hand, never trusted from an
/// imported payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressStatistics {
    pub total_sessions: usize,
    pub total_questions: u32,
    pub total_correct: u32,
    pub average_score_pct: u32,
    pub best_score_pct: u32,
    pub sessions_by_mode: BTreeMap<String, usize>,
}

impl ProgressStatistics {
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    pub fn from_entries(entries: &[ProgressEntry]) -> Self {
        if entries.is_empty() {
            return Self::default();
        }
        let mut sessions_by_mode: BTreeMap<String, usize> = BTreeMap::new();
        for entry in entries {
            *sessions_by_mode
                .entry(entry.mode.as_str().to_string())
                .or_default() += 1;
        }
        let score_sum: u64 = entries.iter().map(|e| u64::from(e.score_pct)).sum();
        Self {
            total_sessions: entries.len(),
            total_questions: entries.iter().map(|e| e.total).sum(),
            total_correct: entries.iter().map(|e| e.correct).sum(),
            average_score_pct: (score_sum as f64 / entries.len() as f64).round() as u32,
            best_score_pct: entries.iter().map(|e| e.score_pct).max().unwrap_or(0),
            sessions_by_mode,
        }
    }
}

/// Portable export of everything a user has built up: session history,
/// authored questions, presentation preferences, and the derived statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProgress {
    pub entries: Vec<ProgressEntry>,
    pub custom_questions: Vec<CustomQuestion>,
    /// Opaque presentation-layer settings, carried through untouched.
    pub preferences: Value,
    pub statistics: ProgressStatistics,
}

impl UserProgress {
    /// Builds the document, deriving the statistics from `entries`.
    #[must_use]
    pub fn new(
        entries: Vec<ProgressEntry>,
        custom_questions: Vec<CustomQuestion>,
        preferences: Value,
    ) -> Self {
        let statistics = ProgressStatistics::from_entries(&entries);
        Self {
            entries,
            custom_questions,
            preferences,
            statistics,
        }
    }

    /// Serializes the document for export.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` when encoding fails.
    pub fn to_json(&self) -> Result<String, StorageError> {
        serde_json::to_string(self).map_err(|e| StorageError::Serialization(e.to_string()))
    }

    /// Parses and validates an imported payload.
    ///
    /// Both `entries` and `customQuestions` must be arrays, and every item in
    /// them must decode and validate; otherwise all found problems come back
    /// together and nothing is imported. Statistics in the payload are
    /// ignored and recomputed.
    ///
    /// # Errors
    ///
    /// Returns every [`ImportIssue`] found.
    pub fn parse(raw: &str) -> Result<Self, Vec<ImportIssue>> {
        let value: Value = serde_json::from_str(raw)
            .map_err(|e| vec![ImportIssue::Malformed(e.to_string())])?;
        let Some(object) = value.as_object() else {
            return Err(vec![ImportIssue::NotAnObject]);
        };

        let mut issues = Vec::new();
        let entry_items = object.get("entries").and_then(Value::as_array);
        if entry_items.is_none() {
            issues.push(ImportIssue::NotAnArray { field: "entries" });
        }
        let custom_items = object.get("customQuestions").and_then(Value::as_array);
        if custom_items.is_none() {
            issues.push(ImportIssue::NotAnArray {
                field: "customQuestions",
            });
        }
        let (Some(entry_items), Some(custom_items)) = (entry_items, custom_items) else {
            return Err(issues);
        };

        let mut entries = Vec::with_capacity(entry_items.len());
        for (index, item) in entry_items.iter().enumerate() {
            match serde_json::from_value::<ProgressEntry>(item.clone()) {
                Ok(entry) => entries.push(entry),
                Err(err) => issues.push(ImportIssue::BadItem {
                    field: "entries",
                    index,
                    message: err.to_string(),
                }),
            }
        }

        let mut custom_questions = Vec::with_capacity(custom_items.len());
        for (index, item) in custom_items.iter().enumerate() {
            match serde_json::from_value::<CustomQuestion>(item.clone()) {
                Ok(question) => match question.validate() {
                    Ok(()) => custom_questions.push(question),
                    Err(found) => issues.push(ImportIssue::BadItem {
                        field: "customQuestions",
                        index,
                        message: found
                            .iter()
                            .map(ToString::to_string)
                            .collect::<Vec<_>>()
                            .join("; "),
                    }),
                },
                Err(err) => issues.push(ImportIssue::BadItem {
                    field: "customQuestions",
                    index,
                    message: err.to_string(),
                }),
            }
        }

        if !issues.is_empty() {
            return Err(issues);
        }
        let preferences = object.get("preferences").cloned().unwrap_or(Value::Null);
        Ok(Self::new(entries, custom_questions, preferences))
    }
}

/// Appends the incoming history entries not already present, returning how
/// many were genuinely new. Duplicates are detected by full value equality;
/// history entries carry no id of their own.
pub fn merge_entries(existing: &mut Vec<ProgressEntry>, incoming: Vec<ProgressEntry>) -> usize {
    let mut added = 0;
    for entry in incoming {
        if !existing.contains(&entry) {
            existing.push(entry);
            added += 1;
        }
    }
    added
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
