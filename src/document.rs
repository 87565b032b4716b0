//! Tab documents: the JSON form a tab is saved to and loaded from
//!
//! ```json
//! {
//!   "name": "Errors",
//!   "filters": [
//!     {
//!       "text": "ERROR",
//!       "textColor": "#ffffff",
//!       "backgroundColor": "#dc2626",
//!       "type": "include",
//!       "caseSensitive": false,
//!       "isRegex": false,
//!       "enabled": true
//!     }
//!   ]
//! }
//! ```
//!
//! Filter ids are not stored. Loading a document gives every filter a fresh
//! id, and a document is checked completely before any of it is applied.

use crate::filter::{Color, Filter, FilterError, FilterKind, NewFilter};
use crate::store::FilterStore;
use crate::tab::{Tab, TabId};
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Invalid tab document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid filter #{index} in tab document: {source}")]
    Invalid {
        index: usize,
        #[source]
        source: FilterError,
    },

    #[error("Unknown tab: '{0}'")]
    UnknownTab(String),

    #[error("Failed to read tab document '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write tab document '{path}': {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// A saved tab
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabDocument {
    #[serde(default)]
    pub name: String,
    pub filters: Vec<FilterRecord>,
}

/// A saved filter. Colors are `""` when unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterRecord {
    pub text: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub text_color: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub background_color: String,
    #[serde(rename = "type")]
    pub kind: FilterKind,
    #[serde(default)]
    pub case_sensitive: bool,
    #[serde(default)]
    pub is_regex: bool,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn color_text(color: Option<Color>) -> String {
    color.map(|c| c.to_string()).unwrap_or_default()
}

impl From<&Filter> for FilterRecord {
    fn from(filter: &Filter) -> Self {
        Self {
            text: filter.pattern.clone(),
            text_color: color_text(filter.text_color),
            background_color: color_text(filter.background_color),
            kind: filter.kind,
            case_sensitive: filter.case_sensitive,
            is_regex: filter.is_regex,
            enabled: filter.enabled,
        }
    }
}

impl TryFrom<&FilterRecord> for NewFilter {
    type Error = FilterError;

    fn try_from(record: &FilterRecord) -> Result<Self, Self::Error> {
        if record.text.trim().is_empty() {
            return Err(FilterError::EmptyPattern);
        }
        Ok(NewFilter::new(record.text.clone(), record.kind)
            .text_color(Color::parse_optional(&record.text_color)?)
            .background_color(Color::parse_optional(&record.background_color)?)
            .case_sensitive(record.case_sensitive)
            .regex(record.is_regex)
            .enabled(record.enabled))
    }
}

impl TabDocument {
    pub fn from_tab(tab: &Tab) -> Self {
        Self {
            name: tab.name.clone(),
            filters: tab.filters.iter().map(FilterRecord::from).collect(),
        }
    }

    /// Parse and fully validate a document.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let document: TabDocument = serde_json::from_str(json)?;
        document.new_filters()?;
        Ok(document)
    }

    pub fn to_json_pretty(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Convert every record, failing on the first invalid one.
    pub fn new_filters(&self) -> Result<Vec<NewFilter>, DocumentError> {
        self.filters
            .iter()
            .enumerate()
            .map(|(index, record)| {
                NewFilter::try_from(record)
                    .map_err(|source| DocumentError::Invalid { index, source })
            })
            .collect()
    }

    /// Build the document's filters, each with a fresh id.
    pub fn build_filters(&self) -> Result<Vec<Filter>, DocumentError> {
        self.new_filters()?
            .into_iter()
            .enumerate()
            .map(|(index, new)| {
                new.build()
                    .map_err(|source| DocumentError::Invalid { index, source })
            })
            .collect()
    }
}

impl FilterStore {
    /// Serialize a tab to pretty-printed JSON.
    pub fn save_tab_to_json(&self, tab: &TabId) -> Result<String, DocumentError> {
        let tab = self
            .tab(tab)
            .ok_or_else(|| DocumentError::UnknownTab(tab.to_string()))?;
        TabDocument::from_tab(tab).to_json_pretty()
    }

    /// Replace a tab's filters with those of a JSON document.
    ///
    /// On any error the store is left untouched. Returns the number of
    /// filters loaded.
    pub fn load_tab_from_json(
        &mut self,
        tab: &TabId,
        json: &str,
    ) -> Result<usize, DocumentError> {
        let document = TabDocument::from_json(json).inspect_err(|e| {
            tracing::warn!(tab = %tab, error = %e, "failed to load filters from JSON");
        })?;
        self.import_document(tab, &document)
    }

    /// Replace a tab's filters with those of a parsed document.
    pub fn import_document(
        &mut self,
        tab: &TabId,
        document: &TabDocument,
    ) -> Result<usize, DocumentError> {
        if self.tab(tab).is_none() {
            return Err(DocumentError::UnknownTab(tab.to_string()));
        }
        let filters = document.build_filters()?;
        let count = filters.len();
        self.replace_filters(tab, filters)
            .map_err(|_| DocumentError::UnknownTab(tab.to_string()))?;
        tracing::info!(tab = %tab, filters = count, "loaded tab document");
        Ok(count)
    }
}

pub fn load_document(path: &Path) -> Result<TabDocument, DocumentError> {
    let raw = fs::read_to_string(path).map_err(|source| DocumentError::Read {
        path: path.display().to_string(),
        source,
    })?;
    TabDocument::from_json(&raw)
}

pub fn save_document(path: &Path, document: &TabDocument) -> Result<(), DocumentError> {
    let json = document.to_json_pretty()?;
    fs::write(path, json).map_err(|source| DocumentError::Write {
        path: path.display().to_string(),
        source,
    })
}
