use super::color::{Color, ColorPreset};
use super::error::FilterError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque identifier of a filter, unique across every tab
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterId(String);

impl FilterId {
    pub fn generate() -> Self {
        FilterId(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FilterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a filter does to the lines it matches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    /// Show only lines matching at least one include filter
    Include,
    /// Hide matching lines, regardless of includes
    Exclude,
    /// Recolor matching lines without changing visibility
    Highlight,
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FilterKind::Include => "include",
            FilterKind::Exclude => "exclude",
            FilterKind::Highlight => "highlight",
        };
        f.write_str(name)
    }
}

/// A single rule matched against every log line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub id: FilterId,
    pub pattern: String,
    pub kind: FilterKind,
    pub case_sensitive: bool,
    pub is_regex: bool,
    pub text_color: Option<Color>,
    pub background_color: Option<Color>,
    pub enabled: bool,
}

/// Everything needed to create a filter; the id is assigned on creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFilter {
    pub pattern: String,
    pub kind: FilterKind,
    pub case_sensitive: bool,
    pub is_regex: bool,
    pub text_color: Option<Color>,
    pub background_color: Option<Color>,
    pub enabled: bool,
}

impl NewFilter {
    /// Enabled, case-insensitive literal filter without colors
    pub fn new(pattern: impl Into<String>, kind: FilterKind) -> Self {
        Self {
            pattern: pattern.into(),
            kind,
            case_sensitive: false,
            is_regex: false,
            text_color: None,
            background_color: None,
            enabled: true,
        }
    }

    pub fn include(pattern: impl Into<String>) -> Self {
        Self::new(pattern, FilterKind::Include)
    }

    pub fn exclude(pattern: impl Into<String>) -> Self {
        Self::new(pattern, FilterKind::Exclude)
    }

    pub fn highlight(pattern: impl Into<String>) -> Self {
        Self::new(pattern, FilterKind::Highlight)
    }

    pub fn regex(mut self, is_regex: bool) -> Self {
        self.is_regex = is_regex;
        self
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn text_color(mut self, color: Option<Color>) -> Self {
        self.text_color = color;
        self
    }

    pub fn background_color(mut self, color: Option<Color>) -> Self {
        self.background_color = color;
        self
    }

    pub fn preset(self, preset: ColorPreset) -> Self {
        let (text, background) = preset.colors();
        self.text_color(text).background_color(background)
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Assign a fresh id, rejecting an empty pattern.
    pub fn build(self) -> Result<Filter, FilterError> {
        if self.pattern.trim().is_empty() {
            return Err(FilterError::EmptyPattern);
        }

        Ok(Filter {
            id: FilterId::generate(),
            pattern: self.pattern,
            kind: self.kind,
            case_sensitive: self.case_sensitive,
            is_regex: self.is_regex,
            text_color: self.text_color,
            background_color: self.background_color,
            enabled: self.enabled,
        })
    }
}

impl From<&Filter> for NewFilter {
    fn from(filter: &Filter) -> Self {
        Self {
            pattern: filter.pattern.clone(),
            kind: filter.kind,
            case_sensitive: filter.case_sensitive,
            is_regex: filter.is_regex,
            text_color: filter.text_color,
            background_color: filter.background_color,
            enabled: filter.enabled,
        }
    }
}

/// Partial update of a filter; `None` fields are left untouched.
///
/// Colors use a nested option so a patch can clear a color
/// (`Some(None)`) as well as leave it alone (`None`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPatch {
    pub pattern: Option<String>,
    pub kind: Option<FilterKind>,
    pub case_sensitive: Option<bool>,
    pub is_regex: Option<bool>,
    pub text_color: Option<Option<Color>>,
    pub background_color: Option<Option<Color>>,
    pub enabled: Option<bool>,
}

impl FilterPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn kind(mut self, kind: FilterKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = Some(case_sensitive);
        self
    }

    pub fn regex(mut self, is_regex: bool) -> Self {
        self.is_regex = Some(is_regex);
        self
    }

    pub fn text_color(mut self, color: Option<Color>) -> Self {
        self.text_color = Some(color);
        self
    }

    pub fn background_color(mut self, color: Option<Color>) -> Self {
        self.background_color = Some(color);
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }
}

impl Filter {
    /// Apply a patch in place. Fails without modifying the filter if the
    /// patch would leave the pattern empty.
    pub fn apply(&mut self, patch: FilterPatch) -> Result<(), FilterError> {
        if let Some(pattern) = &patch.pattern {
            if pattern.trim().is_empty() {
                return Err(FilterError::EmptyPattern);
            }
        }

        if let Some(pattern) = patch.pattern {
            self.pattern = pattern;
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(case_sensitive) = patch.case_sensitive {
            self.case_sensitive = case_sensitive;
        }
        if let Some(is_regex) = patch.is_regex {
            self.is_regex = is_regex;
        }
        if let Some(color) = patch.text_color {
            self.text_color = color;
        }
        if let Some(color) = patch.background_color {
            self.background_color = color;
        }
        if let Some(enabled) = patch.enabled {
            self.enabled = enabled;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_rejects_empty_pattern() {
        assert_eq!(NewFilter::include("").build(), Err(FilterError::EmptyPattern));
        assert_eq!(NewFilter::include("   ").build(), Err(FilterError::EmptyPattern));
    }

    #[test]
    fn test_build_assigns_unique_ids() {
        let a = NewFilter::include("a").build().unwrap();
        let b = NewFilter::include("a").build().unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_new_filter_defaults() {
        let filter = NewFilter::highlight("warn").build().unwrap();
        assert!(filter.enabled);
        assert!(!filter.case_sensitive);
        assert!(!filter.is_regex);
        assert_eq!(filter.text_color, None);
    }

    #[test]
    fn test_patch_updates_only_given_fields() {
        let mut filter = NewFilter::include("error")
            .text_color(Some(Color::rgb(1, 2, 3)))
            .build()
            .unwrap();
        let id = filter.id.clone();

        filter
            .apply(FilterPatch::new().pattern("fail").regex(true))
            .unwrap();

        assert_eq!(filter.id, id);
        assert_eq!(filter.pattern, "fail");
        assert!(filter.is_regex);
        assert_eq!(filter.kind, FilterKind::Include);
        assert_eq!(filter.text_color, Some(Color::rgb(1, 2, 3)));
    }

    #[test]
    fn test_patch_can_clear_color() {
        let mut filter = NewFilter::highlight("x")
            .preset(ColorPreset::WhiteRed)
            .build()
            .unwrap();
        filter.apply(FilterPatch::new().background_color(None)).unwrap();
        assert!(filter.text_color.is_some());
        assert_eq!(filter.background_color, None);
    }

    #[test]
    fn test_patch_with_empty_pattern_changes_nothing() {
        let mut filter = NewFilter::exclude("debug").build().unwrap();
        let before = filter.clone();
        let result = filter.apply(FilterPatch::new().pattern("").enabled(false));
        assert_eq!(result, Err(FilterError::EmptyPattern));
        assert_eq!(filter, before);
    }
}
