use super::model::{Filter, FilterId};
use regex::{Regex, RegexBuilder};
use std::collections::HashMap;

/// Check whether a single filter matches a line.
///
/// Literal patterns are substring matches, case-folded on both sides unless
/// the filter is case sensitive. Regex patterns are searched unanchored. A
/// pattern that fails to compile never matches.
pub fn matches(line: &str, filter: &Filter) -> bool {
    CompiledPattern::compile(filter).is_match(line)
}

/// Returns the compile error of a regex filter, if any.
///
/// Literal filters are always valid.
pub fn validate_pattern(filter: &Filter) -> Option<String> {
    if !filter.is_regex {
        return None;
    }
    build_regex(&filter.pattern, filter.case_sensitive)
        .err()
        .map(|e| e.to_string())
}

fn build_regex(pattern: &str, case_sensitive: bool) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern)
        .case_insensitive(!case_sensitive)
        .build()
}

/// A filter pattern prepared for repeated matching
#[derive(Debug, Clone)]
pub enum CompiledPattern {
    /// Substring search; the needle is already lowercased when case-insensitive
    Literal { needle: String, case_sensitive: bool },
    Regex(Regex),
    /// Invalid regex, matches nothing
    Never,
}

impl CompiledPattern {
    pub fn compile(filter: &Filter) -> Self {
        if filter.is_regex {
            match build_regex(&filter.pattern, filter.case_sensitive) {
                Ok(regex) => CompiledPattern::Regex(regex),
                Err(e) => {
                    tracing::debug!(
                        filter = %filter.id,
                        pattern = %filter.pattern,
                        error = %e,
                        "invalid regex, filter will match nothing"
                    );
                    CompiledPattern::Never
                }
            }
        } else if filter.case_sensitive {
            CompiledPattern::Literal {
                needle: filter.pattern.clone(),
                case_sensitive: true,
            }
        } else {
            CompiledPattern::Literal {
                needle: filter.pattern.to_lowercase(),
                case_sensitive: false,
            }
        }
    }

    pub fn is_match(&self, line: &str) -> bool {
        match self {
            CompiledPattern::Literal {
                needle,
                case_sensitive: true,
            } => line.contains(needle.as_str()),
            CompiledPattern::Literal {
                needle,
                case_sensitive: false,
            } => line.to_lowercase().contains(needle.as_str()),
            CompiledPattern::Regex(regex) => regex.is_match(line),
            CompiledPattern::Never => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CacheKey {
    pattern: String,
    case_sensitive: bool,
    is_regex: bool,
}

impl CacheKey {
    fn of(filter: &Filter) -> Self {
        Self {
            pattern: filter.pattern.clone(),
            case_sensitive: filter.case_sensitive,
            is_regex: filter.is_regex,
        }
    }

    fn describes(&self, filter: &Filter) -> bool {
        self.case_sensitive == filter.case_sensitive
            && self.is_regex == filter.is_regex
            && self.pattern == filter.pattern
    }
}

/// Compiled patterns kept between recomputations.
///
/// Entries are keyed by filter id and recompiled whenever the filter's
/// pattern, case sensitivity or regex mode no longer matches the entry.
#[derive(Debug, Default)]
pub struct PatternCache {
    entries: HashMap<FilterId, (CacheKey, CompiledPattern)>,
}

impl PatternCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the compiled pattern for a filter, compiling it if needed.
    pub fn get(&mut self, filter: &Filter) -> CompiledPattern {
        if let Some((key, compiled)) = self.entries.get(&filter.id) {
            if key.describes(filter) {
                return compiled.clone();
            }
        }

        let compiled = CompiledPattern::compile(filter);
        self.entries
            .insert(filter.id.clone(), (CacheKey::of(filter), compiled.clone()));
        compiled
    }

    /// Drop entries whose filter is no longer alive.
    pub fn prune<'a>(&mut self, live: impl IntoIterator<Item = &'a FilterId>) {
        let live: std::collections::HashSet<&FilterId> = live.into_iter().collect();
        self.entries.retain(|id, _| live.contains(id));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::model::{FilterPatch, NewFilter};

    fn literal(pattern: &str, case_sensitive: bool) -> Filter {
        NewFilter::include(pattern)
            .case_sensitive(case_sensitive)
            .build()
            .unwrap()
    }

    fn regex(pattern: &str, case_sensitive: bool) -> Filter {
        NewFilter::include(pattern)
            .regex(true)
            .case_sensitive(case_sensitive)
            .build()
            .unwrap()
    }

    #[test]
    fn test_literal_is_case_insensitive_by_default() {
        assert!(matches("ERROR: disk", &literal("error", false)));
        assert!(!matches("ERROR: disk", &literal("error", true)));
        assert!(matches("ERROR: disk", &literal("ERROR", true)));
    }

    #[test]
    fn test_literal_folds_unicode() {
        assert!(matches("Ärger im Büro", &literal("ärger", false)));
    }

    #[test]
    fn test_literal_treats_regex_syntax_as_text() {
        assert!(matches("value [x] set", &literal("[x]", false)));
        assert!(!matches("value x set", &literal("[x]", false)));
    }

    #[test]
    fn test_regex_is_unanchored() {
        assert!(matches("took 250ms", &regex(r"\d+ms", true)));
        assert!(!matches("took fast", &regex(r"\d+ms", true)));
    }

    #[test]
    fn test_regex_case_flag() {
        assert!(matches("Timeout reached", &regex("timeout", false)));
        assert!(!matches("Timeout reached", &regex("timeout", true)));
    }

    #[test]
    fn test_invalid_regex_matches_nothing() {
        let filter = regex("(unclosed", false);
        assert!(!matches("anything", &filter));
        assert!(!matches("(unclosed", &filter));
        assert!(validate_pattern(&filter).is_some());
    }

    #[test]
    fn test_validate_pattern_accepts_literals() {
        assert_eq!(validate_pattern(&literal("(unclosed", false)), None);
        assert_eq!(validate_pattern(&regex("a|b", false)), None);
    }

    #[test]
    fn test_cache_reuses_and_recompiles() {
        let mut cache = PatternCache::new();
        let mut filter = literal("error", false);

        assert!(cache.get(&filter).is_match("ERROR"));
        assert_eq!(cache.len(), 1);

        filter.apply(FilterPatch::new().case_sensitive(true)).unwrap();
        assert!(!cache.get(&filter).is_match("ERROR"));

        filter
            .apply(FilterPatch::new().pattern("(oops").regex(true))
            .unwrap();
        assert!(!cache.get(&filter).is_match("(oops"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_prune_drops_dead_filters() {
        let mut cache = PatternCache::new();
        let keep = literal("a", false);
        let drop = literal("b", false);
        cache.get(&keep);
        cache.get(&drop);

        cache.prune([&keep.id]);
        assert_eq!(cache.len(), 1);
    }
}
