//! Filter evaluation over a whole file
//!
//! Every line is decided independently:
//!
//! 1. Without enabled include filters a line starts visible. Otherwise it is
//!    visible only if an include matches, and the first matching include
//!    supplies its colors.
//! 2. Any matching exclude hides the line.
//! 3. A still-visible line takes the colors of the first matching highlight.
//!
//! Filters are considered in the order given, which is global tab first,
//! then the active tab (see [`effective_filters`]).

use crate::filter::{Color, CompiledPattern, Filter, FilterKind, PatternCache};
use crate::tab::Tab;
use serde::Serialize;

/// Render directive for one line of the loaded file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogLine {
    pub index: usize,
    pub text: String,
    pub visible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Color>,
}

impl LogLine {
    pub fn is_styled(&self) -> bool {
        self.text_color.is_some() || self.background_color.is_some()
    }
}

/// Counts describing a computed view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ViewSummary {
    pub total: usize,
    pub visible: usize,
    pub hidden: usize,
    pub styled: usize,
}

impl ViewSummary {
    pub fn of(lines: &[LogLine]) -> Self {
        let visible = lines.iter().filter(|l| l.visible).count();
        Self {
            total: lines.len(),
            visible,
            hidden: lines.len() - visible,
            styled: lines.iter().filter(|l| l.visible && l.is_styled()).count(),
        }
    }
}

/// Split file content into lines on `'\n'`.
///
/// A trailing newline produces a final empty line, and empty content is a
/// single empty line.
pub fn split_lines(content: &str) -> Vec<String> {
    content.split('\n').map(str::to_string).collect()
}

/// The enabled filters taking part in evaluation: global first, then the
/// active tab unless it is the global tab itself.
pub fn effective_filters<'a>(global: &'a Tab, active: Option<&'a Tab>) -> Vec<&'a Filter> {
    let mut filters: Vec<&Filter> = global.enabled_filters().collect();
    if let Some(active) = active.filter(|t| !t.is_global()) {
        filters.extend(active.enabled_filters());
    }
    filters
}

struct Stage<'a> {
    filter: &'a Filter,
    pattern: CompiledPattern,
}

impl Stage<'_> {
    fn colors(&self) -> (Option<Color>, Option<Color>) {
        (self.filter.text_color, self.filter.background_color)
    }
}

struct Partition<'a> {
    includes: Vec<Stage<'a>>,
    excludes: Vec<Stage<'a>>,
    highlights: Vec<Stage<'a>>,
}

impl<'a> Partition<'a> {
    fn new(filters: &[&'a Filter], cache: &mut PatternCache) -> Self {
        let mut partition = Partition {
            includes: Vec::new(),
            excludes: Vec::new(),
            highlights: Vec::new(),
        };

        for filter in filters.iter().copied().filter(|f| f.enabled) {
            let stage = Stage {
                filter,
                pattern: cache.get(filter),
            };
            match filter.kind {
                FilterKind::Include => partition.includes.push(stage),
                FilterKind::Exclude => partition.excludes.push(stage),
                FilterKind::Highlight => partition.highlights.push(stage),
            }
        }

        partition
    }

    fn decide(&self, index: usize, text: &str) -> LogLine {
        let mut visible = self.includes.is_empty();
        let mut colors = (None, None);

        if let Some(stage) = self.includes.iter().find(|s| s.pattern.is_match(text)) {
            visible = true;
            colors = stage.colors();
        }

        if visible && self.excludes.iter().any(|s| s.pattern.is_match(text)) {
            visible = false;
        }

        if visible {
            if let Some(stage) = self.highlights.iter().find(|s| s.pattern.is_match(text)) {
                colors = stage.colors();
            }
        }

        LogLine {
            index,
            text: text.to_string(),
            visible,
            text_color: colors.0,
            background_color: colors.1,
        }
    }
}

/// Evaluate `filters` against every line, compiling patterns once.
pub fn evaluate<S: AsRef<str>>(lines: &[S], filters: &[&Filter]) -> Vec<LogLine> {
    evaluate_with_cache(lines, filters, &mut PatternCache::new())
}

/// Like [`evaluate`], reusing compiled patterns from `cache`.
pub fn evaluate_with_cache<S: AsRef<str>>(
    lines: &[S],
    filters: &[&Filter],
    cache: &mut PatternCache,
) -> Vec<LogLine> {
    let partition = Partition::new(filters, cache);
    tracing::debug!(
        lines = lines.len(),
        includes = partition.includes.len(),
        excludes = partition.excludes.len(),
        highlights = partition.highlights.len(),
        "evaluating filters"
    );

    lines
        .iter()
        .enumerate()
        .map(|(index, line)| partition.decide(index, line.as_ref()))
        .collect()
}

/// Number of lines each filter matches, in filter order.
///
/// Counts raw matches, independent of precedence.
pub fn match_counts<S: AsRef<str>>(lines: &[S], filters: &[&Filter]) -> Vec<usize> {
    filters
        .iter()
        .map(|filter| {
            let pattern = CompiledPattern::compile(filter);
            lines
                .iter()
                .filter(|line| pattern.is_match(line.as_ref()))
                .count()
        })
        .collect()
}
