use crate::cli::ColorMode;
use crate::filter::{Color, Filter, validate_pattern};
use crate::pipeline::{LogLine, ViewSummary};
use colored::{ColoredString, Colorize};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, ContentArrangement, Table};
use serde::Serialize;
use std::fmt::Write as _;

/// Apply `--color` to the `colored` crate.
pub fn apply_color_mode(mode: ColorMode) {
    match mode {
        ColorMode::Always => colored::control::set_override(true),
        ColorMode::Never => colored::control::set_override(false),
        ColorMode::Auto => {}
    }
}

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub line_numbers: bool,
    pub show_hidden: bool,
    pub hidden_marker: String,
}

fn paint(text: &str, fg: Option<Color>, bg: Option<Color>) -> ColoredString {
    let mut painted = text.normal();
    if let Some(c) = fg {
        painted = painted.truecolor(c.r, c.g, c.b);
    }
    if let Some(c) = bg {
        painted = painted.on_truecolor(c.r, c.g, c.b);
    }
    painted
}

/// Format one line, or `None` if it is hidden and hidden lines are not shown.
pub fn format_line(line: &LogLine, options: &RenderOptions) -> Option<String> {
    if !line.visible && !options.show_hidden {
        return None;
    }

    let mut out = String::new();
    if options.line_numbers {
        let _ = write!(out, "{} ", format!("{:>6}", line.index + 1).bright_black());
    }

    if line.visible {
        let _ = write!(
            out,
            "{}",
            paint(&line.text, line.text_color, line.background_color)
        );
    } else {
        let _ = write!(
            out,
            "{}",
            format!("{} {}", options.hidden_marker, line.text).dimmed()
        );
    }
    Some(out)
}

pub fn format_lines_text(lines: &[LogLine], options: &RenderOptions) -> String {
    let mut out = String::new();
    for formatted in lines.iter().filter_map(|l| format_line(l, options)) {
        let _ = writeln!(out, "{formatted}");
    }
    out
}

/// All lines, hidden ones included, as a JSON array.
pub fn format_lines_json(lines: &[LogLine]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(lines)
}

pub fn create_styled_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers.iter().map(|h| Cell::new(h)));
    table
}

/// One row of the per-filter statistics
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterStat {
    pub tab: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub pattern: String,
    pub regex: bool,
    pub case_sensitive: bool,
    pub matches: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FilterStat {
    pub fn new(tab: &str, filter: &Filter, matches: usize) -> Self {
        Self {
            tab: tab.to_string(),
            kind: filter.kind.to_string(),
            pattern: filter.pattern.clone(),
            regex: filter.is_regex,
            case_sensitive: filter.case_sensitive,
            matches,
            error: validate_pattern(filter),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsReport {
    pub summary: ViewSummary,
    pub filters: Vec<FilterStat>,
}

pub fn format_stats_text(report: &StatsReport) -> String {
    let mut out = String::new();
    let summary = &report.summary;

    let _ = writeln!(out, "{}", "VIEW SUMMARY".bold());
    let _ = writeln!(out, "Total lines:   {}", summary.total);
    let _ = writeln!(out, "Visible lines: {}", summary.visible.to_string().green());
    let _ = writeln!(out, "Hidden lines:  {}", summary.hidden.to_string().red());
    let _ = writeln!(out, "Styled lines:  {}", summary.styled.to_string().yellow());

    if report.filters.is_empty() {
        let _ = writeln!(out, "\nNo enabled filters.");
        return out;
    }

    let mut table = create_styled_table(&["Tab", "Type", "Pattern", "Mode", "Matches"]);
    for stat in &report.filters {
        let mode = match (stat.regex, stat.case_sensitive) {
            (true, true) => "regex, case",
            (true, false) => "regex",
            (false, true) => "text, case",
            (false, false) => "text",
        };
        let matches = match &stat.error {
            Some(_) => "invalid regex".to_string(),
            None => stat.matches.to_string(),
        };
        table.add_row(vec![
            Cell::new(&stat.tab),
            Cell::new(&stat.kind),
            Cell::new(&stat.pattern),
            Cell::new(mode),
            Cell::new(matches),
        ]);
    }
    let _ = writeln!(out, "\n{table}");
    out
}
