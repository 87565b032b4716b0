use crate::filter::{Color, ColorPreset, FilterKind, NewFilter};
use clap::Args;
use std::path::PathBuf;

/// Tab documents plus filters given directly on the command line
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Tab document loaded into the global tab
    #[arg(long, value_name = "DOC")]
    pub global: Option<PathBuf>,

    /// Tab document loaded as the active tab
    #[arg(long, value_name = "DOC")]
    pub tab: Option<PathBuf>,

    #[command(flatten)]
    pub patterns: PatternArgs,
}

/// Filters given directly on the command line
#[derive(Args, Debug, Clone, Default)]
pub struct PatternArgs {
    /// Show only lines containing PATTERN (repeatable)
    #[arg(short = 'i', long, value_name = "PATTERN")]
    pub include: Vec<String>,

    /// Hide lines containing PATTERN (repeatable)
    #[arg(short = 'e', long, value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// Color lines containing PATTERN (repeatable)
    #[arg(short = 'H', long, value_name = "PATTERN")]
    pub highlight: Vec<String>,

    /// Treat patterns as regular expressions
    #[arg(long)]
    pub regex: bool,

    /// Match patterns case-sensitively
    #[arg(long)]
    pub case_sensitive: bool,

    /// Color pair for the filters [default: black-yellow for highlights, none otherwise]
    #[arg(long, value_enum)]
    pub preset: Option<ColorPreset>,

    /// Text color (#rrggbb), overrides the preset
    #[arg(long, value_name = "COLOR")]
    pub text_color: Option<Color>,

    /// Background color (#rrggbb), overrides the preset
    #[arg(long, value_name = "COLOR")]
    pub background_color: Option<Color>,
}

impl PatternArgs {
    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty() && self.highlight.is_empty()
    }

    /// Filters in the order includes, excludes, highlights.
    pub fn to_filters(&self) -> Vec<NewFilter> {
        let kinds = [
            (FilterKind::Include, &self.include),
            (FilterKind::Exclude, &self.exclude),
            (FilterKind::Highlight, &self.highlight),
        ];

        kinds
            .into_iter()
            .flat_map(|(kind, patterns)| patterns.iter().map(move |p| (kind, p)))
            .map(|(kind, pattern)| self.to_filter(kind, pattern))
            .collect()
    }

    fn to_filter(&self, kind: FilterKind, pattern: &str) -> NewFilter {
        let preset = self.preset.unwrap_or(match kind {
            FilterKind::Highlight => ColorPreset::BlackYellow,
            _ => ColorPreset::Default,
        });
        let (text, background) = preset.colors();

        NewFilter::new(pattern, kind)
            .regex(self.regex)
            .case_sensitive(self.case_sensitive)
            .text_color(self.text_color.or(text))
            .background_color(self.background_color.or(background))
    }
}
