pub mod cli;
pub mod config;
pub mod document;
pub mod filter;
pub mod pipeline;
pub mod render;
pub mod store;
pub mod tab;

use crate::config::ViewerConfig;
use crate::document::{TabDocument, load_document};
use crate::render::{FilterStat, RenderOptions, StatsReport};
use anyhow::{Context, bail};
pub use cli::{Cli, ColorMode, Commands, FilterArgs, OutputFormat, PatternArgs, cli_parse};
pub use document::DocumentError;
pub use filter::{Color, Filter, FilterError, FilterId, FilterKind, FilterPatch, NewFilter};
pub use pipeline::{LogLine, ViewSummary, effective_filters, evaluate, split_lines};
pub use store::FilterStore;
pub use tab::{Tab, TabId};
use std::path::Path;

fn read_log_file(path: &Path) -> anyhow::Result<String> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read log file '{}'", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn tab_name_for(document: &TabDocument, path: &Path) -> String {
    if !document.name.trim().is_empty() {
        return document.name.clone();
    }
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .unwrap_or("tab")
        .to_string()
}

/// Build a store from tab documents, ad-hoc filters and a log file.
///
/// The `--global` document and the ad-hoc filters go into the global tab;
/// the `--tab` document becomes the active tab.
pub fn build_store(
    file: &Path,
    args: &FilterArgs,
    config: &ViewerConfig,
) -> anyhow::Result<FilterStore> {
    let mut store = FilterStore::new();
    let global = TabId::global();

    if let Some(path) = args.global.as_ref().or(config.filters.global.as_ref()) {
        let document = load_document(path)?;
        let count = store.import_document(&global, &document)?;
        tracing::info!(path = %path.display(), filters = count, "loaded global filters");
    }

    for filter in args.patterns.to_filters() {
        store
            .add_filter_to(&global, filter)
            .context("Invalid command-line filter")?;
    }

    if let Some(path) = args.tab.as_ref().or(config.filters.tab.as_ref()) {
        let document = load_document(path)?;
        let tab = store.add_tab(tab_name_for(&document, path));
        let count = store.import_document(&tab, &document)?;
        tracing::info!(path = %path.display(), filters = count, "loaded tab filters");
    }

    let content = read_log_file(file)?;
    store.load_content(&content, Some(file));
    Ok(store)
}

fn stats_report(store: &FilterStore) -> StatsReport {
    let active = store.active_tab();
    let mut scoped: Vec<(&str, &Filter)> = store
        .global_tab()
        .enabled_filters()
        .map(|f| (store.global_tab().name.as_str(), f))
        .collect();
    if !active.is_global() {
        scoped.extend(active.enabled_filters().map(|f| (active.name.as_str(), f)));
    }

    let filters: Vec<&Filter> = scoped.iter().map(|(_, f)| *f).collect();
    let counts = pipeline::match_counts(store.raw_lines(), &filters);

    StatsReport {
        summary: store.summary(),
        filters: scoped
            .iter()
            .zip(counts)
            .map(|((tab, filter), matches)| FilterStat::new(tab, filter, matches))
            .collect(),
    }
}

fn emit(output: Option<&Path>, text: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => std::fs::write(path, text)
            .with_context(|| format!("Failed to write output file '{}'", path.display())),
        None => {
            print!("{text}");
            Ok(())
        }
    }
}

/// Validates each document, returning the report and the number of invalid ones.
fn check_documents(paths: &[std::path::PathBuf], quiet: bool) -> (String, usize) {
    let mut report = String::new();
    let mut failed = 0usize;

    for path in paths {
        match load_document(path).and_then(|doc| doc.build_filters()) {
            Ok(filters) => {
                for (index, filter) in filters.iter().enumerate() {
                    if let Some(error) = filter::validate_pattern(filter) {
                        tracing::warn!(path = %path.display(), index, "invalid regex");
                        if !quiet {
                            eprintln!(
                                "Warning: {} filter #{} '{}' will match nothing: {}",
                                path.display(),
                                index,
                                filter.pattern,
                                error
                            );
                        }
                    }
                }
                report.push_str(&format!("ok: {} ({} filters)\n", path.display(), filters.len()));
            }
            Err(e) => {
                failed += 1;
                eprintln!("Error: {}: {}", path.display(), e);
            }
        }
    }

    (report, failed)
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    let config = config::load_config(cli.config.as_deref()).context("Failed to load config")?;
    render::apply_color_mode(cli.color);
    let output = cli.output.as_deref();

    if cli.verbose > 0 && !cli.quiet {
        eprintln!("Config profile: {}", config.profile_name);
        if let Some(out_path) = output {
            eprintln!("Output will be written to: {}", out_path.display());
        }
    }

    match &cli.command {
        Commands::View {
            file,
            filters,
            show_hidden,
            line_numbers,
            no_line_numbers,
        } => {
            let store = build_store(file, filters, &config)?;
            let text = match cli.format {
                OutputFormat::Text => {
                    let options = RenderOptions {
                        line_numbers: if *no_line_numbers {
                            false
                        } else {
                            *line_numbers || config.display.line_numbers
                        },
                        show_hidden: *show_hidden || config.display.show_hidden,
                        hidden_marker: config.display.hidden_marker.clone(),
                    };
                    render::format_lines_text(store.lines(), &options)
                }
                OutputFormat::Json => {
                    let mut json = render::format_lines_json(store.lines())
                        .context("Failed to serialize lines")?;
                    json.push('\n');
                    json
                }
            };
            emit(output, &text)?;

            let summary = store.summary();
            tracing::info!(
                total = summary.total,
                visible = summary.visible,
                hidden = summary.hidden,
                "rendered view"
            );
        }
        Commands::Stats { file, filters } => {
            let store = build_store(file, filters, &config)?;
            let report = stats_report(&store);
            let text = match cli.format {
                OutputFormat::Text => render::format_stats_text(&report),
                OutputFormat::Json => {
                    let mut json = serde_json::to_string_pretty(&report)
                        .context("Failed to serialize stats")?;
                    json.push('\n');
                    json
                }
            };
            emit(output, &text)?;
        }
        Commands::Export { name, patterns } => {
            if patterns.is_empty() && !cli.quiet {
                eprintln!("Warning: no filters given, exporting an empty tab");
            }
            let mut store = FilterStore::new();
            let tab = store.add_tab(name.clone());
            for filter in patterns.to_filters() {
                store
                    .add_filter_to(&tab, filter)
                    .context("Invalid command-line filter")?;
            }
            let mut json = store.save_tab_to_json(&tab)?;
            json.push('\n');
            emit(output, &json)?;
        }
        Commands::Check { documents } => {
            let (report, failed) = check_documents(documents, cli.quiet);
            if !cli.quiet {
                emit(output, &report)?;
            }
            if failed > 0 {
                bail!("{failed} of {} tab documents are invalid", documents.len());
            }
        }
    }

    Ok(())
}
