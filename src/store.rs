use crate::filter::{Filter, FilterError, FilterId, FilterPatch, NewFilter, PatternCache};
use crate::pipeline::{LogLine, ViewSummary, effective_filters, evaluate_with_cache, split_lines};
use crate::tab::{Tab, TabId};
use std::path::{Path, PathBuf};

/// Tabs, the loaded file and the lines derived from them.
///
/// Every mutation that can change the outcome of evaluation re-runs the
/// pipeline before returning, so [`FilterStore::lines`] is always current.
/// [`FilterStore::revision`] counts those recomputations.
#[derive(Debug)]
pub struct FilterStore {
    tabs: Vec<Tab>,
    active: TabId,
    raw_lines: Vec<String>,
    lines: Vec<LogLine>,
    file_path: Option<PathBuf>,
    cache: PatternCache,
    revision: u64,
}

impl Default for FilterStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterStore {
    pub fn new() -> Self {
        Self {
            tabs: vec![Tab::global()],
            active: TabId::global(),
            raw_lines: Vec::new(),
            lines: Vec::new(),
            file_path: None,
            cache: PatternCache::new(),
            revision: 0,
        }
    }

    // ---- file ----

    /// Replace the loaded file content.
    pub fn load_content(&mut self, content: &str, path: Option<&Path>) {
        self.raw_lines = split_lines(content);
        self.file_path = path.map(Path::to_path_buf);
        self.recompute();
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn raw_lines(&self) -> &[String] {
        &self.raw_lines
    }

    pub fn lines(&self) -> &[LogLine] {
        &self.lines
    }

    pub fn visible_lines(&self) -> impl Iterator<Item = &LogLine> {
        self.lines.iter().filter(|l| l.visible)
    }

    pub fn summary(&self) -> ViewSummary {
        ViewSummary::of(&self.lines)
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    // ---- tabs ----

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn tab(&self, id: &TabId) -> Option<&Tab> {
        self.tabs.iter().find(|t| &t.id == id)
    }

    fn tab_mut(&mut self, id: &TabId) -> Option<&mut Tab> {
        self.tabs.iter_mut().find(|t| &t.id == id)
    }

    pub fn global_tab(&self) -> &Tab {
        // Always first: created in `new`, never removed.
        &self.tabs[0]
    }

    pub fn active_tab_id(&self) -> &TabId {
        &self.active
    }

    pub fn active_tab(&self) -> &Tab {
        self.tab(&self.active).unwrap_or_else(|| self.global_tab())
    }

    /// Create an empty tab and make it active.
    pub fn add_tab(&mut self, name: impl Into<String>) -> TabId {
        let tab = Tab::new(name);
        let id = tab.id.clone();
        tracing::debug!(tab = %id, name = %tab.name, "adding tab");
        self.tabs.push(tab);
        self.active = id.clone();
        self.recompute();
        id
    }

    /// Rename a tab. The global tab cannot be renamed; that is ignored.
    pub fn rename_tab(&mut self, id: &TabId, name: impl Into<String>) -> bool {
        if id.is_global() {
            tracing::debug!("ignoring rename of the global tab");
            return false;
        }
        match self.tab_mut(id) {
            Some(tab) => {
                tab.name = name.into();
                true
            }
            None => false,
        }
    }

    /// Remove a tab and its filters. The global tab cannot be removed; that
    /// is ignored. Removing the active tab activates the global tab.
    pub fn remove_tab(&mut self, id: &TabId) -> bool {
        if id.is_global() {
            tracing::debug!("ignoring removal of the global tab");
            return false;
        }
        let before = self.tabs.len();
        self.tabs.retain(|t| &t.id != id);
        if self.tabs.len() == before {
            return false;
        }
        if &self.active == id {
            self.active = TabId::global();
        }
        self.recompute();
        true
    }

    pub fn set_active_tab(&mut self, id: &TabId) -> bool {
        if self.tab(id).is_none() {
            return false;
        }
        self.active = id.clone();
        self.recompute();
        true
    }

    // ---- filters ----

    pub fn filter(&self, id: &FilterId) -> Option<&Filter> {
        self.tabs
            .iter()
            .flat_map(|t| t.filters.iter())
            .find(|f| &f.id == id)
    }

    /// The tab owning a filter.
    pub fn tab_of(&self, id: &FilterId) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.position(id).is_some())
    }

    fn filter_mut(&mut self, id: &FilterId) -> Option<&mut Filter> {
        self.tabs
            .iter_mut()
            .flat_map(|t| t.filters.iter_mut())
            .find(|f| &f.id == id)
    }

    /// Add a filter to the active tab.
    pub fn add_filter(&mut self, filter: NewFilter) -> Result<FilterId, FilterError> {
        let active = self.active.clone();
        self.add_filter_to(&active, filter)
    }

    pub fn add_filter_to(
        &mut self,
        tab: &TabId,
        filter: NewFilter,
    ) -> Result<FilterId, FilterError> {
        let filter = filter.build()?;
        let id = filter.id.clone();
        let tab = self
            .tab_mut(tab)
            .ok_or_else(|| FilterError::UnknownTab(tab.to_string()))?;
        tab.filters.push(filter);
        self.recompute();
        Ok(id)
    }

    /// Patch a filter in place. Returns `Ok(false)` if no such filter exists.
    pub fn update_filter(
        &mut self,
        id: &FilterId,
        patch: FilterPatch,
    ) -> Result<bool, FilterError> {
        let Some(filter) = self.filter_mut(id) else {
            return Ok(false);
        };
        filter.apply(patch)?;
        self.recompute();
        Ok(true)
    }

    pub fn remove_filter(&mut self, id: &FilterId) -> bool {
        let Some(tab) = self.tabs.iter_mut().find(|t| t.position(id).is_some()) else {
            return false;
        };
        tab.filters.retain(|f| &f.id != id);
        self.recompute();
        true
    }

    pub fn toggle_filter(&mut self, id: &FilterId) -> bool {
        let Some(filter) = self.filter_mut(id) else {
            return false;
        };
        filter.enabled = !filter.enabled;
        self.recompute();
        true
    }

    pub fn set_filter_enabled(&mut self, id: &FilterId, enabled: bool) -> bool {
        let Some(filter) = self.filter_mut(id) else {
            return false;
        };
        filter.enabled = enabled;
        self.recompute();
        true
    }

    /// Move a filter within its tab; `to` is clamped to the last position.
    pub fn move_filter(&mut self, id: &FilterId, to: usize) -> bool {
        let Some(tab) = self.tabs.iter_mut().find(|t| t.position(id).is_some()) else {
            return false;
        };
        tab.move_filter(id, to);
        self.recompute();
        true
    }

    /// Replace every filter of a tab. Used by document import.
    pub(crate) fn replace_filters(
        &mut self,
        tab: &TabId,
        filters: Vec<Filter>,
    ) -> Result<(), FilterError> {
        let target = self
            .tab_mut(tab)
            .ok_or_else(|| FilterError::UnknownTab(tab.to_string()))?;
        target.filters = filters;
        self.recompute();
        Ok(())
    }

    /// Re-run the pipeline over every loaded line.
    pub fn recompute(&mut self) {
        let mut cache = std::mem::take(&mut self.cache);
        let filters = effective_filters(self.global_tab(), self.tab(&self.active));
        let lines = evaluate_with_cache(&self.raw_lines, &filters, &mut cache);
        cache.prune(self.tabs.iter().flat_map(|t| t.filters.iter().map(|f| &f.id)));

        self.cache = cache;
        self.lines = lines;
        self.revision += 1;
        tracing::debug!(revision = self.revision, lines = self.lines.len(), "recomputed view");
    }
}
