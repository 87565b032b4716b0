use crate::filter::{Filter, FilterId};
use std::fmt;
use uuid::Uuid;

pub const GLOBAL_TAB_ID: &str = "global";
pub const GLOBAL_TAB_NAME: &str = "Global";

/// Identifier of a tab. The reserved id `"global"` names the global tab.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TabId(String);

impl TabId {
    pub fn global() -> Self {
        TabId(GLOBAL_TAB_ID.to_string())
    }

    pub fn generate() -> Self {
        TabId(Uuid::new_v4().to_string())
    }

    pub fn is_global(&self) -> bool {
        self.0 == GLOBAL_TAB_ID
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TabId {
    fn from(s: &str) -> Self {
        TabId(s.to_string())
    }
}

/// A named, ordered group of filters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    pub id: TabId,
    pub name: String,
    pub filters: Vec<Filter>,
}

impl Tab {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: TabId::generate(),
            name: name.into(),
            filters: Vec::new(),
        }
    }

    pub fn global() -> Self {
        Self {
            id: TabId::global(),
            name: GLOBAL_TAB_NAME.to_string(),
            filters: Vec::new(),
        }
    }

    pub fn is_global(&self) -> bool {
        self.id.is_global()
    }

    pub fn position(&self, id: &FilterId) -> Option<usize> {
        self.filters.iter().position(|f| &f.id == id)
    }

    pub fn enabled_filters(&self) -> impl Iterator<Item = &Filter> {
        self.filters.iter().filter(|f| f.enabled)
    }

    /// Move a filter to `to`, clamped to the last position.
    pub fn move_filter(&mut self, id: &FilterId, to: usize) -> bool {
        let Some(from) = self.position(id) else {
            return false;
        };
        let filter = self.filters.remove(from);
        let to = to.min(self.filters.len());
        self.filters.insert(to, filter);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::NewFilter;

    fn tab_with(patterns: &[&str]) -> Tab {
        let mut tab = Tab::new("t");
        for p in patterns {
            tab.filters.push(NewFilter::include(*p).build().unwrap());
        }
        tab
    }

    fn patterns(tab: &Tab) -> Vec<&str> {
        tab.filters.iter().map(|f| f.pattern.as_str()).collect()
    }

    #[test]
    fn test_global_identity() {
        assert!(Tab::global().is_global());
        assert!(!Tab::new("errors").is_global());
        assert_eq!(TabId::from("global"), TabId::global());
    }

    #[test]
    fn test_move_filter_forward_and_back() {
        let mut tab = tab_with(&["a", "b", "c"]);
        let a = tab.filters[0].id.clone();

        assert!(tab.move_filter(&a, 2));
        assert_eq!(patterns(&tab), vec!["b", "c", "a"]);

        assert!(tab.move_filter(&a, 0));
        assert_eq!(patterns(&tab), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_move_filter_clamps_index() {
        let mut tab = tab_with(&["a", "b", "c"]);
        let b = tab.filters[1].id.clone();
        assert!(tab.move_filter(&b, 99));
        assert_eq!(patterns(&tab), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_move_unknown_filter() {
        let mut tab = tab_with(&["a"]);
        assert!(!tab.move_filter(&FilterId::generate(), 0));
    }
}
