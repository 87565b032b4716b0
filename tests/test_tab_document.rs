use logtab::document::{TabDocument, load_document, save_document};
use logtab::filter::ColorPreset;
use logtab::{Color, DocumentError, Filter, FilterStore, NewFilter, TabId};
use std::collections::HashSet;
use tempfile::tempdir;

fn sample_store() -> (FilterStore, TabId) {
    let mut store = FilterStore::new();
    store.load_content("alpha\nbeta\ngamma", None);
    let tab = store.add_tab("Errors");
    store
        .add_filter(NewFilter::include("a").preset(ColorPreset::WhiteBlue))
        .unwrap();
    store
        .add_filter(NewFilter::exclude("^g").regex(true).case_sensitive(true))
        .unwrap();
    let disabled = store
        .add_filter(NewFilter::highlight("beta").text_color(Some(Color::rgb(1, 2, 3))))
        .unwrap();
    store.toggle_filter(&disabled);
    (store, tab)
}

fn without_id(filter: &Filter) -> NewFilter {
    NewFilter::from(filter)
}

#[test]
fn test_round_trip_assigns_fresh_unique_ids() {
    let (mut store, tab) = sample_store();
    let json = store.save_tab_to_json(&tab).unwrap();
    let original: Vec<Filter> = store.tab(&tab).unwrap().filters.clone();

    let fresh = store.add_tab("Copy");
    let loaded = store.load_tab_from_json(&fresh, &json).unwrap();
    assert_eq!(loaded, original.len());

    let copied = &store.tab(&fresh).unwrap().filters;
    let fields: Vec<NewFilter> = copied.iter().map(without_id).collect();
    let expected: Vec<NewFilter> = original.iter().map(without_id).collect();
    assert_eq!(fields, expected);

    let original_ids: HashSet<_> = original.iter().map(|f| f.id.clone()).collect();
    let copied_ids: HashSet<_> = copied.iter().map(|f| f.id.clone()).collect();
    assert_eq!(copied_ids.len(), copied.len(), "ids must be mutually unique");
    assert!(original_ids.is_disjoint(&copied_ids));
}

#[test]
fn test_import_keeps_tab_name_and_replaces_filters() {
    let (mut store, tab) = sample_store();
    let json = r#"{"name": "Other", "filters": [{"text": "gamma", "type": "include"}]}"#;

    assert_eq!(store.load_tab_from_json(&tab, json).unwrap(), 1);

    let imported = store.tab(&tab).unwrap();
    assert_eq!(imported.name, "Errors");
    assert_eq!(imported.filters.len(), 1);
    let visible: Vec<&str> = store.visible_lines().map(|l| l.text.as_str()).collect();
    assert_eq!(visible, vec!["gamma"]);
}

#[test]
fn test_failed_import_leaves_store_untouched() {
    let (mut store, tab) = sample_store();
    let before = store.tab(&tab).unwrap().clone();
    let lines = store.lines().to_vec();
    let revision = store.revision();

    let broken = [
        "{",
        r#"{"name": "x"}"#,
        r#"{"filters": [{"text": "ok", "type": "include"}, {"text": "", "type": "include"}]}"#,
        r#"{"filters": [{"text": "ok", "type": "include", "backgroundColor": "red"}]}"#,
        r#"{"filters": [{"text": "ok", "type": "include", "enabled": "yes"}]}"#,
    ];
    for json in broken {
        assert!(store.load_tab_from_json(&tab, json).is_err(), "{json} should fail");
    }

    assert_eq!(store.tab(&tab).unwrap(), &before);
    assert_eq!(store.lines(), lines.as_slice());
    assert_eq!(store.revision(), revision);
}

#[test]
fn test_import_into_unknown_tab_fails() {
    let mut store = FilterStore::new();
    let result = store.load_tab_from_json(&TabId::from("nope"), r#"{"filters": []}"#);
    assert!(matches!(result, Err(DocumentError::UnknownTab(_))));
}

#[test]
fn test_save_unknown_tab_fails() {
    let store = FilterStore::new();
    assert!(store.save_tab_to_json(&TabId::from("nope")).is_err());
}

#[test]
fn test_saved_document_has_no_ids_and_empty_missing_colors() {
    let (store, tab) = sample_store();
    let json = store.save_tab_to_json(&tab).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["name"], "Errors");
    let filters = value["filters"].as_array().unwrap();
    assert_eq!(filters.len(), 3);
    assert!(filters.iter().all(|f| f.get("id").is_none()));
    assert_eq!(filters[0]["textColor"], "#ffffff");
    assert_eq!(filters[0]["backgroundColor"], "#2563eb");
    assert_eq!(filters[1]["textColor"], "");
    assert_eq!(filters[1]["isRegex"], true);
    assert_eq!(filters[2]["enabled"], false);
}

#[test]
fn test_document_file_round_trip() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("errors.json");
    let (store, tab) = sample_store();

    let document = TabDocument::from_tab(store.tab(&tab).unwrap());
    save_document(&path, &document).unwrap();
    assert_eq!(load_document(&path).unwrap(), document);
}

#[test]
fn test_load_missing_document_reports_path() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("missing.json");
    let err = load_document(&path).unwrap_err();
    assert!(matches!(err, DocumentError::Read { .. }));
    assert!(err.to_string().contains("missing.json"));
}

#[test]
fn test_import_accepts_desktop_light_gray_token() {
    let mut store = FilterStore::new();
    store.load_content("noise\nsignal", None);
    let tab = store.add_tab("Imported");
    let json = r##"{"name": "Saved", "filters": [{
        "id": "1700000000000",
        "text": "signal",
        "type": "highlight",
        "textColor": "#gray-300",
        "backgroundColor": "",
        "caseSensitive": false,
        "isRegex": false,
        "enabled": true
    }]}"##;

    assert_eq!(store.load_tab_from_json(&tab, json).unwrap(), 1);

    let filter = &store.tab(&tab).unwrap().filters[0];
    assert_eq!(filter.text_color, Some(Color::rgb(0xd1, 0xd5, 0xdb)));
    assert_ne!(filter.id.as_str(), "1700000000000");
    assert_eq!(store.lines()[1].text_color, Some(Color::rgb(0xd1, 0xd5, 0xdb)));

    let saved: serde_json::Value =
        serde_json::from_str(&store.save_tab_to_json(&tab).unwrap()).unwrap();
    assert_eq!(saved["filters"][0]["textColor"], "#d1d5db");
}
