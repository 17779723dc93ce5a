//! Browser-side checks, run with `wasm-pack test --headless --chrome`
#![cfg(target_arch = "wasm32")]

use gpass_companion::credential::CollectionSnapshot;
use gpass_companion::domain::normalize_url;
use gpass_companion::operations::TableView;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn normalize_runs_in_browser() {
    assert_eq!(normalize_url("https://example.com/login?x=1").as_str(), "example.com");
    assert_eq!(normalize_url("file:///c:/x").as_str(), "/c:/x");
}

#[wasm_bindgen_test]
fn empty_snapshot_projects_no_rows() {
    let snapshot = CollectionSnapshot::default();
    assert!(TableView::default().project(&snapshot).is_empty());
}
