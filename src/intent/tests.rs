//! Unit tests for pattern extraction tables and the tag index.

use super::{DomainKeywordTable, IntentTag, PatternIndex, PatternTable};
use rstest::rstest;

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_owned()).collect()
}

fn tag_names(tags: &[IntentTag]) -> Vec<&str> {
    tags.iter().map(IntentTag::as_str).collect()
}

// ── PatternTable ───────────────────────────────────────────────────

#[rstest]
#[case("Edit tournament details", "edit")]
#[case("UPDATE player records", "edit")]
#[case("Display recent events", "show")]
#[case("List organizations", "show")]
#[case("Synchronize with start.gg", "sync")]
#[case("Fetch standings", "sync")]
#[case("Generate HTML rankings", "generate")]
#[case("Make heatmaps", "generate")]
fn capability_verbs_map_to_tags(#[case] capability: &str, #[case] expected: &str) {
    let tags = PatternTable::default().extract(&strings(&[capability]), &[]);
    assert!(
        tag_names(&tags).contains(&expected),
        "expected '{capability}' to produce '{expected}', got {tags:?}"
    );
}

#[rstest]
#[case("db.ask('top 10')", "ask")]
#[case("editor.tell('json')", "tell")]
#[case("sync.do('refresh')", "do")]
fn example_markers_map_to_tags(#[case] example: &str, #[case] expected: &str) {
    let tags = PatternTable::default().extract(&[], &strings(&[example]));
    assert_eq!(tag_names(&tags), vec![expected]);
}

#[rstest]
fn example_markers_need_the_open_parenthesis() {
    let tags = PatternTable::default().extract(&[], &strings(&["just ask about players"]));
    assert!(tags.is_empty());
}

#[rstest]
fn capability_verbs_are_not_read_from_examples() {
    let tags = PatternTable::default().extract(&[], &strings(&["show top players"]));
    assert!(tags.is_empty());
}

#[rstest]
fn extracted_tags_are_distinct_and_in_table_order() {
    let tags = PatternTable::default().extract(
        &strings(&["sync tournaments", "show players", "list venues", "fetch events"]),
        &strings(&["db.ask('x')", "db.ask('y')"]),
    );
    assert_eq!(tag_names(&tags), vec!["show", "sync", "ask"]);
}

#[rstest]
fn custom_tables_replace_the_default_vocabulary() {
    let table = PatternTable::empty().with_capability_rule("publish", ["Shopify"]);
    let tags = table.extract(&strings(&["push pages to shopify", "edit pages"]), &[]);
    assert_eq!(tag_names(&tags), vec!["publish"]);
}

// ── PatternIndex ───────────────────────────────────────────────────

#[rstest]
fn index_records_each_service_once_per_tag() {
    let mut index = PatternIndex::new();
    let tags = vec![IntentTag::new("sync"), IntentTag::new("show")];

    index.record("DB", &tags);
    index.record("DB", &tags);
    index.record("Sync", &[IntentTag::new("sync")]);

    assert_eq!(index.services_for("sync"), ["DB", "Sync"]);
    assert_eq!(index.services_for("show"), ["DB"]);
    assert_eq!(index.len(), 2);
}

#[rstest]
fn index_keeps_tags_in_first_seen_order() {
    let mut index = PatternIndex::new();
    index.record("A", &[IntentTag::new("show")]);
    index.record("B", &[IntentTag::new("edit"), IntentTag::new("show")]);

    let tags: Vec<String> = index.tags().iter().map(ToString::to_string).collect();
    assert_eq!(tags, vec!["show", "edit"]);
}

#[rstest]
fn unknown_tag_has_no_services() {
    let index = PatternIndex::new();
    assert!(index.services_for("edit").is_empty());
    assert!(index.is_empty());
}

// ── DomainKeywordTable ─────────────────────────────────────────────

#[rstest]
fn default_keyword_table_matches_request_vocabulary() {
    let table = DomainKeywordTable::default();
    let keywords: Vec<&str> = table
        .matching("show tournament stats")
        .map(|entry| entry.keyword())
        .collect();
    assert_eq!(keywords, vec!["tournament", "stats"]);
}

#[rstest]
fn keyword_hints_match_service_names_case_insensitively() {
    let table = DomainKeywordTable::default();
    let entry = table
        .matching("tournament")
        .next()
        .expect("tournament keyword should match");
    assert_eq!(entry.hint_hits(&"My Database Service v2".to_lowercase()), 1);
    assert_eq!(entry.hint_hits("web editor"), 0);
}

#[rstest]
fn intent_tags_are_normalised() {
    assert_eq!(IntentTag::new("  SYNC ").as_str(), "sync");
}

// ── Blank entries ──────────────────────────────────────────────────

#[rstest]
fn blank_needles_and_tags_never_match() {
    let table = PatternTable::empty()
        .with_capability_rule("", ["zzz"])
        .with_capability_rule("show", ["", "  ", "show"])
        .with_example_rule("ask", [""]);

    assert_eq!(table.capability_rules().len(), 1);
    assert!(table.example_rules().is_empty());
    let tags = table.extract(&strings(&["anything at all"]), &strings(&["x.y()"]));
    assert!(tags.is_empty(), "got {tags:?}");
}

#[rstest]
fn blank_tags_are_not_indexed() {
    let mut index = PatternIndex::new();
    index.record("A", &[IntentTag::new("  "), IntentTag::new("sync")]);

    let tags: Vec<String> = index.tags().iter().map(ToString::to_string).collect();
    assert_eq!(tags, vec!["sync"]);
}

#[rstest]
fn blank_keywords_and_hints_are_skipped() {
    let table = DomainKeywordTable::empty()
        .with_entry("", ["Alpha"])
        .with_entry("beta", [""])
        .with_entry("gamma", ["", "Gamma Service"]);

    assert_eq!(table.entries().len(), 1);
    assert_eq!(table.matching("zzz").count(), 0);
    let entry = table.matching("gamma please").next().expect("gamma entry");
    assert_eq!(entry.hints(), ["gamma service".to_owned()]);
}
