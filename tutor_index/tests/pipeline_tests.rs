use std::time::Duration;
use tempfile::TempDir;
use tutor_index::models::{OverrideMap, TutorMap};
use tutor_index::{pipeline, store, Error, ReverseIndex, ResolvedSearches, Settings};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// Test fixtures

fn scraped_tutors_json() -> serde_json::Value {
    serde_json::json!({
        "Tinker": {
            "scryfall_uri": "https://scryfall.com/card/ulg/45/tinker",
            "relatedSearches": ["t:artifact cmc<=2"]
        },
        "Trinket Mage": {
            "scryfall_uri": "https://scryfall.com/card/dst/34/trinket-mage",
            "relatedSearches": ["this search gets overridden"]
        }
    })
}

fn overrides_json() -> serde_json::Value {
    serde_json::json!({
        "Trinket Mage": { "relatedSearches": ["t:artifact cmc<=1"] },
        "Custom Tutor": { "relatedSearches": ["t:land"] }
    })
}

fn bulk_json() -> serde_json::Value {
    serde_json::json!([
        { "name": "Sol Ring", "cmc": 1.0 },
        { "name": "Mind Stone", "cmc": 2.0 },
        { "name": "Forest", "cmc": 0.0 },
        { "name": "Island", "cmc": 0.0 }
    ])
}

async fn mock_search(server: &MockServer, query: &str, names: &[&str]) {
    let data: Vec<serde_json::Value> = names
        .iter()
        .map(|name| serde_json::json!({ "object": "card", "name": name }))
        .collect();
    Mock::given(method("GET"))
        .and(path("/cards/search"))
        .and(query_param("q", query))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "has_more": false, "data": data })),
        )
        .mount(server)
        .await;
}

fn test_settings(temp_dir: &TempDir, server: &MockServer) -> Settings {
    let mut settings = Settings::new(temp_dir.path());
    settings.api_base = server.uri();
    settings.delay = Duration::ZERO;
    settings
}

// Tests

#[tokio::test]
async fn test_merge_resolve_build_and_rank() {
    let server = MockServer::start().await;
    mock_search(&server, "f:commander t:artifact cmc<=2", &["Sol Ring", "Mind Stone"]).await;
    mock_search(&server, "f:commander t:artifact cmc<=1", &["Sol Ring"]).await;
    mock_search(&server, "f:commander t:land", &["Forest", "Island", "Unknown Land"]).await;

    let temp_dir = TempDir::new().unwrap();
    let settings = test_settings(&temp_dir, &server);
    let paths = &settings.paths;

    store::write_json(&paths.scraped_tutors(), &scraped_tutors_json()).unwrap();
    store::write_json(&paths.overrides(), &overrides_json()).unwrap();
    store::write_json(&paths.bulk_cards(), &bulk_json()).unwrap();

    // merge
    let merged = pipeline::merge(paths).unwrap();
    assert_eq!(merged.len(), 3);
    assert_eq!(merged["Trinket Mage"].related_searches, vec!["t:artifact cmc<=1"]);
    assert!(merged["Custom Tutor"].scryfall_uri.is_none());
    assert!(paths.merged_tutors().exists());

    // resolve
    let resolved = pipeline::resolve(&settings).await.unwrap();
    assert_eq!(
        resolved["Tinker"]
            .related_searches
            .get("t:artifact cmc<=2")
            .unwrap(),
        &["Sol Ring".to_string(), "Mind Stone".to_string()]
    );
    let on_disk: TutorMap<ResolvedSearches> = store::read_json(&paths.resolved_tutors()).unwrap();
    assert_eq!(on_disk, resolved);

    // build-index
    let index = pipeline::build_index(paths).unwrap();
    assert_eq!(index.len(), 5);
    assert_eq!(
        index.get("Sol Ring").unwrap().tutored_by,
        vec!["Tinker", "Trinket Mage"]
    );
    assert_eq!(index.get("Unknown Land").unwrap().tutored_by, vec!["Custom Tutor"]);
    let loaded = pipeline::load_index(paths).unwrap();
    assert_eq!(loaded, index);

    // deck
    let deck_path = temp_dir.path().join("deck.txt");
    std::fs::write(
        &deck_path,
        "1 Sol Ring (C21) 263\n1 Mind Stone\n1 Forest\n1 Lightning Bolt\nCommander\n",
    )
    .unwrap();
    let ranked = pipeline::resolve_deck_file(&loaded, &deck_path).unwrap();

    let summary: Vec<(&str, usize)> = ranked.iter().map(|c| (c.tutor.as_str(), c.count)).collect();
    assert_eq!(
        summary,
        vec![("Tinker", 2), ("Custom Tutor", 1), ("Trinket Mage", 1)]
    );
}

#[tokio::test]
async fn test_resolve_records_empty_result_for_failed_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cards/search"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "object": "error", "code": "not_found", "status": 404,
            "details": "Your query didn't match any cards."
        })))
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let settings = test_settings(&temp_dir, &server);
    store::write_json(
        &settings.paths.merged_tutors(),
        &serde_json::json!({ "Lonely Tutor": { "scryfall_uri": null, "relatedSearches": ["o:nothing"] } }),
    )
    .unwrap();

    let resolved = pipeline::resolve(&settings).await.unwrap();
    assert_eq!(
        resolved["Lonely Tutor"].related_searches.get("o:nothing"),
        Some(&[][..])
    );
}

#[test]
fn test_merge_without_override_file() {
    let temp_dir = TempDir::new().unwrap();
    let settings = Settings::new(temp_dir.path());
    store::write_json(&settings.paths.scraped_tutors(), &scraped_tutors_json()).unwrap();

    let merged = pipeline::merge(&settings.paths).unwrap();

    let scraped: TutorMap<Vec<String>> = store::read_json(&settings.paths.scraped_tutors()).unwrap();
    assert_eq!(merged, scraped);
}

#[test]
fn test_merge_requires_scraped_tutors() {
    let temp_dir = TempDir::new().unwrap();
    let settings = Settings::new(temp_dir.path());
    store::write_json(&settings.paths.overrides(), &overrides_json()).unwrap();

    assert!(matches!(
        pipeline::merge(&settings.paths),
        Err(Error::MissingInput { .. })
    ));
}

#[test]
fn test_broken_override_file_is_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let settings = Settings::new(temp_dir.path());
    store::write_json(&settings.paths.scraped_tutors(), &scraped_tutors_json()).unwrap();
    std::fs::write(settings.paths.overrides(), "{ broken").unwrap();

    let merged = pipeline::merge(&settings.paths).unwrap();

    let scraped: TutorMap<Vec<String>> = store::read_json(&settings.paths.scraped_tutors()).unwrap();
    assert_eq!(merged, scraped);
    assert!(settings.paths.merged_tutors().exists());
}

#[test]
fn test_unreadable_override_path_is_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let settings = Settings::new(temp_dir.path());
    store::write_json(&settings.paths.scraped_tutors(), &scraped_tutors_json()).unwrap();
    std::fs::create_dir(settings.paths.overrides()).unwrap();

    let merged = pipeline::merge(&settings.paths).unwrap();

    assert_eq!(merged.len(), 2);
    assert_eq!(
        merged["Trinket Mage"].related_searches,
        vec!["this search gets overridden"]
    );
}

#[test]
fn test_build_index_requires_bulk_data() {
    let temp_dir = TempDir::new().unwrap();
    let settings = Settings::new(temp_dir.path());
    store::write_json(&settings.paths.resolved_tutors(), &serde_json::json!({})).unwrap();

    match pipeline::build_index(&settings.paths) {
        Err(Error::MissingInput { path, .. }) => assert_eq!(path, settings.paths.bulk_cards()),
        other => panic!("Expected MissingInput, got: {other:?}"),
    }
}

#[test]
fn test_deck_file_missing() {
    let temp_dir = TempDir::new().unwrap();
    let result = pipeline::resolve_deck_file(&ReverseIndex::default(), &temp_dir.path().join("nope.txt"));
    assert!(matches!(result, Err(Error::MissingInput { .. })));
}

#[test]
fn test_count_related_searches() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("tutorsWithSearches.json");
    store::write_json(
        &path,
        &serde_json::json!({
            "A": { "scryfall_uri": null, "relatedSearches": ["t:land"] },
            "B": { "scryfall_uri": null, "relatedSearches": [] },
            "C": { "scryfall_uri": null }
        }),
    )
    .unwrap();

    let stats = pipeline::count_related_searches(&path).unwrap();
    assert_eq!(stats.with_searches, 1);
    assert_eq!(stats.total, 3);
}

#[test]
fn test_count_related_searches_on_resolved_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("tutorsWithFetchedRelatedCards.json");
    store::write_json(
        &path,
        &serde_json::json!({
            "Tinker": {
                "scryfall_uri": null,
                "relatedSearches": { "t:artifact": ["Sol Ring"] }
            },
            "Crop Rotation": { "scryfall_uri": null, "relatedSearches": ["t:land"] }
        }),
    )
    .unwrap();

    let stats = pipeline::count_related_searches(&path).unwrap();
    assert_eq!(stats.with_searches, 1);
    assert_eq!(stats.total, 2);
}

#[test]
fn test_override_map_type_reads_custom_file() {
    let overrides: OverrideMap<Vec<String>> = serde_json::from_value(overrides_json()).unwrap();
    assert_eq!(overrides.len(), 2);
}
