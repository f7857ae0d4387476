//! Integration tests for the harvester
//!
//! These tests use wiremock to stand in for the dictionary service and run the full
//! harvest cycle end-to-end: alphabet walk, checkpointing, page cache and word
//! processing.

use royin_harvest::config::{Config, FetchStrategy};
use royin_harvest::lexicon::{compare, THAI_ALPHABET};
use royin_harvest::output::{load_snapshot, read_dictionary, write_dictionary};
use royin_harvest::state::Checkpoint;
use royin_harvest::storage::{cache_file_name, CheckpointStore, JsonCheckpointStore};
use royin_harvest::{harvest, HarvestError};
use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ENDPOINT: &str = "/Lookup/lookupDomain.php";

/// Creates a test configuration pointing every path into `dir`
fn create_test_config(server: &MockServer, dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.api.base_url = server.uri();
    config.fetcher.delay_ms = 0;
    config.fetcher.backoff_unit_ms = 1;
    config.fetcher.max_retries = 1;
    config.output.cache_dir = dir.path().join("cache").to_string_lossy().into_owned();
    config.output.checkpoint_path = dir
        .path()
        .join("scraper_progress.json")
        .to_string_lossy()
        .into_owned();
    config.output.dictionary_path = dir.path().join("th_TH.dic").to_string_lossy().into_owned();
    config.output.report_dir = dir.path().join("reports").to_string_lossy().into_owned();
    config
}

fn page(total: u64, words: &[&str]) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!([total, words]))
}

/// Mounts one page of one domain; mount these before [`mount_empty_domains`]
async fn mount_page(server: &MockServer, domain: char, page_no: u32, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(ENDPOINT))
        .and(query_param("domain", domain.to_string()))
        .and(query_param("page", page_no.to_string()))
        .respond_with(response)
        .mount(server)
        .await;
}

/// Every domain without a specific mock has no entries
async fn mount_empty_domains(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(ENDPOINT))
        .respond_with(page(0, &[]))
        .mount(server)
        .await;
}

async fn mount_dictionary(server: &MockServer) {
    mount_page(server, 'ก', 1, page(12, &["กา", "กิน", "ก้าว", "กา"])).await;
    mount_page(server, 'ก', 2, page(12, &["กรุงเทพมหานคร", "hello"])).await;
    mount_page(server, 'ข', 1, page(2, &["ขา", "ขาว"])).await;
    mount_empty_domains(server).await;
}

fn never() -> std::future::Pending<()> {
    std::future::pending()
}

#[tokio::test]
async fn test_full_harvest() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = Arc::new(create_test_config(&server, &dir));
    mount_dictionary(&server).await;

    let words = harvest(Arc::clone(&config), false, never()).await.unwrap();

    // Duplicate "กา" collapses, non-Thai "hello" is filtered out
    assert_eq!(words.len(), 6);
    assert!(words.iter().any(|w| w == "กรุงเทพมหานคร"));
    assert!(!words.iter().any(|w| w == "hello"));

    // Domains are concatenated in alphabet order, so ก words come first
    assert!(words.as_slice()[..4].iter().all(|w| w.starts_with('ก')));
    assert!(words.as_slice()[4..].iter().all(|w| w.starts_with('ข')));

    // The checkpoint is removed once the alphabet is exhausted
    assert!(!Path::new(&config.output.checkpoint_path).exists());

    // Every page fetched is cached
    let cache_dir = Path::new(&config.output.cache_dir);
    assert!(cache_dir.join(cache_file_name('ก', 1)).exists());
    assert!(cache_dir.join(cache_file_name('ก', 2)).exists());
    assert!(cache_dir.join(cache_file_name('ฮ', 1)).exists());
    assert!(!cache_dir.join(cache_file_name('ข', 2)).exists());

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), THAI_ALPHABET.len() + 1);
}

#[tokio::test]
async fn test_concurrent_strategy_matches_sequential() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&server, &dir);
    config.fetcher.strategy = FetchStrategy::Concurrent;
    config.fetcher.cache_enabled = false;
    mount_page(&server, 'ค', 1, page(25, &["คน", "ควาย"])).await;
    mount_page(&server, 'ค', 2, page(25, &["คอ"])).await;
    mount_page(&server, 'ค', 3, page(25, &["คำ"])).await;
    mount_empty_domains(&server).await;

    let concurrent = harvest(Arc::new(config.clone()), true, never())
        .await
        .unwrap();

    config.fetcher.strategy = FetchStrategy::Sequential;
    let sequential = harvest(Arc::new(config), true, never()).await.unwrap();

    assert_eq!(concurrent.len(), 4);
    assert_eq!(concurrent, sequential);
}

#[tokio::test]
async fn test_resume_skips_completed_domains() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = Arc::new(create_test_config(&server, &dir));

    let mut checkpoint = Checkpoint::new();
    checkpoint.mark_completed('ก', 0, vec!["กา".to_string(), "กบ".to_string()]);
    JsonCheckpointStore::new(&config.output.checkpoint_path)
        .save(&checkpoint)
        .unwrap();

    Mock::given(method("GET"))
        .and(path(ENDPOINT))
        .and(query_param("domain", "ก"))
        .respond_with(page(1, &["never"]))
        .expect(0)
        .mount(&server)
        .await;
    mount_page(&server, 'ข', 1, page(1, &["ขา"])).await;
    mount_empty_domains(&server).await;

    let words = harvest(Arc::clone(&config), false, never()).await.unwrap();

    assert_eq!(words.len(), 3);
    assert!(words.iter().any(|w| w == "กบ"));
    assert!(words.iter().any(|w| w == "ขา"));
}

#[tokio::test]
async fn test_fresh_ignores_checkpoint() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = Arc::new(create_test_config(&server, &dir));

    let mut checkpoint = Checkpoint::new();
    checkpoint.mark_completed('ก', 0, vec!["กบ".to_string()]);
    JsonCheckpointStore::new(&config.output.checkpoint_path)
        .save(&checkpoint)
        .unwrap();

    mount_page(&server, 'ก', 1, page(1, &["กา"])).await;
    mount_empty_domains(&server).await;

    let words = harvest(Arc::clone(&config), true, never()).await.unwrap();

    assert_eq!(words.as_slice(), &["กา".to_string()]);
}

#[tokio::test]
async fn test_failure_then_resume() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&server, &dir);
    config.fetcher.cache_enabled = false;
    let config = Arc::new(config);

    mount_page(&server, 'ก', 1, page(1, &["กา"])).await;
    mount_page(&server, 'ข', 1, ResponseTemplate::new(404)).await;
    mount_empty_domains(&server).await;

    let result = harvest(Arc::clone(&config), false, never()).await;
    assert!(matches!(result, Err(HarvestError::Fetch(_))));

    let stored = JsonCheckpointStore::new(&config.output.checkpoint_path)
        .load()
        .unwrap()
        .unwrap();
    assert!(stored.is_completed('ก'));
    assert!(!stored.is_completed('ข'));
    assert_eq!(stored.current_domain_index, 1);

    // The service recovers; ก must not be requested again
    server.reset().await;
    Mock::given(method("GET"))
        .and(path(ENDPOINT))
        .and(query_param("domain", "ก"))
        .respond_with(page(1, &["never"]))
        .expect(0)
        .mount(&server)
        .await;
    mount_page(&server, 'ข', 1, page(1, &["ขา"])).await;
    mount_empty_domains(&server).await;

    let words = harvest(Arc::clone(&config), false, never()).await.unwrap();
    assert_eq!(words.len(), 2);
    assert!(!Path::new(&config.output.checkpoint_path).exists());
}

#[tokio::test]
async fn test_second_run_served_from_cache() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = Arc::new(create_test_config(&server, &dir));
    mount_dictionary(&server).await;

    let first = harvest(Arc::clone(&config), false, never()).await.unwrap();

    server.reset().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let second = harvest(Arc::clone(&config), true, never()).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_shutdown_interrupts_harvest() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = Arc::new(create_test_config(&server, &dir));
    mount_dictionary(&server).await;

    let result = harvest(Arc::clone(&config), false, std::future::ready(())).await;

    assert!(matches!(result, Err(HarvestError::Interrupted)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_harvest_then_sync_dictionary() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = Arc::new(create_test_config(&server, &dir));
    mount_dictionary(&server).await;

    let dictionary_path = Path::new(&config.output.dictionary_path);
    write_dictionary(&["กา", "ขา", "ฮา"], dictionary_path, None).unwrap();

    let words = harvest(Arc::clone(&config), false, never()).await.unwrap();
    let old = load_snapshot(dictionary_path).unwrap();
    let diff = compare(&old, words.as_slice());

    assert_eq!(diff.removed_count(), 1);
    assert!(diff.removed.contains("ฮา"));
    assert_eq!(diff.added_count(), 4);

    write_dictionary(words.as_slice(), dictionary_path, Some("synced")).unwrap();
    assert_eq!(read_dictionary(dictionary_path).unwrap(), words.into_inner());
}
