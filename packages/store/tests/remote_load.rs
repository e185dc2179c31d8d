//! End-to-end loading and querying against the remote backend, using the
//! in-process mock server.

use std::fs;
use std::time::Duration;

use langpack_redis_kv::mock::MockRedis;
use langpack_redis_kv::PoolSettings;
use langpack_store::{LangStore, LoadMode, RemoteBackend, RemoteSettings, StoreConfig};
use tempfile::TempDir;

fn pack_dir(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (name, contents) in files {
        fs::write(dir.path().join(name), contents).unwrap();
    }
    dir
}

fn remote_store(dir: &TempDir, mock: &MockRedis) -> LangStore {
    LangStore::new(
        StoreConfig::default()
            .with_directory(dir.path())
            .with_mode(LoadMode::Remote)
            .with_remote(RemoteSettings::new(mock.endpoint())),
    )
}

// Injects a backend with a short checkout window so dial-failure tests do
// not sit out the default timeout per record.
fn remote_store_with_pool(dir: &TempDir, settings: PoolSettings) -> LangStore {
    LangStore::with_backend(
        StoreConfig::default()
            .with_directory(dir.path())
            .with_mode(LoadMode::Remote),
        Box::new(RemoteBackend::with_pool(settings)),
    )
}

#[test]
fn loads_records_into_the_remote_store() {
    let mock = MockRedis::start().unwrap();
    let dir = pack_dir(&[
        ("en.lps", "en\n1~Hello\n2~World\n"),
        ("fr.lps", "fr\n1~Bonjour\n"),
    ]);
    let mut store = remote_store(&dir, &mock);

    let mut results = store.load().unwrap();
    results.sort_by(|a, b| a.tag.cmp(&b.tag));
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.reality == r.estimate));

    // Records land under the flat key layout.
    assert_eq!(mock.value("lang::en::1"), Some("Hello".to_string()));
    assert_eq!(mock.value("lang::en::2"), Some("World".to_string()));
    assert_eq!(mock.value("lang::fr::1"), Some("Bonjour".to_string()));

    // And the query path reads them back through the pool.
    assert_eq!(store.query("en", 1), "Hello");
    assert_eq!(store.query("fr", 1), "Bonjour");
    assert_eq!(store.lookup("en", 1).unwrap(), Some("Hello".to_string()));
    assert_eq!(store.query("en", 99), "");
    assert_eq!(store.lookup("en", 99).unwrap(), None);
}

#[test]
fn malformed_lines_depress_reality_remotely_too() {
    let mock = MockRedis::start().unwrap();
    let dir = pack_dir(&[("en.lps", "en\n1~Hello\nseven~Hi\n2~A~B\n")]);
    let mut store = remote_store(&dir, &mock);

    let results = store.load().unwrap();
    assert_eq!(results[0].estimate, 2);
    assert_eq!(results[0].reality, 1);
    assert_eq!(mock.key_count(), 1);
}

#[test]
fn stale_keys_survive_a_reload() {
    let mock = MockRedis::start().unwrap();
    let dir = pack_dir(&[("en.lps", "en\n1~Hello\n")]);
    let mut store = remote_store(&dir, &mock);

    store.load().unwrap();
    assert_eq!(store.query("en", 1), "Hello");

    // A key the next load will not mention: reloading re-registers the
    // pool but never erases the remote key space.
    mock.insert("lang::en::999", "stale");
    store.load().unwrap();

    assert_eq!(mock.value("lang::en::999"), Some("stale".to_string()));
    assert_eq!(store.query("en", 999), "stale");
    assert_eq!(store.query("en", 1), "Hello");
}

#[test]
fn rejected_writes_depress_reality() {
    let mock = MockRedis::start().unwrap();
    mock.reject_writes(true);
    let dir = pack_dir(&[("en.lps", "en\n1~Hello\n2~World\n")]);
    let mut store = remote_store(&dir, &mock);

    let results = store.load().unwrap();
    assert_eq!(results[0].estimate, 2);
    assert_eq!(results[0].reality, 0);
    assert_eq!(mock.key_count(), 0);

    // The load still counts as done; the keys just never made it.
    assert!(store.is_loaded());
    assert_eq!(store.query("en", 1), "");
}

#[test]
fn rejected_credential_zeroes_reality_and_surfaces_in_lookup() {
    let mock = MockRedis::start_with_password("right").unwrap();
    let dir = pack_dir(&[("en.lps", "en\n1~Hello\n2~World\n")]);
    let settings = PoolSettings::new(mock.endpoint())
        .with_credential("wrong")
        .with_warm_idle(0)
        .with_checkout_timeout(Duration::from_millis(200));
    let mut store = remote_store_with_pool(&dir, settings);

    // Every commit fails at dial time; the load itself is not fatal.
    let results = store.load().unwrap();
    assert_eq!(results[0].estimate, 2);
    assert_eq!(results[0].reality, 0);

    // query collapses the backend failure, lookup reports it.
    assert_eq!(store.query("en", 1), "");
    assert!(store.lookup("en", 1).is_err());
}

#[test]
fn switching_to_memory_stops_serving_remote_records() {
    let mock = MockRedis::start().unwrap();
    let dir = pack_dir(&[("en.lps", "en\n1~Hello\n")]);
    let mut store = remote_store(&dir, &mock);

    store.load().unwrap();
    assert_eq!(store.query("en", 1), "Hello");

    store.set_mode(LoadMode::Memory);
    assert!(!store.is_loaded());
    assert_eq!(store.query("en", 1), "");

    // The remote key space is untouched by the switch.
    assert_eq!(mock.value("lang::en::1"), Some("Hello".to_string()));

    // Loading again in memory mode serves from the map instead.
    store.load().unwrap();
    assert_eq!(store.query("en", 1), "Hello");
}
