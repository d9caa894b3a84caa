//! Integration tests for the embed library.

use async_trait::async_trait;
use motd_embed::error::FetchResult;
use motd_embed::{
    favicon, parse, parse_tree, render_embed, CacheConfig, Description, ExpiringCache,
    FetchError, ResolveError, ServerAddress, StatusFetcher, StatusLookup, StatusSnapshot,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[test]
fn test_cache_basic_workflow() {
    let cache = ExpiringCache::default();

    assert!(cache.is_empty());
    assert_eq!(cache.len(), 0);

    cache.set("key1", "value1".to_string());
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.get("key1").as_deref(), Some("value1"));

    assert!(cache.contains("key1"));
    assert!(!cache.contains("nonexistent"));

    cache.set("a", "1".to_string());
    cache.set("b", "2".to_string());
    assert_eq!(cache.len(), 3);
    cache.clear();
    assert!(cache.is_empty());
}

#[test]
fn test_ttl_expiration() {
    let config = CacheConfig::new().ttl(Duration::from_millis(50)).build();
    let cache = ExpiringCache::new(config);

    cache.set("expiring", 1u32);
    assert_eq!(cache.get("expiring"), Some(1));

    thread::sleep(Duration::from_millis(100));

    assert!(cache.get("expiring").is_none());
    assert_eq!(cache.len(), 0);
}

#[test]
fn test_lru_eviction() {
    let config = CacheConfig::new().max_capacity(3).build();
    let cache = ExpiringCache::new(config);

    cache.set("a", 1);
    cache.set("b", 2);
    cache.set("c", 3);

    // Access 'a' to make it recently used
    let _ = cache.get("a");

    cache.set("d", 4);
    assert_eq!(cache.len(), 3);

    assert!(cache.contains("a"));
    assert!(!cache.contains("b"));
    assert!(cache.contains("c"));
    assert!(cache.contains("d"));
    assert_eq!(cache.stats().evictions, 1);
}

#[test]
fn test_capacity_never_exceeded_under_concurrency() {
    let config = CacheConfig::new().max_capacity(100).build();
    let cache = ExpiringCache::new(config);

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let cache = cache.clone();
            thread::spawn(move || {
                for i in 0..1000 {
                    let key = format!("thread_{}_key_{}", t, i);
                    cache.set(key.clone(), i);
                    let _ = cache.get(&key);
                    assert!(cache.len() <= 100);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    assert_eq!(cache.len(), 100);
}

#[test]
fn test_stats_accuracy() {
    let cache = ExpiringCache::default();

    cache.set("key1", "value1");
    cache.set("key2", "value2");
    let _ = cache.get("key1");
    let _ = cache.get("key2");
    let _ = cache.get("missing");

    let stats = cache.stats();
    assert_eq!(stats.inserts, 2);
    assert_eq!(stats.hits, 2);
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.size, 2);
}

#[test]
fn test_parser_examples() {
    assert_eq!(parse(""), "");
    assert_eq!(
        parse("plain"),
        r#"<span class="mcformat mcformat-reset">plain</span>"#
    );
    assert_eq!(
        parse("§6Gold§rPlain"),
        concat!(
            r#"<span class="mcformat-code">§6</span>"#,
            r#"<span class="mcformat mcformat-gold">Gold</span>"#,
            r#"<span class="mcformat-code">§r</span>"#,
            r#"<span class="mcformat mcformat-reset">Plain</span>"#,
        )
    );
    assert!(parse("§lBold§4Red")
        .ends_with(r#"<span class="mcformat mcformat-dark-red mcformat-bold">Red</span>"#));
    assert!(parse("§l§lBold").ends_with(r#"<span class="mcformat mcformat-bold">Bold</span>"#));
}

#[test]
fn test_parse_tree_is_shallow() {
    let tree = Description::from_json(&serde_json::json!({
        "text": "Hello ",
        "extra": [{"text": "§cworld", "extra": [{"text": "nested"}]}]
    }));
    let html = parse_tree(&tree);
    assert!(html.contains("Hello "));
    assert!(html.contains(r#"<span class="mcformat mcformat-red">world</span>"#));
    assert!(!html.contains("nested"));
}

#[test]
fn test_favicon_rules() {
    let prefix = "data:image/png;base64,";
    let oversized = format!("{}{}", prefix, "A".repeat(favicon::MAX_FAVICON_LEN));
    assert!(!favicon::validate(&oversized));
    assert!(!favicon::validate("data:image/bmp;base64,Qk0="));
    assert!(favicon::validate("data:image/gif;base64,R0lGOD"));
}

struct ScriptedFetcher {
    calls: AtomicUsize,
    fail: bool,
}

#[async_trait]
impl StatusFetcher for ScriptedFetcher {
    async fn fetch(&self, _address: &ServerAddress) -> FetchResult<StatusSnapshot> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(20)).await;
        if self.fail {
            return Err(FetchError::Timeout);
        }
        Ok(StatusSnapshot {
            online: true,
            description: Description::from("§eA Minecraft Server"),
            players_online: 4,
            players_max: 40,
            version_name: "1.21".to_string(),
            icon: Some("data:image/png;base64,iVBORw0KGgo=".to_string()),
        })
    }
}

fn scripted(fail: bool) -> Arc<ScriptedFetcher> {
    Arc::new(ScriptedFetcher {
        calls: AtomicUsize::new(0),
        fail,
    })
}

#[tokio::test]
async fn test_lookup_and_render() {
    let fetcher = scripted(false);
    let lookup = StatusLookup::new(ExpiringCache::default(), fetcher.clone());

    let snapshot = lookup.lookup("8.8.4.4:25565").await.unwrap();
    let html = render_embed("8.8.4.4:25565", &snapshot, "/static");

    assert!(html.contains(r#"<span class="mcformat mcformat-yellow">A Minecraft Server</span>"#));
    assert!(html.contains(r#"src="data:image/png;base64,iVBORw0KGgo=""#));

    let _ = lookup.lookup("8.8.4.4:25565").await.unwrap();
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_lookup_offline_on_fetch_failure() {
    let lookup = StatusLookup::new(ExpiringCache::default(), scripted(true));

    let snapshot = lookup.lookup("1.0.0.1").await.unwrap();
    assert!(!snapshot.online);
    assert_eq!(snapshot.version_name, "Unknown");

    let html = render_embed("1.0.0.1", &snapshot, "/static");
    assert!(html.contains("Server Offline"));
    assert!(html.contains("/static/unknown_server.jpg"));
}

#[tokio::test]
async fn test_lookup_refetches_after_ttl() {
    let fetcher = scripted(false);
    let cache = ExpiringCache::new(CacheConfig::new().ttl(Duration::from_millis(50)).build());
    let lookup = StatusLookup::new(cache, fetcher.clone());

    let _ = lookup.lookup("8.8.8.8").await.unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    let _ = lookup.lookup("8.8.8.8").await.unwrap();

    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_concurrent_misses_each_fetch() {
    let fetcher = scripted(false);
    let lookup = StatusLookup::new(ExpiringCache::default(), fetcher.clone());

    let (a, b) = tokio::join!(lookup.lookup("8.8.8.8"), lookup.lookup("8.8.8.8"));
    assert_eq!(a.unwrap(), b.unwrap());

    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
    assert_eq!(lookup.cache().len(), 1);
}

#[tokio::test]
async fn test_lookup_rejections() {
    let fetcher = scripted(false);
    let lookup = StatusLookup::new(ExpiringCache::default(), fetcher.clone());

    assert!(matches!(
        lookup.lookup("8.8.8.8:notaport").await,
        Err(ResolveError::InvalidPort(_))
    ));
    assert!(matches!(
        lookup.lookup("8.8.8.8:6379").await,
        Err(ResolveError::BlockedPort(6379))
    ));
    assert!(matches!(
        lookup.lookup("[fd00::1]:25565").await,
        Err(ResolveError::PrivateAddress(_))
    ));
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
}
