use anyhow::{ensure, Result};
use ephemeral_core::{format_duration, CacheError, SetOptions, Store, StoreConfig, TracingSink};
use futures::future::join_all;
use std::time::{Duration, Instant};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const SWEEP_INTERVAL: Duration = Duration::from_millis(200);

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ephemeral_demo=info,ephemeral_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Ephemeral cache walkthrough");
    tracing::info!(
        "   Sweep interval: {}",
        format_duration(SWEEP_INTERVAL, "%S%.3fs").unwrap_or_default()
    );
    println!();

    test_basic_operations()?;
    test_immutability()?;
    test_expiration().await?;
    test_parallel_set_get().await?;

    println!();
    tracing::info!("All scenarios passed");

    Ok(())
}

/// SET/GET/DELETE with immutable overwrite rejection
fn test_basic_operations() -> Result<()> {
    tracing::info!("Scenario: Basic Operations");

    let store: Store<i32> = Store::new();

    store.set("a", 1)?;
    ensure!(store.get("a")? == 1, "first write should be readable");
    tracing::info!("   SET a = 1, GET a → 1");

    store.set_with("a", 2, SetOptions::new().immutable(true))?;
    ensure!(store.get("a")? == 2, "immutable write should be readable");
    tracing::info!("   SET a = 2 (immutable), GET a → 2");

    let rejected = store.set("a", 3);
    ensure!(
        rejected == Err(CacheError::ImmutableValue("a".into())),
        "overwrite of an immutable key should fail, got {:?}",
        rejected
    );
    tracing::info!("   SET a = 3 → {}", CacheError::ImmutableValue("a".into()));

    store.delete("a")?;
    let missing = store.get("a");
    ensure!(missing.is_err(), "deleted key should be gone, got {:?}", missing);
    tracing::info!("   DELETE a, GET a → not found");

    tracing::info!("   ✓ Basic operations work correctly");
    Ok(())
}

/// Immutable keys survive overwrites until deleted or cleared
fn test_immutability() -> Result<()> {
    tracing::info!("Scenario: Immutability");

    let store: Store<String> = Store::new();
    let locked = SetOptions::new().immutable(true);

    store.set_with("config:region", "eu-west".to_string(), locked)?;
    for attempt in ["us-east", "ap-south"] {
        let result = store.set("config:region", attempt.to_string());
        ensure!(result.is_err(), "overwrite with {} should be rejected", attempt);
    }
    ensure!(store.get("config:region")? == "eu-west", "original value should survive");

    store.clear();
    ensure!(store.is_empty(), "clear should remove immutable entries too");
    store.set("config:region", "us-east".to_string())?;

    tracing::info!("   ✓ Immutability works correctly");
    Ok(())
}

/// Lazy eviction on read and background eviction by the sweeper
async fn test_expiration() -> Result<()> {
    tracing::info!("Scenario: Expiration");

    let config = StoreConfig::default()
        .with_sweep_interval(SWEEP_INTERVAL)
        .with_expiration_logs(true);
    let store: Store<&'static str> = Store::with_config(config);
    store.set_sink(TracingSink);

    let ttl = Duration::from_millis(300);
    let short = SetOptions::new().ttl(ttl);
    store.set_with("read-me", "soon gone", short)?;
    store.set_with("sweep-me", "soon gone", short)?;
    store.set("keep-me", "forever")?;
    tracing::info!(
        "   TTL: {}",
        format_duration(ttl, "%S%.3fs").unwrap_or_default()
    );

    ensure!(store.get("read-me")? == "soon gone", "value should be live before its TTL");

    tokio::time::sleep(ttl + Duration::from_millis(50)).await;
    let expired = store.get("read-me");
    ensure!(expired.is_err(), "expired key should not be readable, got {:?}", expired);
    tracing::info!("   GET read-me after TTL → not found");

    tokio::time::sleep(SWEEP_INTERVAL * 2).await;
    ensure!(!store.has("sweep-me"), "sweeper should have removed sweep-me");
    ensure!(store.len() == 1, "only keep-me should remain, found {:?}", store.keys());

    tracing::info!("   ✓ TTL expiration works correctly");
    Ok(())
}

/// Parallel SET/GET on disjoint keys from many tasks
async fn test_parallel_set_get() -> Result<()> {
    tracing::info!("Scenario: Parallel SET/GET (500 concurrent operations)");

    let num_operations = 500;
    let start = Instant::now();
    let store: Store<String> = Store::new();

    let tasks: Vec<_> = (0..num_operations)
        .map(|i| {
            let store = store.clone();
            tokio::spawn(async move {
                let key = format!("parallel-{}", i);
                let value = format!("value-{}", i);
                store.set(key.clone(), value.clone())?;
                let read = store.get(&key)?;
                anyhow::ensure!(read == value, "key {} read back {}", key, read);
                Ok::<_, anyhow::Error>(())
            })
        })
        .collect();

    for result in join_all(tasks).await {
        result??;
    }

    ensure!(store.len() == num_operations, "expected {} keys", num_operations);

    tracing::info!(
        "   ✓ {} operations in {:?}",
        num_operations,
        start.elapsed()
    );
    Ok(())
}
