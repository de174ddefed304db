//! Environment diagnostics: which `.env` files exist, which database the
//! scrapers would use, and whether it is reachable.
//!
//! Runs before configuration is loaded so it can explain why loading fails.

use std::path::PathBuf;

use hdbwatch_core::DEFAULT_DB_NAME;
use hdbwatch_db::{Collection, DocumentStore, PgDocumentStore, PoolConfig};
use serde_json::json;

/// `.env` locations checked, in load order.
fn env_candidates() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(".env"), PathBuf::from("../.env")];
    if let Ok(extra) = std::env::var("HDBWATCH_ENV_FILE") {
        paths.push(PathBuf::from(extra));
    }
    paths
}

/// Replace the password in a connection URL with `****`.
///
/// URLs without credentials are returned unchanged.
pub(crate) fn mask_database_url(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    let authority_end = rest.find('/').unwrap_or(rest.len());
    let (authority, path) = rest.split_at(authority_end);
    let Some((userinfo, host)) = authority.rsplit_once('@') else {
        return url.to_string();
    };
    match userinfo.split_once(':') {
        Some((user, _)) => format!("{scheme}://{user}:****@{host}{path}"),
        None => url.to_string(),
    }
}

/// # Errors
///
/// Never fails on an unreachable database; connection problems are reported
/// on stdout.
pub(crate) async fn run_diagnose() -> anyhow::Result<()> {
    println!("environment files:");
    for path in env_candidates() {
        let status = if path.is_file() { "found" } else { "not found" };
        println!("  {}: {status}", path.display());
        if path.is_file() {
            dotenvy::from_path(&path).ok();
        }
    }

    let db_name = std::env::var("HDBWATCH_DB_NAME")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_DB_NAME.to_string());
    let Some(database_url) = std::env::var("DATABASE_URL")
        .ok()
        .filter(|v| !v.trim().is_empty())
    else {
        println!("DATABASE_URL: not set");
        println!("HDBWATCH_DB_NAME: {db_name}");
        return Ok(());
    };
    println!("DATABASE_URL: {}", mask_database_url(&database_url));
    println!("HDBWATCH_DB_NAME: {db_name}");

    let store = match PgDocumentStore::connect(&database_url, &db_name, PoolConfig::default()).await
    {
        Ok(store) => store,
        Err(e) => {
            tracing::warn!(error = %e, "diagnose could not connect");
            println!("connection: FAILED ({e})");
            return Ok(());
        }
    };
    println!("connection: ok");

    for collection in Collection::ALL {
        match store.count(collection, &json!({})).await {
            Ok(n) => println!("  {collection}: {n} documents"),
            Err(e) => println!("  {collection}: unavailable ({e})"),
        }
    }

    store.close().await;
    Ok(())
}
