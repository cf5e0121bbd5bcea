//! Catalogue lookups that change slowly enough to be served from the local
//! JSON cache between upstream calls.

use std::time::Duration;

use md_http::CoinGeckoClient;
use md_http::JsonCache;
use md_types::CoinListEntry;
use md_types::NftListEntry;
use tracing::debug;
use tracing::warn;

pub const NFT_COLLECTIONS_KEY: &str = "nft_collections";
pub const NFT_COLLECTIONS_TTL: Duration = Duration::from_secs(30 * 60);

pub const RECENTLY_ADDED_KEY: &str = "recently_added_coins";
pub const RECENTLY_ADDED_TTL: Duration = Duration::from_secs(5 * 60);

/// Entries kept in the recently-added cache; larger limits are capped to this
pub const RECENTLY_ADDED_KEPT: usize = 250;

/// NFT collections, at most `per_page` of them. `refresh` bypasses the cache.
pub async fn nft_collections(client: &CoinGeckoClient, cache: &JsonCache, per_page: usize, refresh: bool) -> md_http::Result<Vec<NftListEntry>> {
    let mut collections = cached_or_fetch(cache, NFT_COLLECTIONS_KEY, NFT_COLLECTIONS_TTL, refresh, || {
        client.nft_list(md_http::coingecko::MAX_PER_PAGE, 1)
    })
    .await?;
    collections.truncate(per_page);
    Ok(collections)
}

/// The `limit` coins guessed to be newest, see [`md_http::recent`]
pub async fn recently_added(client: &CoinGeckoClient, cache: &JsonCache, limit: usize, refresh: bool) -> md_http::Result<Vec<CoinListEntry>> {
    let mut coins = cached_or_fetch(cache, RECENTLY_ADDED_KEY, RECENTLY_ADDED_TTL, refresh, || client.recently_added(RECENTLY_ADDED_KEPT)).await?;
    coins.truncate(limit);
    Ok(coins)
}

async fn cached_or_fetch<T, F, Fut>(cache: &JsonCache, key: &str, ttl: Duration, refresh: bool, fetch: F) -> md_http::Result<Vec<T>>
where
    T: serde::Serialize + serde::de::DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = md_http::Result<Vec<T>>>,
{
    if !refresh {
        if let Some(hit) = cache.get::<Vec<T>>(key, ttl) {
            debug!(key, entries = hit.len(), "cache hit");
            return Ok(hit);
        }
    }

    let fresh = fetch().await?;
    // A failed write only costs the next call a request.
    if let Err(err) = cache.put(key, &fresh) {
        warn!(key, %err, "failed to write cache entry");
    }
    Ok(fresh)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use md_ratelimit::SlidingWindow;

    use super::*;

    fn scratch_cache(name: &str) -> JsonCache {
        let dir = std::env::temp_dir().join(format!("md_feed_catalog_{}_{name}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        JsonCache::new(dir)
    }

    fn client_for(server: &mockito::Server) -> CoinGeckoClient {
        CoinGeckoClient::builder().base_url(server.url()).rate_limiter(Arc::new(SlidingWindow::per_minute(100))).build().unwrap()
    }

    #[tokio::test]
    async fn test_recently_added_served_from_cache() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/coins/list")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"id":"abc2","symbol":"abc","name":"Abc"},{"id":"xyz10","symbol":"xyz","name":"Xyz"},{"id":"foo1","symbol":"foo","name":"Foo"}]"#)
            .expect(1)
            .create_async()
            .await;

        let client = client_for(&server);
        let cache = scratch_cache("recent");

        let first = recently_added(&client, &cache, 2, false).await.unwrap();
        let ids: Vec<&str> = first.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["xyz10", "abc2"]);

        let second = recently_added(&client, &cache, 3, false).await.unwrap();
        let ids: Vec<&str> = second.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["xyz10", "abc2", "foo1"]);

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_refresh_bypasses_cache() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/nfts/list")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"id":"pudgy-penguins","name":"Pudgy Penguins","symbol":"PPG"},{"id":"azuki","name":"Azuki","symbol":"AZUKI"}]"#)
            .expect(2)
            .create_async()
            .await;

        let client = client_for(&server);
        let cache = scratch_cache("nfts");

        let listed = nft_collections(&client, &cache, 1, false).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, "pudgy-penguins");

        let refreshed = nft_collections(&client, &cache, 10, true).await.unwrap();
        assert_eq!(refreshed.len(), 2);

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_upstream_error_is_not_cached() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server.mock("GET", "/coins/list").with_status(500).create_async().await;

        let client = client_for(&server);
        let cache = scratch_cache("error");

        let err = recently_added(&client, &cache, 5, false).await.unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert!(cache.get::<Vec<CoinListEntry>>(RECENTLY_ADDED_KEY, RECENTLY_ADDED_TTL).is_none());
    }
}
