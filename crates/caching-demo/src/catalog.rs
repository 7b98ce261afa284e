//! Cached reads of users and posts
//!
//! Every operation goes through the two-tier cache under a fixed key:
//!
//! | Operation        | Key               |
//! |------------------|-------------------|
//! | all users        | `users`           |
//! | all posts        | `posts`           |
//! | user by id       | `user:{id}`       |
//! | posts by user id | `user:{id}:posts` |

use jsonplaceholder_client::{fetch_records, Fetched, Post, RecordFetcher, Resource, Result, User};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tiered_cache::{CacheAside, Lookup};
use tracing::warn;

/// Cache key for an upstream resource
pub fn cache_key(resource: &Resource) -> String {
    match resource {
        Resource::Users => "users".to_string(),
        Resource::Posts => "posts".to_string(),
        Resource::User(id) => format!("user:{}", id),
        Resource::UserPosts(id) => format!("user:{}:posts", id),
    }
}

/// Users and posts, read through the cache tiers
pub struct Catalog {
    cache: CacheAside,
    fetcher: Arc<dyn RecordFetcher>,
}

impl Catalog {
    pub fn new(cache: CacheAside, fetcher: Arc<dyn RecordFetcher>) -> Self {
        Self { cache, fetcher }
    }

    pub fn cache(&self) -> &CacheAside {
        &self.cache
    }

    pub async fn users(&self) -> Result<Lookup<Vec<User>>> {
        self.read_list(Resource::Users).await
    }

    pub async fn posts(&self) -> Result<Lookup<Vec<Post>>> {
        self.read_list(Resource::Posts).await
    }

    /// `None` when the upstream answered with an empty body
    pub async fn user(&self, id: u64) -> Result<Lookup<Option<User>>> {
        self.read(Resource::User(id)).await
    }

    pub async fn user_posts(&self, id: u64) -> Result<Lookup<Vec<Post>>> {
        self.read_list(Resource::UserPosts(id)).await
    }

    /// Whether the remote tier answers at all
    pub async fn remote_reachable(&self) -> bool {
        self.cache().remote().exists("users").await.is_ok()
    }

    async fn read<T>(&self, resource: Resource) -> Result<Lookup<Option<T>>>
    where
        T: DeserializeOwned + Clone + Send + Sync + 'static,
    {
        let key = cache_key(&resource);
        let fetcher = self.fetcher.as_ref();

        let lookup = self
            .cache
            .read_through(&key, move || async move {
                fetch_records::<T>(fetcher, &resource)
                    .await
                    .map(Fetched::into_parts)
            })
            .await?;

        for failure in &lookup.failures {
            warn!(key = %key, failure = %failure, "Read served despite a cache tier failure");
        }

        Ok(lookup)
    }

    /// List reads never yield null: an empty upstream body becomes an empty list
    async fn read_list<T>(&self, resource: Resource) -> Result<Lookup<Vec<T>>>
    where
        T: DeserializeOwned + Clone + Send + Sync + 'static,
    {
        let lookup = self.read::<Vec<T>>(resource).await?;
        Ok(lookup.map(Option::unwrap_or_default))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{catalog_with, StubFetcher};
    use jsonplaceholder_client::PlaceholderError;
    use std::time::Duration;
    use tiered_cache::{MemoryRemoteCache, RemoteCache, Tier};

    #[test]
    fn test_cache_keys() {
        assert_eq!(cache_key(&Resource::Users), "users");
        assert_eq!(cache_key(&Resource::Posts), "posts");
        assert_eq!(cache_key(&Resource::User(42)), "user:42");
        assert_eq!(cache_key(&Resource::UserPosts(42)), "user:42:posts");
    }

    #[test]
    fn test_cache_keys_do_not_collide() {
        let keys = [
            cache_key(&Resource::Users),
            cache_key(&Resource::Posts),
            cache_key(&Resource::User(1)),
            cache_key(&Resource::UserPosts(1)),
            cache_key(&Resource::User(11)),
        ];
        for (i, a) in keys.iter().enumerate() {
            for b in keys.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[tokio::test]
    async fn test_user_full_miss_populates_tiers() {
        let fetcher = StubFetcher::new()
            .with_body("users/42", r#"{"id": 42, "email": "alice@example.com"}"#);
        let remote = Arc::new(MemoryRemoteCache::new());
        let catalog = catalog_with(fetcher.clone(), remote.clone());

        let lookup = catalog.user(42).await.unwrap();
        assert_eq!(lookup.source, Tier::Upstream);
        assert_eq!(lookup.value.unwrap().id, 42);

        let remote_ttl = remote.time_to_live("user:42").await.unwrap();
        assert!(remote_ttl > Duration::from_secs(3590));
        let local_ttl = catalog.cache().local().time_to_live("user:42").await.unwrap();
        assert!(local_ttl > Duration::from_secs(590) && local_ttl <= Duration::from_secs(600));

        let again = catalog.user(42).await.unwrap();
        assert_eq!(again.source, Tier::Local);
        assert_eq!(fetcher.calls("users/42"), 1);
    }

    #[tokio::test]
    async fn test_remote_holds_raw_upstream_body() {
        let body = r#"[{"userId":3,"id":21,"title":"t","body":"b","extra":true}]"#;
        let fetcher = StubFetcher::new().with_body("users/3/posts", body);
        let remote = Arc::new(MemoryRemoteCache::new());
        let catalog = catalog_with(fetcher, remote.clone());

        let lookup = catalog.user_posts(3).await.unwrap();
        assert_eq!(lookup.value.len(), 1);
        assert_eq!(lookup.value[0].user_id, 3);
        assert_eq!(remote.get("user:3:posts").await.unwrap().as_deref(), Some(body));
    }

    #[tokio::test]
    async fn test_shared_remote_serves_second_instance() {
        let remote = Arc::new(MemoryRemoteCache::new());
        let first = StubFetcher::new().with_body("users", r#"[{"id": 1, "email": "a@b.c"}]"#);
        catalog_with(first, remote.clone()).users().await.unwrap();

        // A fresh process sharing the remote tier never reaches the upstream
        let second = StubFetcher::new();
        let catalog = catalog_with(second.clone(), remote);
        let lookup = catalog.users().await.unwrap();
        assert_eq!(lookup.source, Tier::Remote);
        assert_eq!(lookup.value[0].email, "a@b.c");
        assert_eq!(second.calls("users"), 0);
    }

    #[tokio::test]
    async fn test_upstream_failure_then_retry() {
        let fetcher = StubFetcher::new().with_status("posts", 500);
        let remote = Arc::new(MemoryRemoteCache::new());
        let catalog = catalog_with(fetcher.clone(), remote.clone());

        let err = catalog.posts().await.unwrap_err();
        assert!(err.is_upstream());
        assert!(!remote.exists("posts").await.unwrap());

        let _ = catalog.posts().await;
        assert_eq!(fetcher.calls("posts"), 2);
    }

    #[tokio::test]
    async fn test_empty_list_body_becomes_empty_vec() {
        let fetcher = StubFetcher::new().with_body("users/5/posts", "null");
        let catalog = catalog_with(fetcher, Arc::new(MemoryRemoteCache::new()));

        let lookup = catalog.user_posts(5).await.unwrap();
        assert!(lookup.value.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_upstream_body_is_decode_error() {
        let fetcher = StubFetcher::new().with_body("users", r#"{"not": "a list"}"#);
        let remote = Arc::new(MemoryRemoteCache::new());
        let catalog = catalog_with(fetcher, remote.clone());

        let err = catalog.users().await.unwrap_err();
        assert!(matches!(err, PlaceholderError::Decode { .. }));
        assert!(!remote.exists("users").await.unwrap());
    }

    #[tokio::test]
    async fn test_corrupt_remote_entry_is_refetched() {
        let remote = Arc::new(MemoryRemoteCache::new());
        remote
            .set("user:4", "{\"id\": \"four\"", Duration::from_secs(3600))
            .await
            .unwrap();
        let fetcher = StubFetcher::new().with_body("users/4", r#"{"id": 4, "email": "d@e.f"}"#);
        let catalog = catalog_with(fetcher.clone(), remote);

        let lookup = catalog.user(4).await.unwrap();
        assert_eq!(lookup.source, Tier::Upstream);
        assert_eq!(fetcher.calls("users/4"), 1);
    }

    #[tokio::test]
    async fn test_unreachable_remote_is_reported() {
        let remote = Arc::new(MemoryRemoteCache::new());
        remote.set_offline(true);
        let fetcher = StubFetcher::new().with_body("posts", "[]");
        let catalog = catalog_with(fetcher, remote);

        let lookup = catalog.posts().await.unwrap();
        assert!(lookup.is_degraded());
        assert!(!catalog.remote_reachable().await);
    }
}
