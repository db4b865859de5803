//! TTL'd cache for the player autocomplete list.
//!
//! Replaces the original module-level cache with an explicit object:
//! entries expire after a fixed TTL and admin mutations invalidate
//! eagerly, so a process restart is no longer the only refresh path.

use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use crate::domain::entities::Player;

#[derive(Debug)]
struct CacheSlot {
    fetched_at: Instant,
    players: Vec<Player>,
}

/// Shared cache of the full player list.
#[derive(Debug)]
pub struct PlayerCache {
    ttl: Duration,
    slot: RwLock<Option<CacheSlot>>,
}

impl PlayerCache {
    /// Creates a cache with the given time-to-live.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: RwLock::new(None),
        }
    }

    /// Returns the cached list while it is still fresh.
    pub async fn get(&self) -> Option<Vec<Player>> {
        let guard = self.slot.read().await;
        guard
            .as_ref()
            .filter(|slot| slot.fetched_at.elapsed() < self.ttl)
            .map(|slot| slot.players.clone())
    }

    /// Stores a freshly loaded list.
    pub async fn store(&self, players: Vec<Player>) {
        let mut guard = self.slot.write().await;
        *guard = Some(CacheSlot {
            fetched_at: Instant::now(),
            players,
        });
    }

    /// Drops any cached list; the next read reloads from the store.
    pub async fn invalidate(&self) {
        let mut guard = self.slot.write().await;
        *guard = None;
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn player(last_name: &str) -> Player {
        Player {
            id: Uuid::new_v4(),
            first_name: "Alex".to_string(),
            last_name: last_name.to_string(),
            suffix: None,
            email: None,
            phone: None,
            ghin: "NONE".to_string(),
            handicap_raw: None,
            plays_forward_tees: false,
            last_handicap_update_at: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn empty_cache_misses() {
        let cache = PlayerCache::new(Duration::from_secs(60));
        assert!(cache.get().await.is_none());
    }

    #[tokio::test]
    async fn stored_list_is_returned_while_fresh() {
        let cache = PlayerCache::new(Duration::from_secs(60));
        cache.store(vec![player("Woods"), player("Sorenstam")]).await;
        let cached = cache.get().await;
        assert_eq!(cached.map(|p| p.len()), Some(2));
    }

    #[tokio::test]
    async fn zero_ttl_always_misses() {
        let cache = PlayerCache::new(Duration::ZERO);
        cache.store(vec![player("Woods")]).await;
        assert!(cache.get().await.is_none());
    }

    #[tokio::test]
    async fn invalidate_drops_the_list() {
        let cache = PlayerCache::new(Duration::from_secs(60));
        cache.store(vec![player("Woods")]).await;
        cache.invalidate().await;
        assert!(cache.get().await.is_none());
    }
}
