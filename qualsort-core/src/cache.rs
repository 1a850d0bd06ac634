/// Order-sensitive memoization of single comparisons.
///
/// LLM verdicts depend on presentation order, so the key canonicalizes the
/// pair to *presentation* order before hashing: `(A, B, "AB")` and
/// `(B, A, "BA")` describe the same physical question and collapse to one
/// key, while `(A, B, "AB")` and `(A, B, "BA")` stay distinct.
///
/// Cache failures are never fatal. The match runner treats a failed read as
/// a miss and a failed write as a warning; the run proceeds against the live
/// judge either way.
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::error::CacheError;
use crate::types::{ComparisonResult, Order};

/// Field separator inside the hashed tuple. A control byte, so item text
/// cannot forge a boundary between fields.
const KEY_SEPARATOR: u8 = 0x1f;

/// Stable key for one comparison: SHA-256 hex over
/// `(first presented, second presented, criteria)`.
pub fn cache_key(item_a: &str, item_b: &str, criteria: &str, order: Order) -> String {
    let (first, second) = order.presented(item_a, item_b);
    let mut hasher = Sha256::new();
    hasher.update(first.as_bytes());
    hasher.update([KEY_SEPARATOR]);
    hasher.update(second.as_bytes());
    hasher.update([KEY_SEPARATOR]);
    hasher.update(criteria.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Storage backend for comparison results.
///
/// `get`/`put` on distinct keys must be safe to interleave; for the same key
/// last-writer-wins is acceptable. Implementations never inspect the fields
/// beyond computing the key.
#[async_trait]
pub trait Cache: Send + Sync {
    async fn get(
        &self,
        item_a: &str,
        item_b: &str,
        criteria: &str,
        order: Order,
    ) -> Result<Option<ComparisonResult>, CacheError>;

    async fn put(
        &self,
        item_a: &str,
        item_b: &str,
        criteria: &str,
        order: Order,
        result: &ComparisonResult,
    ) -> Result<(), CacheError>;
}

/// Process-local cache. Not persistent across runs.
#[derive(Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, ComparisonResult>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(
        &self,
        item_a: &str,
        item_b: &str,
        criteria: &str,
        order: Order,
    ) -> Result<Option<ComparisonResult>, CacheError> {
        let key = cache_key(item_a, item_b, criteria, order);
        let entries = self.entries.read().expect("cache lock poisoned");
        Ok(entries.get(&key).cloned())
    }

    async fn put(
        &self,
        item_a: &str,
        item_b: &str,
        criteria: &str,
        order: Order,
        result: &ComparisonResult,
    ) -> Result<(), CacheError> {
        let key = cache_key(item_a, item_b, criteria, order);
        let mut entries = self.entries.write().expect("cache lock poisoned");
        entries.insert(key, result.clone());
        Ok(())
    }
}

/// Filesystem-backed cache: one `<key>.json` file per entry, persistent
/// across runs. Concurrent writers of the same key race to last-writer-wins,
/// which is fine for idempotent comparison results.
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    /// Open (creating if needed) a cache directory.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(FileCache { dir })
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

#[async_trait]
impl Cache for FileCache {
    async fn get(
        &self,
        item_a: &str,
        item_b: &str,
        criteria: &str,
        order: Order,
    ) -> Result<Option<ComparisonResult>, CacheError> {
        let path = self.entry_path(&cache_key(item_a, item_b, criteria, order));
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CacheError::Io(e)),
        };

        let result = serde_json::from_slice(&bytes)
            .map_err(|e| CacheError::Corrupt(format!("{}: {e}", path.display())))?;
        Ok(Some(result))
    }

    async fn put(
        &self,
        item_a: &str,
        item_b: &str,
        criteria: &str,
        order: Order,
        result: &ComparisonResult,
    ) -> Result<(), CacheError> {
        let path = self.entry_path(&cache_key(item_a, item_b, criteria, order));
        let bytes = serde_json::to_vec_pretty(result)
            .map_err(|e| CacheError::Corrupt(e.to_string()))?;
        tokio::fs::write(&path, bytes).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Verdict;

    fn sample_result() -> ComparisonResult {
        ComparisonResult {
            winner: Some(Verdict::A),
            reasoning: "first is stronger".to_string(),
            raw: Some(serde_json::json!({"model": "test"})),
        }
    }

    #[test]
    fn test_key_shared_between_mirrored_calls() {
        // Same physical question, asked from either side's perspective.
        assert_eq!(
            cache_key("x", "y", "prose quality", Order::Ab),
            cache_key("y", "x", "prose quality", Order::Ba),
        );
    }

    #[test]
    fn test_key_distinguishes_orders() {
        assert_ne!(
            cache_key("x", "y", "prose quality", Order::Ab),
            cache_key("x", "y", "prose quality", Order::Ba),
        );
    }

    #[test]
    fn test_key_distinguishes_criteria_and_items() {
        assert_ne!(
            cache_key("x", "y", "prose quality", Order::Ab),
            cache_key("x", "y", "humor", Order::Ab),
        );
        assert_ne!(
            cache_key("x", "y", "prose quality", Order::Ab),
            cache_key("x", "z", "prose quality", Order::Ab),
        );
    }

    #[test]
    fn test_key_fields_cannot_bleed_into_each_other() {
        // "ab"+"c" and "a"+"bc" must not hash the same.
        assert_ne!(
            cache_key("ab", "c", "q", Order::Ab),
            cache_key("a", "bc", "q", Order::Ab),
        );
    }

    #[tokio::test]
    async fn test_memory_cache_roundtrip_and_miss() {
        let cache = MemoryCache::new();
        assert!(cache.get("x", "y", "q", Order::Ab).await.unwrap().is_none());

        cache.put("x", "y", "q", Order::Ab, &sample_result()).await.unwrap();

        let hit = cache.get("x", "y", "q", Order::Ab).await.unwrap().unwrap();
        assert_eq!(hit.winner, Some(Verdict::A));
        assert_eq!(hit.reasoning, "first is stronger");

        // The mirrored call sees the same entry; the other order does not.
        assert!(cache.get("y", "x", "q", Order::Ba).await.unwrap().is_some());
        assert!(cache.get("x", "y", "q", Order::Ba).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_memory_cache_last_writer_wins() {
        let cache = MemoryCache::new();
        cache.put("x", "y", "q", Order::Ab, &sample_result()).await.unwrap();

        let replacement = ComparisonResult {
            winner: Some(Verdict::B),
            reasoning: "changed my mind".to_string(),
            raw: None,
        };
        cache.put("x", "y", "q", Order::Ab, &replacement).await.unwrap();

        let hit = cache.get("x", "y", "q", Order::Ab).await.unwrap().unwrap();
        assert_eq!(hit.winner, Some(Verdict::B));
    }

    #[tokio::test]
    async fn test_file_cache_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path()).unwrap();

        assert!(cache.get("x", "y", "q", Order::Ab).await.unwrap().is_none());
        cache.put("x", "y", "q", Order::Ab, &sample_result()).await.unwrap();

        let hit = cache.get("x", "y", "q", Order::Ab).await.unwrap().unwrap();
        assert_eq!(hit.winner, Some(Verdict::A));
        assert_eq!(hit.raw, Some(serde_json::json!({"model": "test"})));
    }

    #[tokio::test]
    async fn test_file_cache_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let cache = FileCache::new(dir.path()).unwrap();
            cache.put("x", "y", "q", Order::Ab, &sample_result()).await.unwrap();
        }

        let reopened = FileCache::new(dir.path()).unwrap();
        assert!(reopened.get("x", "y", "q", Order::Ab).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_file_cache_reports_corrupt_entries() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path()).unwrap();

        let key = cache_key("x", "y", "q", Order::Ab);
        std::fs::write(dir.path().join(format!("{key}.json")), b"not json").unwrap();

        let err = cache.get("x", "y", "q", Order::Ab).await.unwrap_err();
        assert!(matches!(err, CacheError::Corrupt(_)));
    }
}
