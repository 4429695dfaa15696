use std::path::{Path, PathBuf};

use log::debug;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use sha2::{Digest, Sha256};

use crate::cache::retry::{connect_with_retry, ConnectError, RetryPolicy};
use crate::models::{CacheEntry, IdentityRecord};
use crate::utils::ExtractionError;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS file_cache (
    file_hash  TEXT PRIMARY KEY,
    file_name  TEXT NOT NULL,
    result     TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);
"#;

/// Digest bytes kept for the cache key: 32 hex characters, the fixed key
/// width of the persisted schema.
const HASH_BYTES: usize = 16;

/// Content-addressed store for reconciled identity records, backed by
/// SQLite. Connections are established lazily per operation through the
/// retry policy; concurrency control is delegated entirely to the store's
/// atomic upsert, so the type keeps no in-process mutable state.
pub struct ResultCache {
    path: PathBuf,
    retry: RetryPolicy,
}

impl ResultCache {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self::with_retry(path, RetryPolicy::default())
    }

    pub fn with_retry<P: AsRef<Path>>(path: P, retry: RetryPolicy) -> Self {
        ResultCache {
            path: path.as_ref().to_path_buf(),
            retry,
        }
    }

    /// Hex digest of the document bytes, used as the cache key so identical
    /// uploads are never reprocessed.
    pub fn content_hash(bytes: &[u8]) -> String {
        let digest = Sha256::digest(bytes);
        digest[..HASH_BYTES]
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect()
    }

    /// Insert or overwrite the entry for `content_hash` in one atomic
    /// statement; safe to repeat with identical or differing payloads
    /// (last writer wins), and never produces a duplicate row.
    pub fn upsert(
        &self,
        content_hash: &str,
        file_name: &str,
        record: &IdentityRecord,
    ) -> Result<(), ExtractionError> {
        let payload = serde_json::to_string(record)
            .map_err(|e| ExtractionError::Database(format!("result serialization: {}", e)))?;
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO file_cache (file_hash, file_name, result, created_at)
             VALUES (?1, ?2, ?3, CURRENT_TIMESTAMP)
             ON CONFLICT(file_hash) DO UPDATE SET
                 file_name  = excluded.file_name,
                 result     = excluded.result,
                 created_at = excluded.created_at",
            params![content_hash, file_name, payload],
        )
        .map_err(|e| ExtractionError::Database(e.to_string()))?;
        debug!("cached result for {}", content_hash);
        Ok(())
    }

    /// Fetch the entry for `content_hash`. Absence is a normal `None`
    /// signaling "proceed with full extraction".
    pub fn lookup(&self, content_hash: &str) -> Result<Option<CacheEntry>, ExtractionError> {
        let conn = self.connect()?;
        let row = conn
            .query_row(
                "SELECT file_name, result, created_at FROM file_cache WHERE file_hash = ?1",
                params![content_hash],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()
            .map_err(|e| ExtractionError::Database(e.to_string()))?;

        match row {
            Some((file_name, payload, created_at)) => {
                let record = serde_json::from_str(&payload).map_err(|e| {
                    ExtractionError::Database(format!("result deserialization: {}", e))
                })?;
                Ok(Some(CacheEntry {
                    content_hash: content_hash.to_string(),
                    file_name,
                    record,
                    created_at,
                }))
            }
            None => Ok(None),
        }
    }

    fn connect(&self) -> Result<Connection, ExtractionError> {
        let conn = connect_with_retry(&self.retry, || {
            Connection::open(&self.path).map_err(classify_connect_error)
        })?;
        conn.execute_batch(SCHEMA)
            .map_err(|e| ExtractionError::Database(e.to_string()))?;
        Ok(conn)
    }
}

/// Busy, locked and can't-open are the operational conditions a later
/// attempt can recover from; everything else propagates immediately.
fn classify_connect_error(err: rusqlite::Error) -> ConnectError {
    match &err {
        rusqlite::Error::SqliteFailure(e, _) => match e.code {
            ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked | ErrorCode::CannotOpen => {
                ConnectError::Transient(err.to_string())
            }
            _ => ConnectError::Fatal(err.to_string()),
        },
        _ => ConnectError::Fatal(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PLACE_NOT_FOUND;
    use std::time::Duration;
    use tempfile::TempDir;

    fn sample_record(passport_number: &str) -> IdentityRecord {
        IdentityRecord {
            passport_type: "P".to_string(),
            issuing_country: "IND".to_string(),
            surname: "PATEL".to_string(),
            given_names: "RAJ".to_string(),
            passport_number: passport_number.to_string(),
            nationality: "IND".to_string(),
            date_of_birth: "05/04/2005".to_string(),
            gender: "M".to_string(),
            expiration_date: "04/03/2030".to_string(),
            place_of_birth: "Mumbai, Maharashtra".to_string(),
            place_of_issue: PLACE_NOT_FOUND.to_string(),
            date_of_issue: Some("15/06/2022".to_string()),
        }
    }

    fn cache_in(dir: &TempDir) -> ResultCache {
        ResultCache::with_retry(
            dir.path().join("cache.db"),
            RetryPolicy {
                max_attempts: 2,
                delay: Duration::from_millis(1),
            },
        )
    }

    #[test]
    fn content_hash_is_32_hex_chars_and_content_addressed() {
        let a = ResultCache::content_hash(b"document bytes");
        let b = ResultCache::content_hash(b"document bytes");
        let c = ResultCache::content_hash(b"other bytes");
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|ch| ch.is_ascii_hexdigit()));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn lookup_of_unknown_hash_is_none() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir);
        assert!(cache.lookup("deadbeef").unwrap().is_none());
    }

    #[test]
    fn upsert_then_lookup_round_trips() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir);
        let record = sample_record("X12345678");
        let hash = ResultCache::content_hash(b"scan");

        cache.upsert(&hash, "scan.jpg", &record).unwrap();
        let entry = cache.lookup(&hash).unwrap().unwrap();
        assert_eq!(entry.content_hash, hash);
        assert_eq!(entry.file_name, "scan.jpg");
        assert_eq!(entry.record, record);
        assert!(!entry.created_at.is_empty());
    }

    #[test]
    fn upsert_is_idempotent_and_last_writer_wins() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir);
        let hash = ResultCache::content_hash(b"scan");

        cache
            .upsert(&hash, "first.jpg", &sample_record("X12345678"))
            .unwrap();
        cache
            .upsert(&hash, "second.jpg", &sample_record("Z98765432"))
            .unwrap();

        let entry = cache.lookup(&hash).unwrap().unwrap();
        assert_eq!(entry.file_name, "second.jpg");
        assert_eq!(entry.record.passport_number, "Z98765432");

        // Still a single row for the hash
        let conn = Connection::open(dir.path().join("cache.db")).unwrap();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM file_cache WHERE file_hash = ?1",
                params![hash],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn records_without_issue_date_round_trip() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir);
        let mut record = sample_record("X12345678");
        record.date_of_issue = None;
        let hash = ResultCache::content_hash(b"scan");

        cache.upsert(&hash, "scan.jpg", &record).unwrap();
        let entry = cache.lookup(&hash).unwrap().unwrap();
        assert_eq!(entry.record.date_of_issue, None);
    }

    #[test]
    fn unreachable_store_exhausts_retries() {
        // A directory path cannot be opened as a database file.
        let dir = TempDir::new().unwrap();
        let cache = ResultCache::with_retry(
            dir.path(),
            RetryPolicy {
                max_attempts: 2,
                delay: Duration::from_millis(1),
            },
        );
        let result = cache.lookup("deadbeef");
        assert!(matches!(
            result,
            Err(ExtractionError::StoreUnavailable(_)) | Err(ExtractionError::Database(_))
        ));
    }
}
