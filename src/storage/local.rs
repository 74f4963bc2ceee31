//! Local filesystem storage implementation.
//!
//! Every write goes to a temporary sibling first and is renamed into place,
//! so readers never observe a half-written file.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::storage::{DiscoveryRun, ResultStorage, WriteMetadata};

const LATEST_KEY: &str = "latest.json";

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root_dir
    }

    /// Get the full path for a relative key.
    fn path(&self, key: &str) -> PathBuf {
        self.root_dir.join(key)
    }

    /// Run file key derived from the run timestamp, in milliseconds.
    /// Taken keys get a `-N` suffix so earlier runs are never replaced.
    async fn run_key(&self, run: &DiscoveryRun) -> Result<String> {
        let stamp = run.updated_at.format("%Y%m%dT%H%M%S%.3fZ").to_string();
        let mut key = format!("runs/{stamp}.json");
        let mut suffix = 1;
        while tokio::fs::try_exists(self.path(&key)).await? {
            key = format!("runs/{stamp}-{suffix}.json");
            suffix += 1;
        }
        Ok(key)
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    async fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(value)?;
        self.write_bytes(key, &bytes).await
    }

    /// Read bytes, returning None if the file doesn't exist.
    async fn read_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(self.path(key)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    async fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.read_bytes(key).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn read_run(&self, key: &str) -> Result<Option<DiscoveryRun>> {
        let Some(run) = self.read_json::<DiscoveryRun>(key).await? else {
            return Ok(None);
        };
        run.validate()?;
        Ok(Some(run))
    }
}

#[async_trait]
impl ResultStorage for LocalStorage {
    async fn write_run(&self, run: &DiscoveryRun) -> Result<WriteMetadata> {
        run.validate()?;

        let run_key = self.run_key(run).await?;
        self.write_json(&run_key, run).await?;
        self.write_json(LATEST_KEY, run).await?;
        log::info!(
            "Saved {} podcasts to {}",
            run.count,
            self.path(&run_key).display()
        );

        Ok(WriteMetadata {
            run_key,
            count: run.count,
            timestamp: run.updated_at,
        })
    }

    async fn load_latest(&self) -> Result<Option<DiscoveryRun>> {
        let run = self.read_run(LATEST_KEY).await?;
        if run.is_none() {
            log::warn!("No {} found in {}", LATEST_KEY, self.root_dir.display());
        }
        Ok(run)
    }

    async fn load_run(&self, run_key: &str) -> Result<Option<DiscoveryRun>> {
        self.read_run(run_key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        ContactCandidate, ContactType, DiscoveredPodcast, DiscoverySource, RankedContactPair,
        SourceUrl,
    };
    use tempfile::TempDir;

    fn podcast_with_contact() -> DiscoveredPodcast {
        let mut podcast =
            DiscoveredPodcast::new("The Show", "https://podcasts.apple.com/us/podcast/x/id42");
        podcast.dedupe_key = "apple:42".into();
        podcast.apply_contacts(&RankedContactPair {
            primary: Some(ContactCandidate::new(
                "press@show.com",
                SourceUrl::new("https://show.com").unwrap(),
                ContactType::Booking,
                0.9,
            )),
            backup: None,
        });
        podcast
    }

    #[tokio::test]
    async fn test_write_and_read() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        storage.write_bytes("test.txt", b"hello").await.unwrap();
        let data = storage.read_bytes("test.txt").await.unwrap();
        assert_eq!(data, Some(b"hello".to_vec()));
        assert!(!tmp.path().join("test.tmp").exists());
    }

    #[tokio::test]
    async fn test_read_nonexistent() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        assert!(storage.read_bytes("nope.txt").await.unwrap().is_none());
        assert!(storage.load_latest().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_run_round_trip() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());
        let run = DiscoveryRun::new(
            DiscoverySource::Guest("Jane Doe".into()),
            vec![podcast_with_contact()],
        );

        let meta = storage.write_run(&run).await.unwrap();
        assert_eq!(meta.count, 1);
        assert!(meta.run_key.starts_with("runs/"));
        assert!(tmp.path().join(&meta.run_key).exists());

        let latest = storage.load_latest().await.unwrap().unwrap();
        assert_eq!(latest.count, 1);
        assert_eq!(latest.discovery_source, run.discovery_source);
        assert_eq!(latest.podcasts[0].primary_email(), Some("press@show.com"));
        assert_eq!(
            latest.podcasts[0].primary_email_source_url(),
            Some("https://show.com")
        );

        let by_key = storage.load_run(&meta.run_key).await.unwrap().unwrap();
        assert_eq!(by_key.podcasts, latest.podcasts);
    }

    #[tokio::test]
    async fn test_runs_in_same_instant_do_not_overwrite() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());
        let first = DiscoveryRun::new(DiscoverySource::Category("fitness".into()), Vec::new());
        let mut second = DiscoveryRun::new(
            DiscoverySource::Category("running".into()),
            vec![podcast_with_contact()],
        );
        second.updated_at = first.updated_at;

        let a = storage.write_run(&first).await.unwrap();
        let b = storage.write_run(&second).await.unwrap();
        assert_ne!(a.run_key, b.run_key);
        assert!(b.run_key.ends_with("-1.json"));

        let kept = storage.load_run(&a.run_key).await.unwrap().unwrap();
        assert_eq!(kept.discovery_source, first.discovery_source);
        assert_eq!(kept.count, 0);
        let latest = storage.load_latest().await.unwrap().unwrap();
        assert_eq!(latest.discovery_source, second.discovery_source);
    }

    #[tokio::test]
    async fn test_load_rejects_email_without_source() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        let run = DiscoveryRun::new(
            DiscoverySource::Category("fitness".into()),
            vec![podcast_with_contact()],
        );
        let mut value = serde_json::to_value(&run).unwrap();
        value["podcasts"][0]["primary_email_source_url"] = serde_json::Value::Null;
        storage.write_json(LATEST_KEY, &value).await.unwrap();

        assert!(matches!(
            storage.load_latest().await,
            Err(AppError::Validation(_))
        ));
    }
}
