use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tether_core::persistence::{Persistence, Result, Snapshot};
use tether_core::PersistenceError;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

/// Stores the whole [`Snapshot`] as one pretty-printed JSON document.
///
/// Saves go to a sibling `.tmp` file that is flushed to disk and then
/// renamed over the target, so a crash mid-write leaves the previous
/// document intact.
#[derive(Debug, Clone)]
pub struct JsonFilePersistence {
    path: PathBuf,
}

impl JsonFilePersistence {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }

    async fn write_atomically(&self, tmp: &Path, bytes: &[u8]) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut file = tokio::fs::File::create(tmp).await?;
        file.write_all(bytes).await?;
        file.sync_all().await?;
        drop(file);

        tokio::fs::rename(tmp, &self.path).await
    }
}

#[async_trait]
impl Persistence for JsonFilePersistence {
    async fn load(&self) -> Result<Snapshot> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(path = %self.path.display(), "data file not found, starting empty");
                return Ok(Snapshot::default());
            }
            Err(err) => return Err(err.into()),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Snapshot::default());
        }

        let snapshot: Snapshot = serde_json::from_slice(&bytes).map_err(|e| {
            PersistenceError::Serialization(format!("{}: {e}", self.path.display()))
        })?;

        info!(
            path = %self.path.display(),
            mappings = snapshot.mappings.len(),
            clicks = snapshot.clicks.len(),
            "loaded data file"
        );
        Ok(snapshot)
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(snapshot)
            .map_err(|e| PersistenceError::Serialization(e.to_string()))?;

        let tmp = self.temp_path();
        if let Err(err) = self.write_atomically(&tmp, &bytes).await {
            warn!(path = %self.path.display(), error = %err, "failed to write data file");
            // the temp file may or may not exist at this point
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(err.into());
        }

        debug!(path = %self.path.display(), bytes = bytes.len(), "saved data file");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::Timestamp;
    use tether_core::{ClickEvent, Mapping, ShortCode};

    fn sample() -> Snapshot {
        let created = Timestamp::from_second(1_700_000_000).unwrap();
        let mut alias = Mapping::new(
            "id-1",
            "https://example.com/a",
            tether_core::AliasValidator::validate("my-page", &std::collections::HashSet::new())
                .unwrap(),
            created,
        );
        alias.click_count = 3;
        let mut generated = Mapping::new(
            "id-2",
            "http://example.com/b",
            ShortCode::generated("abc1234"),
            created,
        );
        generated.is_active = false;

        Snapshot {
            mappings: vec![alias, generated],
            clicks: vec![ClickEvent {
                timestamp: "2024-01-02T03:04:05.123456789Z".parse().unwrap(),
                ip: "1.2.3.4".to_string(),
                user_agent: "UA".to_string(),
                short_code: "my-page".to_string(),
            }],
        }
    }

    #[tokio::test]
    async fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let persistence = JsonFilePersistence::new(dir.path().join("data.json"));

        let snapshot = persistence.load().await.unwrap();
        assert_eq!(snapshot, Snapshot::default());
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let persistence = JsonFilePersistence::new(dir.path().join("nested/data.json"));
        let snapshot = sample();

        persistence.save(&snapshot).await.unwrap();
        let loaded = persistence.load().await.unwrap();

        assert_eq!(loaded, snapshot);
        assert!(!persistence.temp_path().exists());
    }

    #[tokio::test]
    async fn save_replaces_previous_document() {
        let dir = tempfile::tempdir().unwrap();
        let persistence = JsonFilePersistence::new(dir.path().join("data.json"));

        persistence.save(&sample()).await.unwrap();
        persistence.save(&Snapshot::default()).await.unwrap();

        assert_eq!(persistence.load().await.unwrap(), Snapshot::default());
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        tokio::fs::write(&path, b"{ not json").await.unwrap();

        let err = JsonFilePersistence::new(&path).load().await.unwrap_err();
        assert!(matches!(err, PersistenceError::Serialization(_)));
    }

    #[tokio::test]
    async fn unwritable_location_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        tokio::fs::write(&blocker, b"file, not a directory")
            .await
            .unwrap();

        let persistence = JsonFilePersistence::new(blocker.join("data.json"));
        let err = persistence.save(&sample()).await.unwrap_err();
        assert!(matches!(err, PersistenceError::Io(_)));
    }
}
