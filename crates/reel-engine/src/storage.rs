use reel_common::SessionRecord;
use std::path::{Path, PathBuf};
use tokio::fs;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Session artifacts on disk: the JSON record and the generated script.
#[derive(Debug, Clone)]
pub struct SessionStore {
    output_dir: PathBuf,
}

impl SessionStore {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn record_path(&self, session_id: &str) -> PathBuf {
        self.output_dir.join(format!("session_{}.json", session_id))
    }

    pub fn script_path(&self, session_id: &str) -> PathBuf {
        self.output_dir
            .join(format!("generated_automation_{}.py", session_id))
    }

    pub async fn save_record(&self, record: &SessionRecord) -> Result<PathBuf, StorageError> {
        self.ensure_dir().await?;
        let path = self.record_path(&record.session_id);
        let json = serde_json::to_string_pretty(record)?;
        fs::write(&path, json).await?;
        Ok(path)
    }

    pub async fn save_script(&self, session_id: &str, script: &str) -> Result<PathBuf, StorageError> {
        self.ensure_dir().await?;
        let path = self.script_path(session_id);
        fs::write(&path, script).await?;
        Ok(path)
    }

    pub async fn load_record(path: impl AsRef<Path>) -> Result<SessionRecord, StorageError> {
        let content = fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&content)?)
    }

    async fn ensure_dir(&self) -> Result<(), StorageError> {
        if !self.output_dir.exists() {
            fs::create_dir_all(&self.output_dir).await?;
        }
        Ok(())
    }
}
