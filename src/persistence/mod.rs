//! Run log persistence
//!
//! Features:
//! - Versioned JSON envelope
//! - Atomic replace (write tmp, then rename over the log)
//! - Corrupt logs are moved aside to a timestamped backup and a fresh log is
//!   started; earlier backups are never overwritten

use serde::{Deserialize, Serialize};

use crate::Error;
use crate::highscores::{RunLog, RunRecord};

/// Current envelope version
pub const RUN_LOG_VERSION: u32 = 1;

/// On-disk shape of the run log
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunLogEnvelope {
    pub version: u32,
    pub records: Vec<RunRecord>,
}

impl RunLogEnvelope {
    pub fn new(records: Vec<RunRecord>) -> Self {
        Self {
            version: RUN_LOG_VERSION,
            records,
        }
    }

    /// Parse and validate an envelope
    pub fn decode(json: &str) -> crate::Result<Self> {
        let envelope: RunLogEnvelope = serde_json::from_str(json)?;
        if envelope.version != RUN_LOG_VERSION {
            return Err(Error::Storage(format!(
                "unsupported run log version {}",
                envelope.version
            )));
        }
        Ok(envelope)
    }

    pub fn encode(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use file::JsonFileRunLog;

#[cfg(not(target_arch = "wasm32"))]
mod file {
    use std::fs;
    use std::path::{Path, PathBuf};

    use super::RunLogEnvelope;
    use crate::highscores::{RunLog, RunRecord};

    /// Run log stored as a single JSON file
    #[derive(Debug, Clone)]
    pub struct JsonFileRunLog {
        path: PathBuf,
    }

    impl JsonFileRunLog {
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self { path: path.into() }
        }

        pub fn path(&self) -> &Path {
            &self.path
        }

        /// All records so far; a missing file is an empty log
        pub fn read(&self) -> crate::Result<Vec<RunRecord>> {
            match fs::read_to_string(&self.path) {
                Ok(json) => Ok(RunLogEnvelope::decode(&json)?.records),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
                Err(e) => Err(e.into()),
            }
        }

        /// A backup name no existing file uses: `<log>.json.<ms>.bak`, with a
        /// `-n` suffix when two corruptions land in the same millisecond
        fn backup_path(&self) -> PathBuf {
            let stamp = crate::platform::now_ms() as u64;
            let mut backup = self.path.with_extension(format!("json.{stamp}.bak"));
            let mut n = 1;
            while backup.exists() {
                backup = self.path.with_extension(format!("json.{stamp}-{n}.bak"));
                n += 1;
            }
            backup
        }

        fn tmp_path(&self) -> PathBuf {
            self.path.with_extension("json.tmp")
        }

        /// Existing records, moving an unreadable log aside
        fn load_or_recover(&self) -> crate::Result<Vec<RunRecord>> {
            match self.read() {
                Ok(records) => Ok(records),
                Err(crate::Error::Io(e)) => Err(crate::Error::Io(e)),
                Err(e) => {
                    let backup = self.backup_path();
                    log::warn!(
                        "Run log {} unreadable ({e}), moving it to {}",
                        self.path.display(),
                        backup.display()
                    );
                    fs::rename(&self.path, &backup)?;
                    Ok(Vec::new())
                }
            }
        }
    }

    impl RunLog for JsonFileRunLog {
        fn append(&mut self, record: &RunRecord) -> crate::Result<()> {
            let mut records = self.load_or_recover()?;
            records.push(record.clone());
            let json = RunLogEnvelope::new(records).encode()?;

            let tmp = self.tmp_path();
            fs::write(&tmp, json)?;
            fs::rename(&tmp, &self.path)?;
            log::debug!("Appended run to {}", self.path.display());
            Ok(())
        }
    }
}

/// Run log kept in the browser's LocalStorage
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Default)]
pub struct LocalStorageRunLog;

#[cfg(target_arch = "wasm32")]
impl LocalStorageRunLog {
    const STORAGE_KEY: &'static str = "speed_rays_runs";

    fn storage() -> crate::Result<web_sys::Storage> {
        crate::platform::local_storage()
            .ok_or_else(|| Error::Storage("LocalStorage not available".into()))
    }

    pub fn read(&self) -> crate::Result<Vec<RunRecord>> {
        let storage = Self::storage()?;
        match storage.get_item(Self::STORAGE_KEY) {
            Ok(Some(json)) => Ok(RunLogEnvelope::decode(&json)?.records),
            Ok(None) => Ok(Vec::new()),
            Err(e) => Err(Error::Storage(format!("{e:?}"))),
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl RunLog for LocalStorageRunLog {
    fn append(&mut self, record: &RunRecord) -> crate::Result<()> {
        let mut records = self.read().unwrap_or_else(|e| {
            log::warn!("Discarding unreadable run log: {e}");
            Vec::new()
        });
        records.push(record.clone());
        let json = RunLogEnvelope::new(records).encode()?;
        Self::storage()?
            .set_item(Self::STORAGE_KEY, &json)
            .map_err(|e| Error::Storage(format!("{e:?}")))?;
        log::info!("Run saved to LocalStorage");
        Ok(())
    }
}

/// Append to a run log, logging instead of failing
pub fn append_or_warn(log: &mut dyn RunLog, record: &RunRecord) -> bool {
    match log.append(record) {
        Ok(()) => true,
        Err(e) => {
            log::warn!("Failed to save run: {e}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{CarStyle, Mode};

    fn record(score: u64) -> RunRecord {
        RunRecord {
            name: "Ada".into(),
            age: 30,
            avatar: "🚗".into(),
            car: CarStyle::Retro,
            color: "#00ff00".into(),
            mode: Mode::Park,
            score,
            badges: vec!["🅿️ Parked!".into()],
            time: 7,
            timestamp: 1.0,
        }
    }

    fn temp_log(name: &str) -> JsonFileRunLog {
        let path = std::env::temp_dir().join(format!("speed_rays_{name}_{}.json", std::process::id()));
        let _ = std::fs::remove_file(&path);
        for backup in backups(&path) {
            let _ = std::fs::remove_file(backup);
        }
        JsonFileRunLog::new(path)
    }

    /// Backups of the log at `path`, oldest first
    fn backups(path: &std::path::Path) -> Vec<std::path::PathBuf> {
        let Some(prefix) = path.file_name().and_then(|n| n.to_str()) else {
            return Vec::new();
        };
        let prefix = format!("{prefix}.");
        let mut found: Vec<_> = std::fs::read_dir(std::env::temp_dir())
            .map(|dir| {
                dir.filter_map(|e| e.ok().map(|e| e.path()))
                    .filter(|p| {
                        p.file_name()
                            .and_then(|n| n.to_str())
                            .is_some_and(|n| n.starts_with(&prefix) && n.ends_with(".bak"))
                    })
                    .collect()
            })
            .unwrap_or_default();
        found.sort_by_key(|p| std::fs::metadata(p).and_then(|m| m.modified()).ok());
        found
    }

    #[test]
    fn test_rejects_future_version() {
        let json = r#"{"version": 99, "records": []}"#;
        assert!(matches!(
            RunLogEnvelope::decode(json),
            Err(Error::Storage(_))
        ));
    }

    #[test]
    fn test_file_log_appends_in_order() {
        let mut log = temp_log("append");
        assert!(log.read().unwrap().is_empty());
        log.append(&record(10)).unwrap();
        log.append(&record(20)).unwrap();

        let records = log.read().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].score, 10);
        assert_eq!(records[1], record(20));
        let _ = std::fs::remove_file(log.path());
    }

    #[test]
    fn test_corrupt_log_moved_aside() {
        let mut log = temp_log("corrupt");
        std::fs::write(log.path(), "garbage").unwrap();
        log.append(&record(5)).unwrap();

        assert_eq!(log.read().unwrap().len(), 1);
        let saved = backups(log.path());
        assert_eq!(saved.len(), 1);
        assert_eq!(std::fs::read_to_string(&saved[0]).unwrap(), "garbage");
        let _ = std::fs::remove_file(log.path());
        for backup in saved {
            let _ = std::fs::remove_file(backup);
        }
    }

    #[test]
    fn test_repeated_corruption_keeps_every_backup() {
        let mut log = temp_log("corrupt_twice");
        std::fs::write(log.path(), "first").unwrap();
        log.append(&record(5)).unwrap();
        std::fs::write(log.path(), "second").unwrap();
        log.append(&record(6)).unwrap();

        assert_eq!(log.read().unwrap(), vec![record(6)]);
        let saved = backups(log.path());
        let mut contents: Vec<String> = saved
            .iter()
            .map(|p| std::fs::read_to_string(p).unwrap())
            .collect();
        contents.sort();
        assert_eq!(contents, vec!["first", "second"]);
        let _ = std::fs::remove_file(log.path());
        for backup in saved {
            let _ = std::fs::remove_file(backup);
        }
    }

    struct Broken;

    impl RunLog for Broken {
        fn append(&mut self, _record: &RunRecord) -> crate::Result<()> {
            Err(Error::Storage("disk full".into()))
        }
    }

    #[test]
    fn test_append_or_warn_swallows_errors() {
        assert!(!append_or_warn(&mut Broken, &record(1)));
    }
}
