// File: src/persistence.rs
use crate::card::CardDocument;
use crate::error::{CardError, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

const CARDS_DIR: &str = "cards";
const INDEX_FILE: &str = "index.bin";

/// How long a saved card stays loadable.
pub const DEFAULT_RETENTION_DAYS: i64 = 7;

/// Save times of every stored card, keyed by id, in epoch milliseconds.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct StoreIndex {
    saved_at: HashMap<String, i64>,
}

/// A directory of card documents keyed by share id.
pub struct CardStore {
    root: PathBuf,
    retention: Duration,
    // Serializes read-modify-write cycles on the index.
    index_lock: Mutex<()>,
}

impl CardStore {
    pub fn open(root: impl Into<PathBuf>, retention: Duration) -> Result<Self> {
        if retention <= Duration::zero() {
            return Err(CardError::InvalidConfig {
                message: format!("retention must be positive, got {retention}"),
            });
        }
        let root = root.into();
        fs::create_dir_all(root.join(CARDS_DIR))?;
        info!(root = %root.display(), retention_days = retention.num_days(), "card store opened");
        Ok(Self {
            root,
            retention,
            index_lock: Mutex::new(()),
        })
    }

    pub fn retention(&self) -> Duration {
        self.retention
    }

    pub fn save(&self, id: &str, document: &CardDocument) -> Result<()> {
        self.save_at(id, document, Utc::now())
    }

    /// Saves a card as if it had been written at `saved_at`.
    pub fn save_at(&self, id: &str, document: &CardDocument, saved_at: DateTime<Utc>) -> Result<()> {
        let path = self.card_path(id)?;
        let bytes = serde_json::to_vec(document)?;

        // Held across the document write too, so a concurrent sweep never
        // sees the new document paired with a stale save time.
        let _guard = self.index_lock.lock().unwrap_or_else(|e| e.into_inner());
        write_atomic(&path, &bytes)?;
        let mut index = self.read_index()?;
        index.saved_at.insert(id.to_string(), saved_at.timestamp_millis());
        self.write_index(&index)?;

        info!(id, user_name = %document.user_name, "card saved");
        Ok(())
    }

    /// Loads a card. `Ok(None)` when no card with this id exists.
    pub fn load(&self, id: &str) -> Result<Option<CardDocument>> {
        let path = self.card_path(id)?;
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(id, "card not found");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        let document = serde_json::from_reader(BufReader::new(file))?;
        Ok(Some(document))
    }

    /// Ids of every stored card, sorted.
    pub fn ids(&self) -> Result<Vec<String>> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(self.root.join(CARDS_DIR))? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                ids.push(stem.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }

    /// Deletes every card saved before `now - retention`. Returns how many
    /// were deleted.
    pub fn evict_expired(&self, now: DateTime<Utc>) -> Result<usize> {
        let cutoff = now - self.retention;
        let _guard = self.index_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut index = self.read_index()?;
        let mut deleted = 0;

        for id in self.ids()? {
            let path = self.root.join(CARDS_DIR).join(format!("{id}.json"));
            let saved_at = match index.saved_at.get(&id) {
                Some(&millis) => DateTime::from_timestamp_millis(millis),
                None => fs::metadata(&path)?.modified().ok().map(DateTime::<Utc>::from),
            };
            let Some(saved_at) = saved_at else {
                warn!(id = %id, "cannot tell when card was saved, keeping it");
                continue;
            };
            debug!(id = %id, %saved_at, %cutoff, "checking card");
            if saved_at < cutoff {
                fs::remove_file(&path)?;
                index.saved_at.remove(&id);
                deleted += 1;
                info!(id = %id, %saved_at, "expired card deleted");
            }
        }

        // Drop index entries whose document is already gone.
        let cards = self.root.join(CARDS_DIR);
        index
            .saved_at
            .retain(|id, _| cards.join(format!("{id}.json")).exists());
        self.write_index(&index)?;

        info!(deleted, "cleanup finished");
        Ok(deleted)
    }

    fn card_path(&self, id: &str) -> Result<PathBuf> {
        validate_id(id)?;
        Ok(self.root.join(CARDS_DIR).join(format!("{id}.json")))
    }

    fn index_path(&self) -> PathBuf {
        self.root.join(INDEX_FILE)
    }

    fn read_index(&self) -> Result<StoreIndex> {
        let file = match File::open(self.index_path()) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(StoreIndex::default()),
            Err(e) => return Err(e.into()),
        };
        Ok(bincode::deserialize_from(BufReader::new(file))?)
    }

    fn write_index(&self, index: &StoreIndex) -> Result<()> {
        let bytes = bincode::serialize(index)?;
        write_atomic(&self.index_path(), &bytes)
    }
}

/// Ids become file names, so only `[0-9a-z_-]` is allowed.
fn validate_id(id: &str) -> Result<()> {
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(CardError::InvalidId(id.to_string()))
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let temp_file = NamedTempFile::new_in(parent_dir)?;
    {
        let mut writer = BufWriter::new(&temp_file);
        writer.write_all(bytes)?;
        writer.flush()?;
    }
    temp_file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Runs [`CardStore::evict_expired`] on a background thread every
/// `interval` until stopped or dropped.
pub struct EvictionWorker {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl EvictionWorker {
    pub fn spawn(store: Arc<CardStore>, interval: std::time::Duration) -> Self {
        let (stop, stopped) = mpsc::channel::<()>();
        let handle = thread::spawn(move || loop {
            match stopped.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => {
                    if let Err(e) = store.evict_expired(Utc::now()) {
                        warn!(error = %e, "periodic cleanup failed");
                    }
                }
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        });
        Self {
            stop: Some(stop),
            handle: Some(handle),
        }
    }

    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("eviction worker panicked");
            }
        }
    }
}

impl Drop for EvictionWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{CardDesign, CardLetter, LayoutDirection};
    use tempfile::TempDir;

    fn document(name: &str, timestamp: i64) -> CardDocument {
        CardDocument {
            letters: vec![
                CardLetter { character: 'ㄱ', image_path: "/consonants/ㄱ.png".into() },
                CardLetter { character: 'ㅏ', image_path: "/vowels/ㅏ.png".into() },
            ],
            user_name: name.to_string(),
            phone_number: "01012345678".to_string(),
            design: CardDesign::Paper,
            layout_direction: LayoutDirection::Horizontal,
            sign_size: 20,
            timestamp,
        }
    }

    fn open_store(dir: &TempDir) -> CardStore {
        CardStore::open(dir.path(), Duration::days(DEFAULT_RETENTION_DAYS)).unwrap()
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        let doc = document("가", 1_000);

        store.save("abc123", &doc).unwrap();
        assert_eq!(store.load("abc123").unwrap(), Some(doc));
        assert_eq!(store.ids().unwrap(), vec!["abc123".to_string()]);
    }

    #[test]
    fn missing_card_is_none() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        assert_eq!(store.load("nothing").unwrap(), None);
    }

    #[test]
    fn save_overwrites() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        store.save("id", &document("가", 1)).unwrap();
        store.save("id", &document("나", 2)).unwrap();
        assert_eq!(store.load("id").unwrap().unwrap().user_name, "나");
    }

    #[test]
    fn resaving_refreshes_the_save_time() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        let now = Utc::now();

        store.save_at("id", &document("가", 1), now - Duration::days(10)).unwrap();
        store.save_at("id", &document("나", 2), now).unwrap();

        assert_eq!(store.evict_expired(now).unwrap(), 0);
        assert_eq!(store.load("id").unwrap().unwrap().user_name, "나");
    }

    #[test]
    fn sweeps_racing_saves_keep_fresh_cards() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(open_store(&dir));
        let now = Utc::now();
        let ids: Vec<String> = (0..20).map(|i| format!("card{i}")).collect();
        for id in &ids {
            store.save_at(id, &document("가", 1), now - Duration::days(10)).unwrap();
        }

        let writer = {
            let store = Arc::clone(&store);
            let ids = ids.clone();
            thread::spawn(move || {
                for id in &ids {
                    store.save(id, &document("나", 2)).unwrap();
                }
            })
        };
        let sweeper = {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for _ in 0..20 {
                    store.evict_expired(Utc::now()).unwrap();
                }
            })
        };
        writer.join().unwrap();
        sweeper.join().unwrap();

        // Every card the writer touched was resaved after any sweep that could
        // delete it, so all of them must now be present and fresh.
        for id in &ids {
            assert_eq!(store.load(id).unwrap().unwrap().user_name, "나", "{id}");
        }
        assert_eq!(store.evict_expired(Utc::now()).unwrap(), 0);
    }

    #[test]
    fn non_positive_retention_is_rejected() {
        let dir = TempDir::new().unwrap();
        for retention in [Duration::zero(), Duration::days(-1)] {
            assert!(matches!(
                CardStore::open(dir.path(), retention),
                Err(CardError::InvalidConfig { .. })
            ));
        }
    }

    #[test]
    fn rejects_ids_that_escape_the_store() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        for id in ["", "../x", "a/b", "ABC", "a.json"] {
            assert!(matches!(store.load(id), Err(CardError::InvalidId(_))), "{id}");
            assert!(matches!(
                store.save(id, &document("가", 1)),
                Err(CardError::InvalidId(_))
            ));
        }
    }

    #[test]
    fn corrupt_document_is_an_error() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        fs::write(dir.path().join(CARDS_DIR).join("bad.json"), b"{not json").unwrap();
        assert!(matches!(store.load("bad"), Err(CardError::Json(_))));
    }

    #[test]
    fn evicts_only_expired_cards() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        let now = Utc::now();

        store.save_at("old", &document("가", 1), now - Duration::days(8)).unwrap();
        store.save_at("edge", &document("나", 2), now - Duration::days(6)).unwrap();
        store.save_at("new", &document("다", 3), now).unwrap();

        assert_eq!(store.evict_expired(now).unwrap(), 1);
        assert_eq!(store.load("old").unwrap(), None);
        assert!(store.load("edge").unwrap().is_some());
        assert!(store.load("new").unwrap().is_some());

        assert_eq!(store.evict_expired(now).unwrap(), 0);
        assert_eq!(store.evict_expired(now + Duration::days(2)).unwrap(), 1);
        assert_eq!(store.ids().unwrap(), vec!["new".to_string()]);
    }

    #[test]
    fn unindexed_cards_fall_back_to_file_time() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        let bytes = serde_json::to_vec(&document("가", 1)).unwrap();
        fs::write(dir.path().join(CARDS_DIR).join("stray.json"), bytes).unwrap();

        assert_eq!(store.evict_expired(Utc::now()).unwrap(), 0);
        assert_eq!(store.evict_expired(Utc::now() + Duration::days(8)).unwrap(), 1);
        assert_eq!(store.load("stray").unwrap(), None);
    }

    #[test]
    fn index_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let now = Utc::now();
        open_store(&dir)
            .save_at("old", &document("가", 1), now - Duration::days(30))
            .unwrap();

        let reopened = open_store(&dir);
        assert_eq!(reopened.evict_expired(now).unwrap(), 1);
    }

    #[test]
    fn worker_evicts_in_background() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(open_store(&dir));
        store
            .save_at("old", &document("가", 1), Utc::now() - Duration::days(10))
            .unwrap();

        let worker = EvictionWorker::spawn(Arc::clone(&store), std::time::Duration::from_millis(10));
        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
        while store.load("old").unwrap().is_some() && std::time::Instant::now() < deadline {
            thread::sleep(std::time::Duration::from_millis(10));
        }
        worker.stop();
        assert_eq!(store.load("old").unwrap(), None);
    }
}
