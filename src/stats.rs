//! Running win/loss statistics, persisted as one JSON record.

use crate::error::StatsError;
use crate::info_log;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

/// Key the record is stored under.
pub const STATS_KEY: &str = "termo_stats_v1";
pub const MAX_RECENT_OUTCOMES: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Stats {
    #[serde(rename = "wins")]
    pub games_won: u32,
    pub games_played: u32,
    #[serde(rename = "streak")]
    pub current_streak: u32,
    pub best_streak: u32,
    /// Secret words of finished games, newest first
    pub recent_outcomes: Vec<String>,
}

impl Stats {
    pub fn record_outcome(&mut self, won: bool, final_word: &str) {
        self.games_played += 1;
        if won {
            self.games_won += 1;
            self.current_streak += 1;
            self.best_streak = self.best_streak.max(self.current_streak);
        } else {
            self.current_streak = 0;
        }
        self.recent_outcomes.insert(0, final_word.to_string());
        self.recent_outcomes.truncate(MAX_RECENT_OUTCOMES);
    }

    pub fn win_rate(&self) -> f64 {
        if self.games_played == 0 {
            0.0
        } else {
            f64::from(self.games_won) / f64::from(self.games_played)
        }
    }
}

/// Parse a stored record, rejecting ones that cannot describe real play.
pub fn parse_stats(raw: &str) -> Result<Stats, StatsError> {
    let mut stats: Stats = serde_json::from_str(raw)?;
    if stats.games_won > stats.games_played {
        return Err(StatsError::Corrupt {
            reason: format!(
                "{} wins out of {} games",
                stats.games_won, stats.games_played
            ),
        });
    }
    stats.recent_outcomes.truncate(MAX_RECENT_OUTCOMES);
    Ok(stats)
}

/// Keyed storage for serialized records.
pub trait StatsBackend {
    fn read(&self, key: &str) -> io::Result<Option<String>>;
    fn write(&mut self, key: &str, value: &str) -> io::Result<()>;
}

/// Stores each record as `<key>.json` inside a directory.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn record_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StatsBackend for FileBackend {
    fn read(&self, key: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.record_path(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Write to a sibling temp file, then rename it over the record.
    fn write(&mut self, key: &str, value: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, self.record_path(key))
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    records: HashMap<String, String>,
}

impl MemoryBackend {
    pub fn with_record(key: &str, value: &str) -> Self {
        let mut records = HashMap::new();
        records.insert(key.to_string(), value.to_string());
        Self { records }
    }
}

impl StatsBackend for MemoryBackend {
    fn read(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.records.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> io::Result<()> {
        self.records.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Read the record, falling back to zeroed stats when it is missing or bad.
pub fn load(backend: &dyn StatsBackend) -> Stats {
    let raw = match backend.read(STATS_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Stats::default(),
        Err(e) => {
            log::warn!("Cannot read stats record, starting fresh: {e}");
            return Stats::default();
        }
    };
    parse_stats(&raw).unwrap_or_else(|e| {
        log::warn!("Discarding unreadable stats record: {e}");
        Stats::default()
    })
}

/// Default directory for the stats record.
pub fn default_stats_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("termo"))
}

/// Process-wide owner of the statistics.
pub struct StatsStore {
    backend: Box<dyn StatsBackend>,
    stats: Stats,
}

impl StatsStore {
    pub fn open(backend: impl StatsBackend + 'static) -> Self {
        let stats = load(&backend);
        info_log!(
            "StatsStore::open() - {} games played, {} won",
            stats.games_played,
            stats.games_won
        );
        Self {
            backend: Box::new(backend),
            stats,
        }
    }

    /// File-backed store in the platform data directory, or in-memory when
    /// the platform has none.
    pub fn open_default() -> Self {
        match default_stats_dir() {
            Some(dir) => Self::open(FileBackend::new(dir)),
            None => {
                log::warn!("No data directory available; stats will not be saved");
                Self::in_memory()
            }
        }
    }

    pub fn in_memory() -> Self {
        Self::open(MemoryBackend::default())
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Update the stats for a finished game and persist them right away.
    pub fn record_outcome(&mut self, won: bool, final_word: &str) -> Result<(), StatsError> {
        self.stats.record_outcome(won, final_word);
        self.save()
    }

    pub fn save(&mut self) -> Result<(), StatsError> {
        let raw = serde_json::to_string(&self.stats)?;
        self.backend.write(STATS_KEY, &raw)?;
        Ok(())
    }
}
