// src/checker/history.rs
// =============================================================================
// This module keeps the probe history: for every URL, when it was last
// confirmed alive. It is the only state carried across runs.
//
// On disk it is a versioned JSON document:
//   { "version": 1, "probes": { "<url>": "<RFC 3339 timestamp>" } }
//
// A missing, malformed, or wrong-version file falls back to an empty store
// with a warning; the run continues and writes a fresh file at the end.
// =============================================================================

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{bail, Result};
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// How long a previously-reachable URL may keep failing before it is
/// escalated instead of being written off as a blip.
const TOLERABLE_LINK_DOWNTIME_DAYS: i64 = 7;

/// Minimum time between two probes of the same URL.
const PROBING_COOLDOWN_DAYS: i64 = 2;

/// Randomized extension of the cooldown, in minutes (up to one day). Spreads
/// re-probing of a batch of links that all succeeded on the same day.
const PROBING_SPREAD_MINUTES: i64 = 60 * 24;

const HISTORY_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct HistoryFile {
    version: u32,
    probes: BTreeMap<String, DateTime<Utc>>,
}

/// URL -> timestamp of the last confirmed success. Single writer per run.
#[derive(Debug, Default)]
pub struct ProbeHistory {
    probes: BTreeMap<String, DateTime<Utc>>,
}

impl ProbeHistory {
    /// Loads the history from disk, falling back to an empty store (with a
    /// warning) when the file is absent or cannot be used.
    pub fn load(path: &Path) -> ProbeHistory {
        match Self::try_load(path) {
            Ok(history) => {
                println!(
                    "Using the historical url-probe results from {}",
                    path.display()
                );
                history
            }
            Err(e) => {
                eprintln!("Failed to load historical url-probe results: {:#}", e);
                ProbeHistory::default()
            }
        }
    }

    fn try_load(path: &Path) -> Result<ProbeHistory> {
        let text = fs::read_to_string(path)?;
        let file: HistoryFile = serde_json::from_str(&text)?;
        if file.version != HISTORY_FORMAT_VERSION {
            bail!("unsupported history format version {}", file.version);
        }
        Ok(ProbeHistory {
            probes: file.probes,
        })
    }

    /// Writes the history back to disk.
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = HistoryFile {
            version: HISTORY_FORMAT_VERSION,
            probes: self.probes.clone(),
        };
        fs::write(path, serde_json::to_string_pretty(&file)?)?;
        Ok(())
    }

    /// Marks the URL as confirmed alive right now.
    pub fn rejuvenate(&mut self, url: &str) {
        self.rejuvenate_at(url, Utc::now());
    }

    pub fn rejuvenate_at(&mut self, url: &str, when: DateTime<Utc>) {
        self.probes.insert(url.to_string(), when);
    }

    /// Whether the URL was confirmed alive within the probing cooldown.
    ///
    /// The cooldown is re-randomized on every call: two days plus up to one
    /// day of spread. The floor never drops below the two-day base, so a
    /// success less than two days old is always a cache hit.
    pub fn reached_recently(&self, url: &str, now: DateTime<Utc>) -> bool {
        let Some(last_time_up) = self.probes.get(url) else {
            return false;
        };
        let spread = rand::thread_rng().gen_range(0..PROBING_SPREAD_MINUTES);
        let cooldown = Duration::days(PROBING_COOLDOWN_DAYS) + Duration::minutes(spread);
        now - *last_time_up < cooldown
    }

    /// Whether the URL has been down longer than the tolerable window: no
    /// confirmed success on record, or the last one is older than 7 days.
    pub fn long_dead(&self, url: &str, now: DateTime<Utc>) -> bool {
        let Some(last_time_up) = self.probes.get(url) else {
            return true;
        };
        println!("{} was reached most recently on {}", url, last_time_up);
        now - *last_time_up > Duration::days(TOLERABLE_LINK_DOWNTIME_DAYS)
    }

    /// Last confirmed-alive timestamp for a URL, if any.
    pub fn last_reached(&self, url: &str) -> Option<DateTime<Utc>> {
        self.probes.get(url).copied()
    }

    pub fn len(&self) -> usize {
        self.probes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }
}
