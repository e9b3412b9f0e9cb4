//! Best-effort profile persistence. Failure never interrupts gameplay: the
//! driver logs and keeps going, and the simulation itself never sees these
//! errors.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("profile io: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed profile: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The JSON blob read once at startup and written after state-changing
/// events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub games_played: u32,
    pub victories: u32,
    pub high_score: u32,
}

impl Profile {
    pub fn record_run(&mut self, victory: bool, score: u32) {
        self.games_played += 1;
        if victory {
            self.victories += 1;
        }
        self.high_score = self.high_score.max(score);
    }
}

pub fn load(path: &Path) -> Result<Profile, PersistError> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Absence or parse failure means "use defaults", never fatal.
pub fn load_or_default(path: &Path) -> Profile {
    match load(path) {
        Ok(profile) => profile,
        Err(err) => {
            warn!(%err, "profile unavailable, starting fresh");
            Profile::default()
        }
    }
}

pub fn save(path: &Path, profile: &Profile) -> Result<(), PersistError> {
    let text = serde_json::to_string_pretty(profile)?;
    fs::write(path, text)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("gridveil_{}_{}.json", name, std::process::id()))
    }

    #[test]
    fn save_load_round_trip() {
        let path = scratch_path("roundtrip");
        let mut profile = Profile::default();
        profile.record_run(true, 420);
        save(&path, &profile).unwrap();
        assert_eq!(load(&path).unwrap(), profile);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let path = scratch_path("missing");
        let _ = fs::remove_file(&path);
        assert_eq!(load_or_default(&path), Profile::default());
    }

    #[test]
    fn garbage_file_falls_back_to_defaults() {
        let path = scratch_path("garbage");
        fs::write(&path, "{not json").unwrap();
        assert_eq!(load_or_default(&path), Profile::default());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn record_run_tracks_bests() {
        let mut profile = Profile::default();
        profile.record_run(false, 100);
        profile.record_run(true, 60);
        assert_eq!(profile.games_played, 2);
        assert_eq!(profile.victories, 1);
        assert_eq!(profile.high_score, 100);
    }
}
