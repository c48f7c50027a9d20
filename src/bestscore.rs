//! Persisted best score
//!
//! Stored in LocalStorage on wasm as a small JSON envelope. Reads fall back
//! to 0 and writes are fire-and-forget: a broken storage layer never touches
//! the simulation, the best just stays in-memory for the session.

use serde::{Deserialize, Serialize};

/// Best score across runs and sessions
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct BestScore {
    pub score: u32,
}

impl BestScore {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "skyflap_best";

    pub fn new(score: u32) -> Self {
        Self { score }
    }

    /// Record a score; returns true when it beats the stored best
    pub fn record(&mut self, score: u32) -> bool {
        if score > self.score {
            self.score = score;
            return true;
        }
        false
    }

    /// Load the best score from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(best) = serde_json::from_str::<BestScore>(&json) {
                    log::info!("Loaded best score: {}", best.score);
                    return best;
                }
            }
        }

        log::info!("No stored best score, starting at 0");
        Self::default()
    }

    /// Save the best score to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Best score saved ({})", self.score);
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_only_improvements() {
        let mut best = BestScore::default();
        assert!(best.record(5));
        assert_eq!(best.score, 5);

        assert!(!best.record(5));
        assert!(!best.record(3));
        assert_eq!(best.score, 5);

        assert!(best.record(7));
        assert_eq!(best.score, 7);
    }

    #[test]
    fn test_envelope_round_trips() {
        let best = BestScore::new(42);
        let json = serde_json::to_string(&best).unwrap();
        let back: BestScore = serde_json::from_str(&json).unwrap();
        assert_eq!(back.score, 42);
    }

    #[test]
    fn test_garbage_payload_is_rejected() {
        assert!(serde_json::from_str::<BestScore>("not json").is_err());
    }
}
