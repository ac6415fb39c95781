#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Best-score bookkeeping between the world and a persistence store.
//!
//! The world only reports candidates through [`Event::BestScoreRaised`]. This
//! system reads the stored value before a session is built and forwards every
//! candidate that beats it. Store failures are logged and swallowed; gameplay
//! never observes them.

mod store;

use log::warn;
use long_snake_core::Event;

pub use store::{BestScoreStore, FileStore, MemoryStore, StoreError};

/// Pure system that ratchets the recorded best score.
#[derive(Debug, Default)]
pub struct BestScore {
    recorded: u32,
    failed_writes: u32,
}

impl BestScore {
    /// Reads the stored best score, falling back to zero when the store fails.
    pub fn load<S>(store: &mut S) -> Self
    where
        S: BestScoreStore + ?Sized,
    {
        let recorded = store.load().unwrap_or_else(|error| {
            warn!("could not read best score, starting from zero: {error}");
            0
        });
        Self {
            recorded,
            failed_writes: 0,
        }
    }

    /// Best score known to the system. Pass this to the world at construction.
    #[must_use]
    pub const fn recorded(&self) -> u32 {
        self.recorded
    }

    /// Number of candidate values the store failed to persist.
    #[must_use]
    pub const fn failed_writes(&self) -> u32 {
        self.failed_writes
    }

    /// Consumes world events and persists candidates that beat the record.
    pub fn handle<S>(&mut self, events: &[Event], store: &mut S)
    where
        S: BestScoreStore + ?Sized,
    {
        let Some(candidate) = events
            .iter()
            .filter_map(|event| match event {
                Event::BestScoreRaised { score } => Some(*score),
                _ => None,
            })
            .max()
        else {
            return;
        };

        if candidate <= self.recorded {
            return;
        }

        self.recorded = candidate;
        if let Err(error) = store.save(candidate) {
            self.failed_writes = self.failed_writes.saturating_add(1);
            warn!("could not persist best score {candidate}: {error}");
        }
    }
}
