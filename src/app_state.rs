use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::mood::{Clock, MoodTable, MusicLink, SystemClock};
use crate::store::Store;

type RngFactory = Arc<dyn Fn() -> StdRng + Send + Sync>;

/// Shared state handed to every handler
/// Only the sled store is written to; everything else is read-only
#[derive(Clone)]
pub struct AppState {
    /// Mood table, fixed for the process lifetime
    pub table: Arc<MoodTable>,

    /// Catalog and check-in storage
    pub store: Arc<Store>,

    /// Template for music links in shift responses
    pub music_link: Arc<MusicLink>,

    /// Wall-clock source for the cosmic tag
    pub clock: Arc<dyn Clock>,

    rng: RngFactory,
}

impl AppState {
    pub fn new(table: MoodTable, store: Store, music_link: MusicLink) -> Self {
        Self {
            table: Arc::new(table),
            store: Arc::new(store),
            music_link: Arc::new(music_link),
            clock: Arc::new(SystemClock),
            rng: Arc::new(StdRng::from_entropy),
        }
    }

    /// Fresh random source for one request
    pub fn rng(&self) -> StdRng {
        (self.rng)()
    }

    #[cfg(test)]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Every request replays the same seeded sequence
    #[cfg(test)]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Arc::new(move || StdRng::seed_from_u64(seed));
        self
    }
}
