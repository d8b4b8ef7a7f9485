//! Mood core: table, blending, selection and the cosmic tag.
//!
//! Everything here is synchronous and request-scoped. The table is shared
//! read-only; clocks and random sources are passed in by the caller.

pub mod cosmic;
pub mod resolver;
pub mod select;
pub mod table;

pub use cosmic::{cosmic_today, Clock, CosmicReading, SystemClock};
pub use resolver::{compute_shift, merge_unique, MusicLink, ShiftResponse};
pub use table::{MoodTable, DEFAULT_FALLBACK};
