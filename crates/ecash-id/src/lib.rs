//! Human-readable request identifiers with a sequence that restarts every
//! calendar month.
//!
//! An identifier looks like `GHC-2025-03-007`: a fixed prefix, the period
//! (`year`, `month`) it was issued in, and the sequence number allocated for
//! that period. Sequence numbers come from a [`CounterStore`], whose single
//! atomic increment-with-upsert is the only synchronization point. The
//! generator itself holds no lock and caches nothing, so any number of
//! threads or processes can share one store.
//!
//! # Example
//!
//! ```
//! use ecash_id::{FixedPeriod, MemoryCounterStore, Period, SequenceGenerator};
//!
//! let period = Period::new(2025, 3).unwrap();
//! let generator = SequenceGenerator::new(MemoryCounterStore::new(), FixedPeriod(period));
//!
//! let id = generator.next_id().unwrap();
//! assert_eq!(id.to_string(), "GHC-2025-03-001");
//! assert_eq!(ecash_id::parse_period("GHC-2025-03-001"), Some(period));
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
mod generator;
mod id;
mod period;
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
#[cfg(feature = "serde")]
mod serde;
mod store;
mod time;

pub use crate::error::*;
pub use crate::generator::*;
pub use crate::id::*;
pub use crate::period::*;
pub use crate::store::*;
pub use crate::time::*;
