//! Analytics record storage for marquee.
//!
//! [`RecordStore`] is the seam used by the analytics recorder. Two
//! implementations ship here: [`MemoryStore`] for tests and local runs, and
//! [`AppwriteStore`] for the hosted collection.

pub mod appwrite;
mod error;
pub mod memory;
mod record;
mod store;

pub use appwrite::{AppwriteStore, AppwriteTarget};
pub use error::{Result, StoreError};
pub use memory::{MemoryStore, StoreOp};
pub use record::{AnalyticsRecord, NewRecord, RecordFilter, RecordId, RecordUpdate};
pub use store::RecordStore;
