//! Durable, history-free session persistence.

/// History-free frame snapshots.
pub mod snapshot;
/// The key-value storage seam and session save/load.
pub mod storage;
