//! Directory collection
//!
//! Walks a root directory and reads every non-excluded file into a
//! [`FileMap`](crate::domain::FileMap).

pub mod collector;

pub use collector::{collect_files, CollectError, CollectOptions, CollectStats, Collection};
