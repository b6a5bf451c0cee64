//! Batch Loading and Session Layer
//!
//! Sits between the front end and the extraction/query crates:
//! 1. **Load**: read a batch of documents concurrently, extract one record each
//! 2. **Partition**: keep successes in order, collect failures with their file names
//! 3. **Replace**: swap the batch into a [`Session`] together with fresh filters and sort
//!
//! The session answers every presentation question (taxonomy, view, totals, export
//! table) from its owned state.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use nomina_pipeline::{BatchLoader, Session};
//!
//! let outcome = BatchLoader::new().load_paths(&paths).await;
//! let mut session = Session::new();
//! session.replace_batch(outcome);
//! let totals = session.totals();
//! ```

pub mod error;
pub mod loader;
pub mod session;

pub use error::{LoadError, LoadResult};
pub use loader::{display_name, BatchLoader, BatchOutcome, Document, PARTIAL_FAILURE_SUFFIX};
pub use session::Session;
