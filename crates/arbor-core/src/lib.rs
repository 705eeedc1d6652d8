//! arbor-core library.
//!
//! Navigation and review engine for hierarchical issue trees: loading the
//! tracker, flattening a root's subtree for display, narrowing by label
//! scope, and recording review decisions.
//!
//! # Conventions
//!
//! - **Errors**: fallible operations return [`ArborError`], which maps onto a
//!   stable [`ErrorCode`].
//! - **Logging**: use `tracing` macros (`info!`, `warn!`, `debug!`).

pub mod config;
pub mod error;
pub mod fuzzy;
pub mod hierarchy;
pub mod jsonl;
pub mod model;
pub mod persist;
pub mod prompt;
pub mod scope;
pub mod selector;
pub mod session;
pub mod tree;
pub mod viewport;

pub use error::{ArborError, ErrorCode};
pub use hierarchy::compare_hierarchical_ids;
pub use model::{Item, ReviewAction, ReviewOutcome, ReviewStatus, ReviewType};
pub use session::ReviewSession;
pub use tree::{DisplayNode, NodeFilter, StatusFilter, flatten, flatten_filtered};
pub use viewport::ensure_visible;
