//! Review tree loading and flattening.

pub mod flatten;
pub mod loader;

pub use flatten::{DisplayNode, NodeFilter, StatusFilter, flatten, flatten_filtered};
pub use loader::{ReviewTree, load_review_tree};
