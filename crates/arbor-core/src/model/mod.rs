//! Issue and review data types.

pub mod item;
pub mod review;

pub use item::{Comment, Dependency, DependencyType, IssueType, Item, ParseEnumError, Status};
pub use review::{ReviewAction, ReviewOutcome, ReviewStatus, ReviewSummary, ReviewType};
