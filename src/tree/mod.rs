//! In-memory bucket tree
//!
//! Mirrors the store's bucket/pair hierarchy as a forest addressed by [`PathKey`],
//! linearizes it for the cursor, and carries expand state across reloads.

pub mod builder;
pub mod forest;
pub mod node;
pub mod path;
pub mod reconcile;
pub mod visible;

pub use builder::ForestBuilder;
pub use forest::{Forest, ReloadIssue, Resolved};
pub use node::{Bucket, Node, NodeId, Pair};
pub use path::PathKey;
pub use reconcile::reconcile;
pub use visible::{Direction, VisibleRow};
