//! Trained model representation: trees and forests.

mod forest;
pub(crate) mod tree;

pub use forest::Forest;
pub use tree::{MutableTree, NodeId, Tree, TreeValidationError};
