/// Forest construction from flat resource records.
pub mod builder;

/// Text outline of a forest.
pub mod render;

pub use builder::{build_forest, Forest, TreeNode};
pub use render::render_forest;
