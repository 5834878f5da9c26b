/// Path resolution module.
///
/// Walks parent links from a resource up to its root to produce the
/// root-to-resource name chain shown next to references.
mod path;

pub use path::{join_path, resolve_path, PathResolver};
