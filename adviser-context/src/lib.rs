//! One checkout as advice sees it: the repository root, the Python projects
//! inside it, and the next-step buffer shared by whatever advice is running.

mod context;
mod discover;
mod error;

pub use context::ExecutionContext;
pub use discover::{BUILTIN_IGNORES, PROJECT_MARKERS, VCS_MARKER, discover_projects, find_repo_root};
pub use error::ContextError;
