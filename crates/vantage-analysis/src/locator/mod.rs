//! Project discovery: walking for candidate roots and resolving each
//! root's artifact files.

mod resolver;
mod walker;

pub use resolver::{load_artifacts, resolve_project, ResolvedProject};
pub use walker::{find_project_roots, DEFAULT_IGNORES};
