//! Project indexing and context assembly

pub mod context;
pub mod scanner;

pub use context::{ContextBuilder, ContextBundle, ProjectSummary};
pub use scanner::{FileCategory, ProjectIndex, ProjectScanner};
