//! Result pipeline: build the hierarchy, enrich it, filter, sort, and
//! derive display fields.

pub mod build;
pub mod display;
pub mod enrich;
pub mod filter;
pub mod model;
pub mod sort;

pub use build::build_hierarchy;
pub use display::preprocess;
pub use enrich::{LocalFilesystem, PathProbe, enrich};
pub use filter::{Filter, apply_filters};
pub use model::{InstallFlag, PackageGroup, PathGroup, ResultSet, VersionGroup};
pub use sort::sort_results;
