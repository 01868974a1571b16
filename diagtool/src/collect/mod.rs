mod cli;
mod collector;
mod error;
mod package;
mod runner;

pub mod prelude {
    pub use super::cli::{collect_root, CollectArgs};
    pub use super::collector::{Collector, GemArtifacts, GemCollector, MockCollector};
    pub use super::error::CollectError;
    pub use super::package::{PackageIdentity, FLUENT_PACKAGE_MARKERS};
    pub use super::runner::DiagRunner;
}
