mod cli;
mod error;

pub mod prelude {
    pub use super::cli::{precheck_root, PrecheckArgs};
    pub use super::error::PrecheckError;
}
