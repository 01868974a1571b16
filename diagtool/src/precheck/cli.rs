use super::error::PrecheckError;
use crate::collect::prelude::CollectArgs;
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct PrecheckArgs {
    #[clap(flatten)]
    options: CollectArgs,
}

/// Prechecks need the full collection stack, which Windows does not have. The
/// subcommand exists for option-shape parity and fails before touching the
/// configuration or the filesystem.
pub fn precheck_root(_args: &PrecheckArgs) -> Result<i32> {
    Err(PrecheckError::UnsupportedPlatform.into())
}
