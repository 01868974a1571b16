use super::runner::DiagRunner;
use crate::shared::prelude::{LoggingOpts, RawOptions};
use anyhow::Result;
use clap::Args;
use tracing::error;

#[derive(Debug, Default, Args)]
pub struct CollectArgs {
    /// Directory the timestamped run workspace is created under
    #[arg(long, short = 'o')]
    output: Option<String>,

    /// Service type to collect for, only "fluentd" is available on Windows
    #[arg(long = "type", short = 't')]
    service_type: Option<String>,

    /// Mask hostnames and addresses in collected files (not available on Windows)
    #[arg(long, short = 'm')]
    mask: Option<String>,

    /// Additional words to mask, comma separated (not available on Windows)
    #[arg(long, short = 'w', value_delimiter = ',')]
    word_list: Option<Vec<String>>,

    /// File containing words to mask (not available on Windows)
    #[arg(long, short = 'f')]
    word_file: Option<String>,

    /// Seed to randomize masked words with (not available on Windows)
    #[arg(long, short = 's')]
    seed: Option<String>,

    /// Explicit path to the service configuration (not available on Windows)
    #[arg(long, short = 'c')]
    conf_path: Option<String>,

    /// Explicit path to the service log directory (not available on Windows)
    #[arg(long, short = 'l')]
    log_path: Option<String>,
}

impl CollectArgs {
    pub(crate) fn to_raw_options(&self) -> RawOptions {
        RawOptions {
            service_type: self.service_type.clone(),
            output: self.output.clone(),
            mask: self.mask.clone(),
            words: self.word_list.clone(),
            wfile: self.word_file.clone(),
            seed: self.seed.clone(),
            tdconf: self.conf_path.clone(),
            tdlog: self.log_path.clone(),
        }
    }
}

pub fn collect_root(logging: &LoggingOpts, args: &CollectArgs) -> Result<i32> {
    let mut runner = match DiagRunner::new(&args.to_raw_options()) {
        Err(e) => {
            error!("{}", e);
            return Ok(2);
        }
        Ok(runner) => runner,
    };

    runner.run(logging.to_level_filter())?;
    Ok(0)
}
