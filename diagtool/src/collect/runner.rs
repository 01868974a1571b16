use super::collector::{Collector, GemCollector};
use super::error::CollectError;
use super::package::PackageIdentity;
use crate::shared::prelude::{run_log_dispatch, ConfigError, DiagConfig, RawOptions};
use chrono::Local;
use std::fs;
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing::Level;

/// One diagnostics run: resolve options, stage a timestamped workspace under
/// the output directory, then walk the collection steps in order, logging to
/// the console and to `diagtool.output` inside the workspace.
#[derive(Debug)]
pub struct DiagRunner {
    conf: DiagConfig,
    time_format: String,
}

impl DiagRunner {
    /// The run id is fixed here, not when the workspace is created, so every
    /// artifact of one invocation shares a single timestamp.
    pub fn new(params: &RawOptions) -> Result<Self, ConfigError> {
        let time_format = Local::now().format("%Y%m%d%H%M%S").to_string();
        let mut conf = DiagConfig::resolve(params)?;

        let identity = PackageIdentity::detect();
        conf.package_name = identity.package_name;
        conf.service_name = identity.service_name;

        Ok(Self { conf, time_format })
    }

    pub fn conf(&self) -> &DiagConfig {
        &self.conf
    }

    pub fn run(&mut self, filter: LevelFilter) -> Result<(), CollectError> {
        self.conf.time = self.time_format.clone();
        self.conf.workdir = self.conf.basedir.join(&self.time_format);
        self.conf.outdir = self.conf.workdir.join("output");
        fs::create_dir_all(&self.conf.workdir)?;
        fs::create_dir_all(&self.conf.outdir)?;

        let diaglog = self.conf.workdir.join("diagtool.output");
        let dispatch = run_log_dispatch(&diaglog, filter)?;

        tracing::dispatcher::with_default(&dispatch, || {
            info!("Parsing command options...");
            info!(
                "   Option : Output directory = {}",
                self.conf.basedir.display()
            );

            info!("Initializing parameters...");
            let collector = GemCollector::new(&self.conf, Level::WARN, true);

            self.delegate(&collector)
        })
    }

    fn delegate(&self, collector: &dyn Collector) -> Result<(), CollectError> {
        let package_name = &self.conf.package_name;

        info!("[Collect] Collecting {} gem information...", package_name);
        let gem_list = collector.collect_package_gems()?;
        info!(
            "[Collect] {} gem information is stored in {}",
            package_name,
            gem_list.display()
        );

        let gem_info = collector.collect_manually_installed_gems(&gem_list)?;
        info!(
            "[Collect] {} gem information (bundled by default) is stored in {}",
            package_name,
            gem_info.bundled.display()
        );
        info!(
            "[Collect] {} manually installed gem information is stored in {}",
            package_name,
            gem_info.local.display()
        );

        let local_gems = fs::read_to_string(&gem_info.local)?;
        let local_gems: Vec<&str> = local_gems.lines().collect();
        if local_gems != [""] {
            info!("[Collect] {} manually installed gems:", package_name);
            for gem in &local_gems {
                info!("[Collect]   * {}", gem);
            }
        }

        Ok(())
    }
}
