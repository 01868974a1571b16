use super::error::CollectError;
use super::package::PackageIdentity;
use crate::shared::prelude::{DefaultExecutionProvider, DiagConfig, ExecutionProvider};
use mockall::automock;
use std::collections::BTreeSet;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, Level};
use which::which_in;

/// Locations of the split gem manifests produced by
/// [`Collector::collect_manually_installed_gems`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GemArtifacts {
    pub bundled: PathBuf,
    pub local: PathBuf,
}

#[automock]
pub trait Collector {
    /// Capture the package's installed gem list into the output directory and
    /// return the artifact path.
    fn collect_package_gems(&self) -> Result<PathBuf, CollectError>;

    /// Split a previously collected gem list into default-bundled and manually
    /// installed artifacts.
    fn collect_manually_installed_gems(&self, gem_list: &Path)
        -> Result<GemArtifacts, CollectError>;
}

pub struct GemCollector {
    identity: PackageIdentity,
    workdir: PathBuf,
    outdir: PathBuf,
    min_level: Level,
    on_windows: bool,
    bundled_manifest: PathBuf,
    exec_runner: Arc<dyn ExecutionProvider>,
}

impl GemCollector {
    pub fn new(conf: &DiagConfig, min_level: Level, on_windows: bool) -> Self {
        Self::with_exec_runner(
            conf,
            min_level,
            on_windows,
            Arc::new(DefaultExecutionProvider::default()),
        )
    }

    pub fn with_exec_runner(
        conf: &DiagConfig,
        min_level: Level,
        on_windows: bool,
        exec_runner: Arc<dyn ExecutionProvider>,
    ) -> Self {
        let identity = PackageIdentity::from_package_name(&conf.package_name);
        let bundled_manifest = identity.bundled_gem_manifest().to_path_buf();

        Self {
            identity,
            workdir: conf.workdir.clone(),
            outdir: conf.outdir.clone(),
            min_level,
            on_windows,
            bundled_manifest,
            exec_runner,
        }
    }

    /// On the restricted platform the gem front-end is a batch wrapper, so the
    /// `.bat` name is preferred when it resolves.
    fn resolve_gem_tool(&self, path: &str) -> String {
        let gem_command = self.identity.gem_command();
        let mut candidates = Vec::new();
        if self.on_windows {
            candidates.push(format!("{}.bat", gem_command));
        }
        candidates.push(gem_command.to_string());

        for candidate in &candidates {
            if which_in(candidate, Some(OsString::from(path)), &self.workdir).is_ok() {
                return candidate.clone();
            }
        }

        // nothing resolved, let the capture layer report it in the artifact
        gem_command.to_string()
    }

    fn emit_debug(&self, message: &str) {
        if self.min_level >= Level::DEBUG {
            debug!("{}", message);
        }
    }

    fn emit_info(&self, message: &str) {
        if self.min_level >= Level::INFO {
            info!("{}", message);
        }
    }
}

impl Collector for GemCollector {
    fn collect_package_gems(&self) -> Result<PathBuf, CollectError> {
        let path = std::env::var("PATH").unwrap_or_default();
        let tool = self.resolve_gem_tool(&path);
        let args = vec![tool, "list".to_string()];
        self.emit_debug(&format!("Running {}", args.join(" ")));

        let output = self.exec_runner.run_for_output(&path, &self.workdir, &args);

        let artifact = self
            .outdir
            .join(format!("{}_gem_list.output", self.identity.package_name));
        write_lines(&artifact, output.lines())?;
        self.emit_info(&format!("Gem list written to {}", artifact.display()));

        Ok(artifact)
    }

    fn collect_manually_installed_gems(
        &self,
        gem_list: &Path,
    ) -> Result<GemArtifacts, CollectError> {
        let installed = fs::read_to_string(gem_list)?;
        let installed: Vec<&str> = installed.lines().filter(|line| !line.is_empty()).collect();

        let mut bundled = Vec::new();
        let mut local = Vec::new();
        match fs::read_to_string(&self.bundled_manifest) {
            Ok(manifest) => {
                let stock: BTreeSet<&str> = manifest
                    .lines()
                    .filter(|line| !line.is_empty())
                    .map(gem_name)
                    .collect();
                for line in installed {
                    if stock.contains(gem_name(line)) {
                        bundled.push(line);
                    } else {
                        local.push(line);
                    }
                }
            }
            // no manifest to compare against, the stock set is everything
            Err(_) => bundled = installed,
        }

        let bundled_path = self.outdir.join(format!(
            "{}_gem_list_bundled.output",
            self.identity.package_name
        ));
        let local_path = self.outdir.join(format!(
            "{}_gem_list_local.output",
            self.identity.package_name
        ));
        write_lines(&bundled_path, bundled)?;
        write_lines(&local_path, local)?;

        Ok(GemArtifacts {
            bundled: bundled_path,
            local: local_path,
        })
    }
}

/// `gem list` prints `name (versions)`, bundled manifests carry bare names.
fn gem_name(line: &str) -> &str {
    line.split_whitespace().next().unwrap_or(line)
}

/// Artifacts are plain lines with a trailing newline; an empty list is written
/// as the single empty line the runner checks for.
fn write_lines<'a, I>(path: &Path, lines: I) -> Result<(), std::io::Error>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut contents = lines.into_iter().collect::<Vec<_>>().join("\n");
    contents.push('\n');
    fs::write(path, contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::prelude::MockExecutionProvider;
    use tempfile::TempDir;

    fn test_conf(dir: &TempDir) -> DiagConfig {
        let workdir = dir.path().join("20240101000000");
        let outdir = workdir.join("output");
        fs::create_dir_all(&outdir).unwrap();

        DiagConfig {
            basedir: dir.path().to_path_buf(),
            service_type: "fluentd".to_string(),
            package_name: "td-agent".to_string(),
            service_name: "td-agent".to_string(),
            workdir,
            outdir,
            ..Default::default()
        }
    }

    fn mocked_collector(conf: &DiagConfig, gem_list: &str) -> GemCollector {
        let mut exec_runner = MockExecutionProvider::new();
        let gem_list = gem_list.to_string();
        exec_runner
            .expect_run_for_output()
            .times(1)
            .withf(|_, _, args| args[1] == "list")
            .returning(move |_, _, _| gem_list.clone());

        GemCollector::with_exec_runner(conf, Level::WARN, true, Arc::new(exec_runner))
    }

    #[test]
    fn package_gems_land_in_the_outdir() {
        let dir = TempDir::new().unwrap();
        let conf = test_conf(&dir);
        let collector = mocked_collector(&conf, "fluentd (1.16.2)\nmsgpack (1.7.2)");

        let artifact = collector.collect_package_gems().unwrap();

        assert_eq!(conf.outdir.join("td-agent_gem_list.output"), artifact);
        assert_eq!(
            "fluentd (1.16.2)\nmsgpack (1.7.2)\n",
            fs::read_to_string(&artifact).unwrap()
        );
    }

    #[test]
    fn manual_gems_split_against_the_bundled_manifest() {
        let dir = TempDir::new().unwrap();
        let conf = test_conf(&dir);

        let manifest = dir.path().join("bundled-gems");
        fs::write(&manifest, "fluentd\nmsgpack\n").unwrap();

        let gem_list = conf.outdir.join("td-agent_gem_list.output");
        fs::write(&gem_list, "fluentd (1.16.2)\nmsgpack (1.7.2)\nrake (13.0.6)\n").unwrap();

        let mut collector =
            GemCollector::new(&conf, Level::WARN, true);
        collector.bundled_manifest = manifest;

        let artifacts = collector.collect_manually_installed_gems(&gem_list).unwrap();

        assert_eq!(
            "fluentd (1.16.2)\nmsgpack (1.7.2)\n",
            fs::read_to_string(&artifacts.bundled).unwrap()
        );
        assert_eq!(
            "rake (13.0.6)\n",
            fs::read_to_string(&artifacts.local).unwrap()
        );
    }

    #[test]
    fn missing_manifest_marks_everything_bundled() {
        let dir = TempDir::new().unwrap();
        let conf = test_conf(&dir);

        let gem_list = conf.outdir.join("td-agent_gem_list.output");
        fs::write(&gem_list, "fluentd (1.16.2)\n").unwrap();

        let mut collector = GemCollector::new(&conf, Level::WARN, true);
        collector.bundled_manifest = dir.path().join("no-manifest-here");

        let artifacts = collector.collect_manually_installed_gems(&gem_list).unwrap();

        assert_eq!(
            "fluentd (1.16.2)\n",
            fs::read_to_string(&artifacts.bundled).unwrap()
        );
        assert_eq!("\n", fs::read_to_string(&artifacts.local).unwrap());
    }
}
