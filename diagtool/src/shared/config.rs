use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{option} is not supported on Windows.")]
    UnsupportedOption { option: String },
    #[error("fluentd type '{value}' is not supported, '-t' only supports 'fluentd' on Windows.")]
    UnsupportedPlatformFeature { value: String },
    #[error("output directory '{option}' must be specified")]
    MissingRequiredOption { option: String },
    #[error("output directory '{path}' does not exist")]
    NonexistentDirectory { path: String },
}

/// The full cross-platform option shape. Only `service_type` and `output` are
/// supported on Windows; the rest still parse so the CLI stays shape-compatible
/// with the other platforms and are rejected during resolution instead.
#[derive(Debug, Clone, Default)]
pub struct RawOptions {
    pub service_type: Option<String>,
    pub output: Option<String>,
    pub mask: Option<String>,
    pub words: Option<Vec<String>>,
    pub wfile: Option<String>,
    pub seed: Option<String>,
    pub tdconf: Option<String>,
    pub tdlog: Option<String>,
}

/// Resolved configuration for a single run. Built once by
/// [`DiagConfig::resolve`], enriched with the package identity and the run
/// timestamp by the runner, and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct DiagConfig {
    pub precheck: String,
    pub basedir: PathBuf,
    pub service_type: String,
    pub mask: String,
    pub words: Vec<String>,
    pub wfile: String,
    pub seed: String,
    pub tdconf: String,
    pub tdlog: String,
    pub package_name: String,
    pub service_name: String,
    pub time: String,
    pub workdir: PathBuf,
    pub outdir: PathBuf,
}

impl DiagConfig {
    /// Validate the raw options. Check order matters and is observable: the
    /// type value first, then the required output directory, then the scan for
    /// options this platform does not support.
    pub fn resolve(params: &RawOptions) -> Result<Self, ConfigError> {
        if let Some(service_type) = &params.service_type {
            if service_type != "fluentd" {
                return Err(ConfigError::UnsupportedPlatformFeature {
                    value: service_type.clone(),
                });
            }
        }

        let basedir = match &params.output {
            Some(output) => {
                if !Path::new(output).is_dir() {
                    return Err(ConfigError::NonexistentDirectory {
                        path: output.clone(),
                    });
                }
                PathBuf::from(output)
            }
            None => {
                return Err(ConfigError::MissingRequiredOption {
                    option: "-o".to_string(),
                });
            }
        };

        if let Some(option) = first_unsupported_option(params) {
            return Err(ConfigError::UnsupportedOption {
                option: option.to_string(),
            });
        }

        Ok(Self {
            basedir,
            service_type: "fluentd".to_string(),
            ..Default::default()
        })
    }
}

fn first_unsupported_option(params: &RawOptions) -> Option<&'static str> {
    [
        ("mask", params.mask.is_some()),
        ("words", params.words.is_some()),
        ("wfile", params.wfile.is_some()),
        ("seed", params.seed.is_some()),
        ("tdconf", params.tdconf.is_some()),
        ("tdlog", params.tdlog.is_some()),
    ]
    .into_iter()
    .find(|(_, present)| *present)
    .map(|(option, _)| option)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn valid_options(dir: &TempDir) -> RawOptions {
        RawOptions {
            output: Some(dir.path().display().to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn resolve_accepts_output_and_type() {
        let dir = TempDir::new().unwrap();
        let mut params = valid_options(&dir);
        params.service_type = Some("fluentd".to_string());

        let conf = DiagConfig::resolve(&params).unwrap();
        assert_eq!(dir.path(), conf.basedir.as_path());
        assert_eq!("fluentd", conf.service_type);
        assert_eq!("", conf.precheck);
        assert!(conf.words.is_empty());
        assert!(conf.workdir.as_os_str().is_empty());
    }

    #[test]
    fn resolve_rejects_unknown_type() {
        let dir = TempDir::new().unwrap();
        let mut params = valid_options(&dir);
        params.service_type = Some("td-agent".to_string());

        let err = DiagConfig::resolve(&params).unwrap_err();
        assert!(
            matches!(err, ConfigError::UnsupportedPlatformFeature { value } if value == "td-agent")
        );
    }

    #[test]
    fn resolve_requires_output() {
        let err = DiagConfig::resolve(&RawOptions::default()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingRequiredOption { .. }));
    }

    #[test]
    fn resolve_rejects_missing_directory() {
        let params = RawOptions {
            output: Some("/path/that/does/not/exist".to_string()),
            ..Default::default()
        };

        let err = DiagConfig::resolve(&params).unwrap_err();
        assert!(
            matches!(err, ConfigError::NonexistentDirectory { path } if path == "/path/that/does/not/exist")
        );
    }

    #[test]
    fn resolve_names_the_unsupported_option() {
        let dir = TempDir::new().unwrap();
        let mut params = valid_options(&dir);
        params.seed = Some("12345".to_string());

        let err = DiagConfig::resolve(&params).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedOption { option } if option == "seed"));
    }

    #[test]
    fn type_check_runs_before_the_unsupported_scan() {
        let dir = TempDir::new().unwrap();
        let mut params = valid_options(&dir);
        params.service_type = Some("bare".to_string());
        params.mask = Some("yes".to_string());

        let err = DiagConfig::resolve(&params).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedPlatformFeature { .. }));
    }
}
