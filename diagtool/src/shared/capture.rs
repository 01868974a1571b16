use chrono::{DateTime, Utc};
use mockall::automock;
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use thiserror::Error;
use tracing::{debug, error, info};
use which::which_in;

#[derive(Clone, Debug, Default)]
pub struct OutputCapture {
    pub working_dir: PathBuf,
    stdout: String,
    stderr: String,
    pub exit_code: Option<i32>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub command: String,
}

#[derive(Clone, Debug)]
pub enum OutputDestination {
    StandardOut,
    Logging,
    Null,
}

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Unable to process file. {error:?}")]
    IoError {
        #[from]
        error: std::io::Error,
    },
    #[error("File {name} was not executable or it did not exist.")]
    MissingShExec { name: String },
    #[error("Unable to parse UTF-8 output. {error:?}")]
    FromUtf8Error {
        #[from]
        error: std::string::FromUtf8Error,
    },
}

pub struct CaptureOpts<'a> {
    pub working_dir: &'a Path,
    pub env_vars: BTreeMap<String, String>,
    pub path: &'a str,
    pub args: &'a [String],
    pub output_dest: OutputDestination,
}

impl<'a> CaptureOpts<'a> {
    fn command(&self) -> String {
        self.args.join(" ")
    }
}

#[automock]
pub trait ExecutionProvider {
    fn run_command<'a>(&self, opts: CaptureOpts<'a>) -> Result<OutputCapture, CaptureError>;

    /// Run a command for its output alone. A command that cannot be executed
    /// reports its error text as the output, the way a diagnostics artifact
    /// records what the host actually looked like.
    fn run_for_output(&self, path: &str, workdir: &Path, args: &[String]) -> String {
        let result = self.run_command(CaptureOpts {
            working_dir: workdir,
            args,
            output_dest: OutputDestination::Null,
            path,
            env_vars: Default::default(),
        });

        match result {
            Ok(capture) => capture.generate_user_output(),
            Err(error) => error.to_string(),
        }
    }
}

#[derive(Default, Debug)]
pub struct DefaultExecutionProvider {}

impl ExecutionProvider for DefaultExecutionProvider {
    fn run_command<'a>(&self, opts: CaptureOpts<'a>) -> Result<OutputCapture, CaptureError> {
        OutputCapture::capture_output(opts)
    }
}

impl OutputCapture {
    pub fn capture_output(opts: CaptureOpts<'_>) -> Result<Self, CaptureError> {
        let binary = check_pre_exec(&opts)?;

        debug!("Executing PATH={} {:?}", &opts.path, &opts.args);

        let start_time = Utc::now();
        let output = Command::new(&binary)
            .args(&opts.args[1..])
            .env("PATH", opts.path)
            .envs(&opts.env_vars)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .current_dir(opts.working_dir)
            .output()?;
        let end_time = Utc::now();

        let stdout = String::from_utf8(output.stdout)?;
        let stderr = String::from_utf8(output.stderr)?;

        match &opts.output_dest {
            OutputDestination::Logging => {
                for line in stdout.lines() {
                    info!("{}", line);
                }
                for line in stderr.lines() {
                    error!("{}", line);
                }
            }
            OutputDestination::StandardOut => {
                print!("{}", stdout);
                eprint!("{}", stderr);
            }
            OutputDestination::Null => {}
        }

        Ok(Self {
            working_dir: opts.working_dir.to_path_buf(),
            stdout,
            stderr,
            exit_code: output.status.code(),
            start_time,
            end_time,
            command: opts.command(),
        })
    }

    pub fn generate_user_output(&self) -> String {
        let mut output: Vec<&str> = self.stdout.lines().collect();
        output.extend(self.stderr.lines());
        output.join("\n")
    }

    pub fn get_stdout(&self) -> String {
        self.stdout.clone()
    }

    pub fn get_stderr(&self) -> String {
        self.stderr.clone()
    }
}

fn check_pre_exec(opts: &CaptureOpts) -> Result<PathBuf, CaptureError> {
    let command = opts.command();
    let found_binary = match opts.args.first() {
        None => return Err(CaptureError::MissingShExec { name: command }),
        Some(path) => which_in(path, Some(OsString::from(opts.path)), opts.working_dir),
    };

    let path = match found_binary {
        Ok(path) => path,
        Err(e) => {
            debug!("Unable to find binary {:?}", e);
            return Err(CaptureError::MissingShExec { name: command });
        }
    };

    let metadata = std::fs::metadata(&path)?;
    let permissions = metadata.permissions().mode();
    if permissions & 0o111 == 0 {
        return Err(CaptureError::MissingShExec {
            name: path.display().to_string(),
        });
    }

    Ok(path)
}
