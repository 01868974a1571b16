mod capture;
mod config;
mod logging;

pub mod prelude {
    pub use super::capture::{
        CaptureError, CaptureOpts, DefaultExecutionProvider, ExecutionProvider,
        MockExecutionProvider, OutputCapture, OutputDestination,
    };
    pub use super::config::{ConfigError, DiagConfig, RawOptions};
    pub use super::logging::{run_log_dispatch, DiagFormat, LoggingOpts};
}
