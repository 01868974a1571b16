use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrecheckError {
    #[error("[Precheck] Precheck feature is not supported on Windows.")]
    UnsupportedPlatform,
}
