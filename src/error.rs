use thiserror::Error;

#[derive(Error, Debug)]
pub enum BatchProcError {
    #[error("ConfigError: {0}")]
    ConfigError(String),
}
