use thiserror::Error;

#[derive(Error, Debug)]
pub enum CartonError {
    #[error("file not embedded: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid embedded data: {0}")]
    Decode(String),

    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("invalid escape rule: placeholder {0:?} collides with the encoding alphabet")]
    InvalidEscapeRule(char),
}

pub type Result<T> = std::result::Result<T, CartonError>;
