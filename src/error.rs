use std::path::PathBuf;

/// Errors that can occur while loading the housing dataset.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to open dataset {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("line {line}: expected 4 fields, found {found}")]
    FieldCount { line: u64, found: usize },

    #[error("line {line}: invalid {field} '{value}'")]
    InvalidNumber {
        line: u64,
        field: &'static str,
        value: String,
    },

    #[error("line {line}: unknown house type '{value}'")]
    UnknownHouseType { line: u64, value: String },

    #[error("line {line}: unknown wall color '{value}'")]
    UnknownWallColor { line: u64, value: String },

    #[error("dataset contains no records")]
    Empty,
}

/// Errors raised by the model and loss functions on malformed input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("cannot compute a mean over zero samples")]
    EmptyInput,

    #[error("length mismatch: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error("sample {index}: one-hot type vector has length {len}, expected {expected}")]
    OneHotWidth {
        index: usize,
        len: usize,
        expected: usize,
    },
}

/// Errors that can occur while drawing a frame.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RenderError {
    #[error("canvas must be non-empty, got {width}x{height}")]
    EmptyCanvas { width: u16, height: u16 },

    #[error("non-finite {axis} bounds [{min}, {max}]")]
    NonFiniteBounds { axis: &'static str, min: f64, max: f64 },

    #[error("{axis} bounds [{min}, {max}] are too large to plot")]
    OversizedBounds { axis: &'static str, min: f64, max: f64 },
}

/// Errors that can occur during training.
#[derive(Debug, thiserror::Error)]
pub enum TrainingError {
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    #[error("render error at epoch {epoch}: {source}")]
    Render { epoch: usize, source: RenderError },
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}
