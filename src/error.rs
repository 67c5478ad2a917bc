use thiserror::Error;

/// Sentinel returned on the integer result channel when a search cannot run.
pub const SEARCH_FAILED: i32 = -1;

/// Sentinel returned on the integer result channel for a successful radius search.
pub const RADIUS_OK: i32 = 1;

#[derive(Error, Debug)]
pub enum FlatKnnError {
    // Ingestion errors
    #[error("no data: {rows} rows x {cols} columns")]
    NoData { rows: usize, cols: usize },

    #[error("unsupported geometry type: {geometry_type}")]
    UnsupportedGeometry { geometry_type: String },

    #[error("invalid shape: {0}")]
    InvalidShape(String),

    // Search errors
    #[error("index not built")]
    NotBuilt,

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("unsupported search mode: {mode}")]
    UnsupportedSearchMode { mode: String },

    #[error("invalid radius: {radius}")]
    InvalidRadius { radius: f32 },

    #[error("knn {knn} exceeds dataset size {dataset_size}")]
    KnnExceedsDataset { knn: usize, dataset_size: usize },

    #[error("output buffer too small: need {needed}, got {actual}")]
    OutputTooSmall { needed: usize, actual: usize },

    // Config errors
    #[error("config error: {0}")]
    Config(String),

    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),

    // Serialization errors
    #[error("json serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FlatKnnError>;

impl FlatKnnError {
    /// Integer code on the legacy result channel. Every failure is `-1`.
    pub fn sentinel(&self) -> i32 {
        SEARCH_FAILED
    }

    /// Short machine-readable label, used as a metrics label value.
    pub fn reason(&self) -> &'static str {
        match self {
            FlatKnnError::NoData { .. } => "no_data",
            FlatKnnError::UnsupportedGeometry { .. } => "unsupported_geometry",
            FlatKnnError::InvalidShape(_) => "invalid_shape",
            FlatKnnError::NotBuilt => "not_built",
            FlatKnnError::DimensionMismatch { .. } => "dimension_mismatch",
            FlatKnnError::UnsupportedSearchMode { .. } => "unsupported_mode",
            FlatKnnError::InvalidRadius { .. } => "invalid_radius",
            FlatKnnError::KnnExceedsDataset { .. } => "knn_exceeds_dataset",
            FlatKnnError::OutputTooSmall { .. } => "output_too_small",
            FlatKnnError::Config(_) | FlatKnnError::Toml(_) => "config",
            FlatKnnError::Json(_) => "json",
            FlatKnnError::Io(_) => "io",
        }
    }
}

/// Collapses a search result onto the integer channel: the success value, or
/// `-1` for any failure.
pub trait SentinelExt {
    fn into_sentinel(self) -> i32;
}

impl SentinelExt for Result<usize> {
    fn into_sentinel(self) -> i32 {
        match self {
            Ok(n) => i32::try_from(n).unwrap_or(i32::MAX),
            Err(e) => e.sentinel(),
        }
    }
}

impl SentinelExt for Result<()> {
    fn into_sentinel(self) -> i32 {
        match self {
            Ok(()) => RADIUS_OK,
            Err(e) => e.sentinel(),
        }
    }
}
