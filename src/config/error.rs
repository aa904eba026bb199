use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse date: {0}")]
    DateParse(#[from] chrono::ParseError),

    #[error("invalid time '{0}', expected HH:MM")]
    Time(String),

    #[error("{0}: min cannot be larger than max")]
    RangeOrder(&'static str),

    #[error("{0} must be strictly positive")]
    NotPositive(&'static str),

    #[error("euphotic_ratio must lie between 0 and 1")]
    EuphoticRatio,

    #[error("end_time cannot be earlier than start_time")]
    TimeOrder,

    #[error("required input '{0}' is not configured")]
    MissingInput(&'static str),

    #[error("unknown input '{0}'")]
    UnknownInput(String),
}
