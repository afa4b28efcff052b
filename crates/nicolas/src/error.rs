#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid layout config `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
