use thiserror::Error;

pub const NOT_FOUND_MESSAGE: &str = "Freelancer não encontrado";

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Model(#[from] models::errors::ModelError),
    #[error("{0}")]
    NotFound(String),
    /// Non-success answer from the remote tabular service, body kept verbatim.
    #[error("Airtable API error: {status} {body}")]
    Remote { status: u16, body: String },
    #[error("http error: {0}")]
    Http(String),
    #[error("decode error: {0}")]
    Decode(String),
}

impl ServiceError {
    pub fn not_found() -> Self { Self::NotFound(NOT_FOUND_MESSAGE.to_string()) }
}

impl From<reqwest::Error> for ServiceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Http(e.to_string())
        }
    }
}
