use shared::error::ApiException;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("server rejected request to {url}: {source}")]
    Api {
        url: String,
        #[source]
        source: ApiException,
    },
    #[error("unexpected response body from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { source, .. } => Some(source.status),
            ClientError::Transport { source, .. } | ClientError::Decode { source, .. } => {
                source.status().map(|status| status.as_u16())
            }
        }
    }
}
