use thiserror::Error;

/// Destination-store failures. All fatal; nothing here is retried.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("connect to destination store: {0}")]
    Connect(#[source] sqlx::Error),
    #[error("detail load ({stage}): {source}")]
    Detail {
        stage: &'static str,
        #[source]
        source: sqlx::Error,
    },
    #[error("summary load ({stage}): {source}")]
    Summary {
        stage: &'static str,
        #[source]
        source: sqlx::Error,
    },
}

pub type Result<T> = std::result::Result<T, StoreError>;
