use std::io;
use thiserror::Error;

/// Fatal generation failures. Everything recoverable (bad cascade token,
/// unknown fetch mode, malformed boolean) degrades to an absent hint and
/// never surfaces here.
#[derive(Error, Debug)]
pub enum Error {
    #[error("discriminator column `{column}` was not found in `{table}`")]
    DiscriminatorColumnNotFound { table: String, column: String },

    #[error("discriminator type `{0}` is not available")]
    DiscriminatorTypeNotAllowed(String),

    #[error("duplicate model name `{model}` derived from tables `{first}` and `{second}`")]
    DuplicateModelName {
        model: String,
        first: String,
        second: String,
    },

    #[error("unsupported option value `{0}`")]
    UnsupportedOption(String),

    #[error(transparent)]
    Storage(#[from] io::Error),
}

impl Error {
    /// Whether the error belongs to the fatal configuration class that
    /// aborts generation of a single table.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::DiscriminatorColumnNotFound { .. } | Self::DiscriminatorTypeNotAllowed(_)
        )
    }
}
