use derive_more::Display;
use ecreg_core::{
    config::ConfigError,
    error::{ErrorOrigin as CoreErrorOrigin, RegistryError},
    metadata::MetadataError,
};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// Error
/// Public error type with a stable kind + origin taxonomy.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize, ThisError)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            kind,
            origin,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::ClassNotFound | ErrorKind::MetaDataNotFound
        )
    }
}

impl From<RegistryError> for Error {
    fn from(err: RegistryError) -> Self {
        let kind = match &err {
            RegistryError::BadArgument(_) => ErrorKind::BadArgument,
            RegistryError::ClassNotFound { .. } => ErrorKind::ClassNotFound,
            RegistryError::MetaDataNotFound(_) => ErrorKind::MetaDataNotFound,
            RegistryError::ClassConflict(_) => ErrorKind::Conflict,
            RegistryError::BaseNotRegistered { .. } => ErrorKind::Internal,
        };

        Self::new(kind, err.origin().into(), err.to_string())
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::new(ErrorKind::Config, ErrorOrigin::Config, err.to_string())
    }
}

impl From<MetadataError> for Error {
    fn from(err: MetadataError) -> Self {
        Self::new(ErrorKind::Metadata, ErrorOrigin::Metadata, err.to_string())
    }
}

///
/// ErrorKind
/// Public error taxonomy for callers.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ErrorKind {
    /// Input the caller can fix, such as props without a class name.
    BadArgument,

    /// The class could not be resolved for a reason other than missing
    /// metadata (inheritance cycle, chain too deep).
    ClassNotFound,

    /// The metadata store has no usable descriptor for a class in the chain.
    MetaDataNotFound,

    /// A different class is already registered under the name.
    Conflict,

    Config,
    Metadata,

    /// The caller cannot remediate this.
    Internal,
}

///
/// ErrorOrigin
/// Public origin taxonomy for callers.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ErrorOrigin {
    Config,
    Entity,
    Metadata,
    Registry,
}

impl From<CoreErrorOrigin> for ErrorOrigin {
    fn from(origin: CoreErrorOrigin) -> Self {
        match origin {
            CoreErrorOrigin::Entity => Self::Entity,
            CoreErrorOrigin::Metadata => Self::Metadata,
            CoreErrorOrigin::Registry => Self::Registry,
        }
    }
}
