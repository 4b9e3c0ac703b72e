use derive_more::Display;
use thiserror::Error as ThisError;

///
/// RegistryError
///
/// Failures surfaced by class resolution and entity materialization.
/// Each variant is a distinct condition callers are expected to branch on.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum RegistryError {
    #[error("bad argument: {0}")]
    BadArgument(String),

    #[error("class '{class}' not found: {reason}")]
    ClassNotFound {
        class: String,
        reason: ClassNotFoundReason,
    },

    #[error("metadata for class '{0}' not found")]
    MetaDataNotFound(String),

    #[error("class '{0}' is already registered with a different definition")]
    ClassConflict(String),

    #[error("base class '{base}' of '{class}' must be registered before it")]
    BaseNotRegistered { class: String, base: String },
}

impl RegistryError {
    pub(crate) fn class_not_found(class: impl Into<String>, reason: ClassNotFoundReason) -> Self {
        Self::ClassNotFound {
            class: class.into(),
            reason,
        }
    }

    pub(crate) fn metadata_not_found(class: impl Into<String>) -> Self {
        Self::MetaDataNotFound(class.into())
    }

    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::BadArgument(_) => ErrorClass::InvalidArgument,
            Self::ClassNotFound { .. } | Self::MetaDataNotFound(_) => ErrorClass::NotFound,
            Self::ClassConflict(_) => ErrorClass::Conflict,
            Self::BaseNotRegistered { .. } => ErrorClass::InvariantViolation,
        }
    }

    #[must_use]
    pub const fn origin(&self) -> ErrorOrigin {
        match self {
            Self::BadArgument(_) => ErrorOrigin::Entity,
            Self::MetaDataNotFound(_) => ErrorOrigin::Metadata,
            Self::ClassNotFound { .. }
            | Self::ClassConflict(_)
            | Self::BaseNotRegistered { .. } => ErrorOrigin::Registry,
        }
    }

    #[must_use]
    pub const fn is_metadata_not_found(&self) -> bool {
        matches!(self, Self::MetaDataNotFound(_))
    }

    #[must_use]
    pub const fn is_class_not_found(&self) -> bool {
        matches!(self, Self::ClassNotFound { .. })
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {self}", self.origin(), self.class())
    }
}

///
/// ClassNotFoundReason
///

#[derive(Clone, Debug, Display, Eq, PartialEq)]
pub enum ClassNotFoundReason {
    #[display("inheritance cycle through '{_0}'")]
    Cycle(String),

    #[display("inheritance chain deeper than {_0}")]
    DepthExceeded(usize),

    #[display("no constructor could be produced")]
    Unresolved,
}

///
/// ErrorClass
/// Internal error taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
#[remain::sorted]
pub enum ErrorClass {
    #[display("conflict")]
    Conflict,
    #[display("invalid_argument")]
    InvalidArgument,
    #[display("invariant_violation")]
    InvariantViolation,
    #[display("not_found")]
    NotFound,
}

///
/// ErrorOrigin
/// Internal origin taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
#[remain::sorted]
pub enum ErrorOrigin {
    #[display("entity")]
    Entity,
    #[display("metadata")]
    Metadata,
    #[display("registry")]
    Registry,
}
