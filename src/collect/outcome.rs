use std::sync::Arc;

/// Why a collector call was never issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum SkipReason {
    /// The repository has no default branch, which means it is empty.
    #[strum(serialize = "repository has no default branch")]
    NoDefaultBranch,

    /// The repository is disabled and rejects reads.
    #[strum(serialize = "repository is disabled")]
    Disabled,
}

/// The result of a single collector call.
#[derive(Debug, Clone)]
pub enum FetchOutcome<T> {
    /// The call succeeded and the payload was decoded.
    Fetched(T),

    /// The call was not made.
    Skipped(SkipReason),

    /// The service answered with a non-success status.
    Unavailable,

    /// The request could not be completed or the payload could not be decoded.
    Failed(Arc<ohno::AppError>),
}

impl<T> FetchOutcome<T> {
    /// Fold the raw client result and a decode step into an outcome.
    pub(crate) fn from_response<F>(response: crate::Result<Option<String>>, decode: F) -> Self
    where
        F: FnOnce(&str) -> crate::Result<T>,
    {
        match response {
            Ok(Some(body)) => match decode(&body) {
                Ok(value) => Self::Fetched(value),
                Err(e) => Self::Failed(Arc::new(e)),
            },
            Ok(None) => Self::Unavailable,
            Err(e) => Self::Failed(Arc::new(e)),
        }
    }

    #[must_use]
    pub const fn is_fetched(&self) -> bool {
        matches!(self, Self::Fetched(_))
    }

    /// Converts this outcome into an `Option`, returning `Some` only for `Fetched`.
    #[must_use]
    pub fn ok(self) -> Option<T> {
        match self {
            Self::Fetched(value) => Some(value),
            _ => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> FetchOutcome<U> {
        match self {
            Self::Fetched(value) => FetchOutcome::Fetched(f(value)),
            Self::Skipped(reason) => FetchOutcome::Skipped(reason),
            Self::Unavailable => FetchOutcome::Unavailable,
            Self::Failed(e) => FetchOutcome::Failed(e),
        }
    }

    /// Returns a string describing the status of this outcome.
    #[must_use]
    pub const fn status_str(&self) -> &'static str {
        match self {
            Self::Fetched(_) => "Fetched",
            Self::Skipped(_) => "Skipped",
            Self::Unavailable => "Unavailable",
            Self::Failed(_) => "Failed",
        }
    }
}

/// An outcome tagged with what it was collected for, such as a repository or team name.
#[derive(Debug, Clone)]
pub struct Collected<T> {
    pub subject: String,
    pub outcome: FetchOutcome<T>,
}

impl<T> Collected<T> {
    pub fn new(subject: impl Into<String>, outcome: FetchOutcome<T>) -> Self {
        Self {
            subject: subject.into(),
            outcome,
        }
    }
}
