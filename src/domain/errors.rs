use thiserror::Error;

/// Errors that can occur in team lifecycle, membership and pricing operations
///
/// Four abstract kinds: not-found, forbidden, invalid input, and
/// consultant-unavailable. Storage failures from the backing stores are
/// carried separately so the API layer can map them to a 500.
#[derive(Debug, Error, PartialEq)]
pub enum TeamError {
    #[error("Team not found")]
    TeamNotFound,

    #[error("Shared team not found")]
    SharedTeamNotFound,

    #[error("Consultant not found")]
    ConsultantNotFound,

    #[error("One or more consultants not found or not approved")]
    ConsultantsNotFound,

    #[error("Consultant not in team")]
    MemberNotFound,

    #[error("Access denied")]
    AccessDenied,

    #[error("Share link has expired")]
    ShareLinkExpired,

    #[error("Consultant is not approved")]
    ConsultantNotApproved,

    #[error("{0}")]
    InvalidInput(String),

    #[error("storage error: {0}")]
    Storage(String),
}

pub type TeamResult<T> = Result<T, TeamError>;

impl TeamError {
    pub fn invalid(message: impl Into<String>) -> Self {
        TeamError::InvalidInput(message.into())
    }
}
