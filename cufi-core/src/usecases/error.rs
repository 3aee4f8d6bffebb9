use crate::{repositories, token::TokenError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("The user does not exist")]
    UserNotFound,
    #[error("The event does not exist")]
    EventNotFound,
    #[error("The list does not exist")]
    ListNotFound,
    #[error("The incident does not exist")]
    IncidentNotFound,
    #[error("There is no such session")]
    SessionNotFound,
    #[error("The event has not been rated by this user")]
    RatingNotFound,
    #[error("The user does not attend this event")]
    AssistanceNotFound,
    #[error("The event is not part of the list")]
    EventNotInList,
    #[error("The user already exists")]
    UserExists,
    #[error("The event already exists")]
    EventExists,
    #[error("The event has already been rated by this user")]
    AlreadyRated,
    #[error("The user already attends this event")]
    AlreadyAttending,
    #[error("The user is already logged in")]
    AlreadyLoggedIn,
    #[error("The event is already part of the list")]
    EventAlreadyInList,
    #[error("The list is owned by another user")]
    NotListOwner,
    #[error("The list name is reserved")]
    ReservedListName,
    #[error("This is not allowed")]
    Forbidden,
    #[error("Only admins are allowed to do this")]
    AdminOnly,
    #[error("Invalid user id")]
    InvalidUserId,
    #[error("Invalid token")]
    InvalidToken,
    #[error("The claim '{0}' has an unexpected type")]
    ClaimTypeMismatch(&'static str),
    #[error("Failed to send notification: {0}")]
    Notification(#[source] anyhow::Error),
    #[error(transparent)]
    Token(TokenError),
    #[error(transparent)]
    Repo(#[from] repositories::Error),
}

/// Coarse classification that callers can map to stable
/// response classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    AlreadyExists,
    PermissionDenied,
    InvalidToken,
    ClaimTypeMismatch,
    Invalid,
    Internal,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        use Error as E;
        match self {
            E::UserNotFound
            | E::EventNotFound
            | E::ListNotFound
            | E::IncidentNotFound
            | E::SessionNotFound
            | E::RatingNotFound
            | E::AssistanceNotFound
            | E::EventNotInList
            | E::Repo(repositories::Error::NotFound) => ErrorKind::NotFound,
            E::UserExists
            | E::EventExists
            | E::AlreadyRated
            | E::AlreadyAttending
            | E::AlreadyLoggedIn
            | E::EventAlreadyInList
            | E::Repo(repositories::Error::AlreadyExists) => ErrorKind::AlreadyExists,
            E::NotListOwner | E::ReservedListName | E::Forbidden | E::AdminOnly => {
                ErrorKind::PermissionDenied
            }
            E::InvalidToken => ErrorKind::InvalidToken,
            E::ClaimTypeMismatch(_) => ErrorKind::ClaimTypeMismatch,
            E::InvalidUserId => ErrorKind::Invalid,
            E::Notification(_) | E::Token(_) | E::Repo(repositories::Error::Other(_)) => {
                ErrorKind::Internal
            }
        }
    }
}

impl From<TokenError> for Error {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::ClaimTypeMismatch { claim } => Self::ClaimTypeMismatch(claim),
            TokenError::InvalidToken(_) | TokenError::UnsupportedAlgorithm(_) => Self::InvalidToken,
            err => Self::Token(err),
        }
    }
}
