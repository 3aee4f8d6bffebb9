use std::time::Duration;

use uuid::Uuid;

use super::prelude::*;
use crate::token::{Algorithm, Claims, TokenService};

/// The caller of an operation as resolved from a session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: UserId,
    pub is_admin: bool,
}

impl Identity {
    /// Admins may act on behalf of every user.
    pub fn acts_for(&self, user_id: &UserId) -> bool {
        self.is_admin || &self.user_id == user_id
    }

    pub fn require_admin(&self) -> Result<()> {
        if self.is_admin {
            Ok(())
        } else {
            Err(Error::AdminOnly)
        }
    }
}

/// Open the single session of a user and return its token.
///
/// A stored session whose token does no longer verify, e.g. because
/// it has expired, is replaced.
pub fn login<R>(
    repo: &R,
    tokens: &TokenService,
    user_id: &UserId,
    device_token: Option<String>,
    token_lifetime: Option<Duration>,
) -> Result<String>
where
    R: UserRepo + SessionRepo,
{
    if repo.try_get_user(user_id)?.is_none() {
        return Err(Error::UserNotFound);
    }
    if let Some(session) = repo.try_get_session_of_user(user_id)? {
        if let Err(err) = tokens.resolve_claims(&session.token) {
            log::info!("Replacing stale session of user {user_id}: {err}");
            repo.delete_session_of_user(user_id)?;
        } else {
            return Err(Error::AlreadyLoggedIn);
        }
    }
    let issued_at = Timestamp::now();
    let mut claims = Claims::build()
        .user_id(user_id)
        .issued_at(issued_at)
        .token_id(Uuid::new_v4().to_string());
    if let Some(lifetime) = token_lifetime {
        claims = claims.expires_at(issued_at + lifetime);
    }
    let token = tokens.issue_claims(&claims.finish(), Algorithm::HS256)?;
    let session = Session {
        user_id: user_id.clone(),
        token,
        device_token,
    };
    repo.create_session(&session)
        .map_err(exists_as(Error::AlreadyLoggedIn))?;
    log::debug!("User {user_id} logged in");
    Ok(session.token)
}

pub fn logout<R>(repo: &R, token: &str) -> Result<UserId>
where
    R: SessionRepo,
{
    let session = repo
        .try_get_session_by_token(token)?
        .ok_or(Error::SessionNotFound)?;
    repo.delete_session_of_user(&session.user_id)?;
    Ok(session.user_id)
}

/// Verify the token and extract the user id without
/// consulting the sessions.
pub fn user_id_of_token(tokens: &TokenService, token: &str) -> Result<UserId> {
    let claims = tokens.resolve_claims(token)?;
    claims
        .user_id()
        .filter(UserId::is_valid)
        .ok_or(Error::InvalidToken)
}

/// Resolve the token of an active session into the identity of the caller.
pub fn resolve_identity<R>(repo: &R, tokens: &TokenService, token: &str) -> Result<Identity>
where
    R: UserRepo + SessionRepo,
{
    let user_id = user_id_of_token(tokens, token)?;
    match repo.try_get_session_of_user(&user_id)? {
        Some(session) if session.token == token => {}
        _ => return Err(Error::InvalidToken),
    }
    let user = repo.get_user(&user_id).map_err(not_found_as(Error::UserNotFound))?;
    Ok(Identity {
        user_id: user.id,
        is_admin: user.is_admin,
    })
}
