mod assistances;
mod authentication;
mod error;
mod events;
mod incidents;
mod ingestion;
mod lists;
mod notifications;
mod ratings;
mod recommendations;
mod users;

#[cfg(test)]
pub mod tests;

pub use self::{
    assistances::*,
    authentication::*,
    error::{Error, ErrorKind},
    events::*,
    incidents::*,
    ingestion::*,
    lists::*,
    notifications::*,
    ratings::*,
    recommendations::*,
    users::*,
};

mod prelude {
    pub use super::{authentication::Identity, error::Error};
    pub type Result<T> = std::result::Result<T, Error>;
    pub use crate::{
        entities::*,
        repositories::{Error as RepoError, *},
    };

    // Replace a generic `NotFound` of the repository
    // with a more specific error.
    pub fn not_found_as(not_found: Error) -> impl FnOnce(RepoError) -> Error {
        move |err| match err {
            RepoError::NotFound => not_found,
            err => Error::Repo(err),
        }
    }

    // Same for conflicts on unique keys.
    pub fn exists_as(exists: Error) -> impl FnOnce(RepoError) -> Error {
        move |err| match err {
            RepoError::AlreadyExists => exists,
            err => Error::Repo(err),
        }
    }
}
