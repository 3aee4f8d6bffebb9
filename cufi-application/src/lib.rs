#[macro_use]
extern crate log;

mod assistances;
mod authentication;
mod daily_job;
mod events;
mod import_events;
mod incidents;
mod notifications;
mod ratings;
mod saved_lists;
mod users;

pub mod prelude {
    pub use super::{
        assistances::*, authentication::*, daily_job::*, events::*, import_events::*,
        incidents::*, notifications::*, ratings::*, saved_lists::*, users::*,
    };
}

pub mod error;

pub type Result<T> = std::result::Result<T, error::AppError>;

pub(crate) use cufi_core::{entities::*, repositories::*, token::TokenService, usecases};

#[cfg(test)]
pub(crate) mod tests;

pub(crate) mod sqlite {
    pub use cufi_db_sqlite::Connections;
}
