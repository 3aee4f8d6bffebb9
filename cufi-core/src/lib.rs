pub mod feed;
pub mod filter;
pub mod gateways;
pub mod rating;
pub mod repositories;
pub mod token;
pub mod usecases;

pub mod entities {
    pub use cufi_entities::{
        assistance::*, event::*, id::*, incident::*, list::*, rating::*, session::*, time::*,
        user::*,
    };
}
