#![deny(missing_debug_implementations)]

//! # cufi-entities
//!
//! Reusable, agnostic domain entities for CultureFinder.
//!
//! The entities only contain generic functionality that does not reveal any application-specific business logic.

pub mod assistance;
pub mod event;
pub mod id;
pub mod incident;
pub mod list;
pub mod rating;
pub mod session;
pub mod time;
pub mod user;

#[cfg(any(test, feature = "builders"))]
pub mod builders;
