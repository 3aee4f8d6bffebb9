//! # cufi-gateways
//!
//! Clients of the external services that CultureFinder depends on.

pub mod agenda;
pub mod fcm;
pub mod log_only;
pub mod push_to_json_file;
