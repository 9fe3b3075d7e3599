//! HTTP handlers

mod auth;
mod health;
mod secure;

pub use auth::{login, logout, magic_link, me};
pub use health::{health, ready};
pub use secure::secure;
