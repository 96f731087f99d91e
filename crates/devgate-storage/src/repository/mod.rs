//! Repository layer: focused query modules over a borrowed connection.

mod auth;
mod config;

pub use auth::AuthRepo;
pub use config::ConfigRepo;
