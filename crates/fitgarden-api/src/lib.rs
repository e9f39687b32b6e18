// fitgarden-api: Async Rust client for the FitGarden back-office REST API

pub mod bookings;
pub mod catalog;
pub mod client;
pub mod error;
pub mod models;
pub mod session;
pub mod transport;

pub use client::ApiClient;
pub use error::Error;
pub use session::{Anonymous, SessionProvider, StaticToken};
