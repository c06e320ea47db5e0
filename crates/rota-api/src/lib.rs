// rota-api: Async Rust client for the workforce calendar HTTP backend.

pub mod client;
pub mod error;
pub mod events;
pub mod models;
pub mod transport;

pub use client::CalendarClient;
pub use error::Error;
pub use models::{ApiEvent, ApiEventInput, ApiUser, EventQuery, StatusUpdate, WireId};
pub use transport::TransportConfig;
