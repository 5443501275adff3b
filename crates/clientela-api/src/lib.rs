// clientela-api: Async Rust client for the clientes registry HTTP service

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::ClientesClient;
pub use error::Error;
pub use models::{ApiFieldError, Cliente};
pub use transport::{TlsMode, TransportConfig};
