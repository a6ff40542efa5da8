pub mod cli;
pub mod config;
pub mod debug_middleware;
pub mod diagnostic;
pub mod error;
pub mod logging;
pub mod server;

pub use config::RelaySettings;
pub use error::RelayError;
pub use server::AppState;
