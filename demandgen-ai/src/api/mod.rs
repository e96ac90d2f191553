//! HTTP API handlers for demandgen-ai

pub mod health;
pub mod letter;
pub mod process;

pub use health::health_routes;
pub use letter::letter_routes;
pub use process::process_routes;
