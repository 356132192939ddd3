//! Line-protocol server.
//!
//! This module provides:
//! - The accept loop with a bounded number of concurrent connections (`listener`)
//! - The per-connection request/response loop (`handler`)
//! - Configuration types (`config`, server-only)
//!
//! # Wire protocol
//!
//! ```text
//! client: get-food-report 2494378
//! server: Name: COLA
//! server: ...
//! server: END
//! client: exit
//! server: Connection closed
//! ```

#[cfg(feature = "server")]
pub mod config;
pub mod handler;
pub mod listener;

pub use handler::{CLOSING_LINE, END_MARKER, EXIT_COMMAND, handle_connection, respond};
pub use listener::Server;
