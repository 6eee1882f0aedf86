//! IPC module for overlay clients
//!
//! Read-only: clients may query status and subscribe to control events.

mod protocol;
mod server;

pub use server::Server;
