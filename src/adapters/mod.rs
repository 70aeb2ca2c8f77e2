//! Adapters: implementations of the ports against real infrastructure.
//!
//! - `auth` - session token validation
//! - `http` - REST API surface
//! - `memory` - in-memory stores for tests and local development
//! - `postgres` - sqlx-backed stores
//! - `websocket` - realtime channels and rooms

pub mod auth;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod websocket;
