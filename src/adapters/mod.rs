//! Adapters - Implementations of port interfaces.
//!
//! - `auth` - Token verification (HS256 JWT, mock)
//! - `http` - REST API, health endpoint and router assembly
//! - `memory` - In-memory storage for development and tests
//! - `postgres` - PostgreSQL storage
//! - `websocket` - Rooms, presence, fan-out and the socket endpoint

pub mod auth;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod websocket;
