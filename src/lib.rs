//! Exam Portal - realtime notification and exam event distribution
//!
//! Connections identify themselves with a `{userId, role}` handshake, join a
//! personal room and a role room, and receive notifications and exam,
//! schedule, registration and assignment updates fanned out by audience rules.
//! Notifications are also persisted so reconnecting clients can pull them.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
