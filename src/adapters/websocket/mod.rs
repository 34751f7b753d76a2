//! WebSocket adapters for realtime notifications and updates.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │        Mutation handlers (post-commit) │ client frames               │
//! └─────────────────────────────────────────────────────────────────────┘
//!                                     │
//!                                     ▼
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      FanoutEngine                                    │
//! │   - Resolves recipient roles (presence, then user directory)         │
//! │   - Applies the audience rule of the notification type               │
//! │   - Picks personal, role or global delivery                          │
//! └─────────────────────────────────────────────────────────────────────┘
//!                                     │
//!                                     ▼
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      RoomManager                                     │
//! │   Room: user-s1     Room: student     Room: teacher    Room: admin   │
//! │   └── conn-a        ├── conn-a        └── conn-c       └── conn-d    │
//! │                     └── conn-b                                       │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`messages`] - Socket frame protocol types
//! - [`rooms`] - Room membership and per-connection queues
//! - [`presence`] - Who is online
//! - [`fanout`] - Delivery rules, implements `RealtimePublisher`
//! - [`session`] - Connection lifecycle
//! - [`handler`] - Axum WebSocket upgrade handler

pub mod fanout;
pub mod handler;
pub mod messages;
pub mod presence;
pub mod rooms;
pub mod session;

pub use fanout::FanoutEngine;
pub use handler::{websocket_router, ws_handler, WebSocketState};
pub use messages::{ClientEvent, ServerEvent};
pub use presence::PresenceRegistry;
pub use rooms::{OutboundReceiver, RoomManager, DEFAULT_OUTBOUND_BUFFER};
pub use session::{ConnectionSession, RealtimeHub};
