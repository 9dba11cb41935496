//! # reserv-indexer
//!
//! Event-to-entity projector for restaurant reservation NFT contracts.
//!
//! Decoded contract events (restaurant registration, drops, reservation
//! mints and secondary-market listings) are applied in chain order to an
//! entity store holding [`Restaurant`](domain::Restaurant),
//! [`Drop`](domain::Drop), [`Reservation`](domain::Reservation) and
//! [`Listing`](domain::Listing) records. Every saved record is broadcast
//! to WebSocket subscribers.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS Handler (ws/)
//!     │
//!     ├── IndexerService (service/)
//!     ├── EventBus (domain/)
//!     │
//!     ├── projector::process ── EntityStore (domain/)
//!     │
//!     └── PostgreSQL Event Log (persistence/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod projector;
pub mod service;
pub mod ws;
