//! Gateway integration - chat platform interface for jimbo
//!
//! This crate owns everything between the platform connection and the event
//! lifecycle:
//! - **Socket** (`socket`) - transport loop with reconnects, one task per interaction
//! - **Slash Commands** (`commands`) - `/event create`, `/vibecheck`
//! - **Components** (`components`) - the Confirm, Delete, Going and Flaking buttons
//! - **Events** (`events`) - envelope types and the handler dispatcher
//! - **Embeds** (`embeds`) - message templates and in-place edits
//! - **Client** (`client`) - outbound replies, edits and deletes
//!
//! # Architecture
//!
//! ```text
//! Transport → GatewayRunner → EventDispatcher → Handlers → Lifecycle service
//!                                                              ↓
//!                               GatewayClient ← MessageTemplate / MessageEdit
//! ```
//!
//! # Key Types
//!
//! - `GatewayRunner` - event loop with reconnection logic
//! - `EventDispatcher` - routes envelopes to the handler for their type
//! - `MessageBuilder` - constructs embed messages with buttons
//! - `EventCommandService` / `ComponentService` - traits the server implements

pub mod client;
pub mod commands;
pub mod components;
pub mod embeds;
pub mod events;
pub mod socket;
