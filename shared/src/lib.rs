//! Shared types for the takeout ordering platform
//!
//! Domain types used by the server crate and by embedding services:
//! order models and status enums, operator-console message payloads,
//! and small utility functions (clock, id generation).

pub mod message;
pub mod order;
pub mod util;

// Re-exports
pub use message::{ConsoleEvent, ConsoleEventKind};
pub use order::{
    CartLine, Order, OrderLineItem, OrderStatus, PayStatus, StatusPatch, SubmitOrder,
};
pub use serde::{Deserialize, Serialize};
