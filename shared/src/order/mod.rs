//! Order domain types
//!
//! This module provides the types shared across the ordering platform:
//! - Status enums: the order state machine vocabulary and the payment axis
//! - Models: persisted `Order` / `OrderLineItem` records
//! - Patches: the single vocabulary for conditional status mutation

pub mod model;
pub mod types;

// Re-exports
pub use model::{Order, OrderLineItem, StatusPatch};
pub use types::{CartLine, OrderStatus, PayStatus, SubmitOrder};
