//! Lifecycle transition implementations
//!
//! One file per operation. Each action implements the
//! [`TransitionHandler`](super::traits::TransitionHandler) trait, checks its
//! guards against the freshly loaded order before any write, and performs
//! the write as a compare-and-set on the expected prior status.

mod complete;
mod confirm;
mod deliver;
mod payment_callback;
mod prepay;
mod reject;
mod remind;
mod submit;
mod user_cancel;

pub use complete::CompleteAction;
pub use confirm::ConfirmAction;
pub use deliver::DeliverAction;
pub use payment_callback::{CallbackOutcome, PaymentCallbackAction};
pub use prepay::PrepayAction;
pub use reject::RejectAction;
pub use remind::RemindAction;
pub use submit::{SubmitAction, SubmitReceipt};
pub use user_cancel::UserCancelAction;

/// 用户主动取消时的默认原因
pub const USER_CANCEL_REASON: &str = "用户取消";
