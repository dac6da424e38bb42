//! Submit command handler
//!
//! Creates an order from the caller's current cart: the order row and its
//! line items are one atomic store insert, and the cart is cleared only
//! after the insert commits. A failed insert leaves no order behind and the
//! cart untouched.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use crate::lifecycle::error::{LifecycleError, LifecycleResult};
use crate::lifecycle::traits::{TransitionContext, TransitionHandler};
use shared::order::{Order, OrderLineItem, OrderStatus, PayStatus, SubmitOrder};
use shared::util;

/// Submit action
#[derive(Debug, Clone)]
pub struct SubmitAction {
    pub user_id: i64,
    pub input: SubmitOrder,
}

/// What the customer gets back after submission.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SubmitReceipt {
    pub id: String,
    pub number: String,
    pub order_time: i64,
    pub amount: Decimal,
}

#[async_trait]
impl TransitionHandler for SubmitAction {
    type Output = SubmitReceipt;

    async fn execute(&self, ctx: &mut TransitionContext<'_>) -> LifecycleResult<Self::Output> {
        // 1. Delivery info must be present (the only validated fields are the
        //    address-book ones, so any failure here is a missing address)
        self.input
            .validate()
            .map_err(|_| LifecycleError::MissingAddress)?;

        // 2. Snapshot the cart; an empty cart cannot become an order
        let lines = ctx.cart.current(self.user_id).await?;
        if lines.is_empty() {
            return Err(LifecycleError::EmptyCart);
        }

        // 3. Amount is computed server-side from the cart snapshot and fixed
        //    here for the order's whole life
        let amount: Decimal = lines.iter().map(|line| line.line_total()).sum();

        let id = Uuid::new_v4().to_string();
        let number = util::order_number();
        let order = Order {
            id: id.clone(),
            number: number.clone(),
            user_id: self.user_id,
            status: OrderStatus::PendingPayment,
            pay_status: PayStatus::Unpaid,
            amount,
            order_time: ctx.now,
            checkout_time: None,
            cancel_time: None,
            delivery_time: None,
            cancel_reason: None,
            rejection_reason: None,
            consignee: self.input.consignee.clone(),
            phone: self.input.phone.clone(),
            address: self.input.address.clone(),
            remark: self.input.remark.clone(),
        };
        let items: Vec<OrderLineItem> = lines
            .iter()
            .map(|line| OrderLineItem {
                order_id: id.clone(),
                product_id: line.product_id,
                name: line.name.clone(),
                quantity: line.quantity,
                unit_price: line.unit_price,
            })
            .collect();

        // 4. Atomic insert, then clear the cart
        ctx.store.insert(order, items).await?;
        ctx.cart.clear(self.user_id).await?;

        tracing::info!(
            order_id = %id,
            number = %number,
            user_id = self.user_id,
            amount = %amount,
            "Order submitted"
        );

        Ok(SubmitReceipt {
            id,
            number,
            order_time: ctx.now,
            amount,
        })
    }
}
