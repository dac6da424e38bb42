//! Lifecycle test suites
//!
//! - `test_flows`: end-to-end transition sequences through the public API
//! - `test_concurrency`: races between callbacks, staff actions and sweeps
//! - `test_sweep`: timeout sweeper driven with a controlled clock

mod test_flows;

use crate::cart::MemoryCart;
use crate::lifecycle::{LifecycleConfig, OrderLifecycle};
use crate::notify::{ConsoleSession, NotificationSink, SessionError};
use crate::payment::{
    GatewayError, GatewayResult, PaymentGateway, PrepayHandle, PrepayRequest, RefundRequest,
    RefundResult,
};
use crate::store::{MemoryOrderStore, OrderStore, StoreError, StoreResult};
use async_trait::async_trait;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use shared::order::{CartLine, Order, OrderLineItem, OrderStatus, StatusPatch, SubmitOrder};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Gateway double: records every call, optionally failing refunds.
#[derive(Default)]
pub(crate) struct ScriptedGateway {
    pub prepay_calls: Mutex<Vec<PrepayRequest>>,
    pub refund_calls: Mutex<Vec<RefundRequest>>,
    pub fail_refund: AtomicBool,
}

impl ScriptedGateway {
    pub fn refund_count(&self) -> usize {
        self.refund_calls.lock().len()
    }
}

#[async_trait]
impl PaymentGateway for ScriptedGateway {
    async fn create_prepay(&self, request: PrepayRequest) -> GatewayResult<PrepayHandle> {
        let handle = PrepayHandle {
            prepay_id: format!("prepay-{}", request.order_number),
            package: format!("prepay_id=prepay-{}", request.order_number),
        };
        self.prepay_calls.lock().push(request);
        Ok(handle)
    }

    async fn refund(&self, request: RefundRequest) -> GatewayResult<RefundResult> {
        if self.fail_refund.load(Ordering::SeqCst) {
            return Err(GatewayError::Provider("scripted failure".to_string()));
        }
        let result = RefundResult {
            refund_id: format!("refund-{}", request.refund_number),
        };
        self.refund_calls.lock().push(request);
        Ok(result)
    }
}

/// Console double: keeps every payload it was sent.
#[derive(Default)]
pub(crate) struct RecordingConsole {
    payloads: Mutex<Vec<String>>,
}

impl RecordingConsole {
    pub fn events(&self) -> Vec<serde_json::Value> {
        self.payloads
            .lock()
            .iter()
            .map(|p| serde_json::from_str(p).unwrap())
            .collect()
    }

    pub fn count(&self) -> usize {
        self.payloads.lock().len()
    }
}

#[async_trait]
impl ConsoleSession for RecordingConsole {
    async fn send_text(&self, payload: &str) -> Result<(), SessionError> {
        self.payloads.lock().push(payload.to_string());
        Ok(())
    }
}

/// Store wrapper that fails inserts on demand (submission atomicity tests).
pub(crate) struct FaultyStore {
    inner: MemoryOrderStore,
    pub fail_insert: AtomicBool,
}

impl FaultyStore {
    pub fn new() -> Self {
        Self {
            inner: MemoryOrderStore::new(),
            fail_insert: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl OrderStore for FaultyStore {
    async fn insert(&self, order: Order, items: Vec<OrderLineItem>) -> StoreResult<()> {
        if self.fail_insert.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("injected line-item failure".to_string()));
        }
        self.inner.insert(order, items).await
    }

    async fn get_by_id(&self, id: &str) -> StoreResult<Option<Order>> {
        self.inner.get_by_id(id).await
    }

    async fn get_by_number(&self, number: &str) -> StoreResult<Option<Order>> {
        self.inner.get_by_number(number).await
    }

    async fn line_items(&self, order_id: &str) -> StoreResult<Vec<OrderLineItem>> {
        self.inner.line_items(order_id).await
    }

    async fn update_status(
        &self,
        id: &str,
        expected: OrderStatus,
        patch: StatusPatch,
    ) -> StoreResult<Order> {
        self.inner.update_status(id, expected, patch).await
    }

    async fn find_by_status_older_than(
        &self,
        status: OrderStatus,
        cutoff: i64,
    ) -> StoreResult<Vec<Order>> {
        self.inner.find_by_status_older_than(status, cutoff).await
    }

    async fn batch_update_status(
        &self,
        ids: &[String],
        expected: OrderStatus,
        patch: StatusPatch,
    ) -> StoreResult<usize> {
        self.inner.batch_update_status(ids, expected, patch).await
    }

    async fn list_by_user(
        &self,
        user_id: i64,
        status: Option<OrderStatus>,
        page: u32,
        page_size: u32,
    ) -> StoreResult<(u64, Vec<Order>)> {
        self.inner.list_by_user(user_id, status, page, page_size).await
    }

    async fn count_by_status(&self, status: OrderStatus) -> StoreResult<u64> {
        self.inner.count_by_status(status).await
    }
}

/// Full wiring around in-memory collaborators plus one recording console.
pub(crate) struct TestHarness {
    pub store: Arc<MemoryOrderStore>,
    pub cart: Arc<MemoryCart>,
    pub gateway: Arc<ScriptedGateway>,
    pub console: Arc<RecordingConsole>,
    pub lifecycle: OrderLifecycle,
}

impl TestHarness {
    pub fn new() -> Self {
        let store = Arc::new(MemoryOrderStore::new());
        let cart = Arc::new(MemoryCart::new());
        let gateway = Arc::new(ScriptedGateway::default());
        let console = Arc::new(RecordingConsole::default());
        let sink = NotificationSink::new();
        sink.connect("console-1", console.clone());
        let lifecycle = OrderLifecycle::new(
            store.clone(),
            cart.clone(),
            gateway.clone(),
            sink,
            LifecycleConfig {
                gateway_timeout_ms: 1_000,
            },
        );
        Self {
            store,
            cart,
            gateway,
            console,
            lifecycle,
        }
    }

    pub fn submit_input() -> SubmitOrder {
        SubmitOrder {
            consignee: "张三".to_string(),
            phone: "13800000000".to_string(),
            address: "人民路 1 号".to_string(),
            remark: None,
        }
    }

    /// 15.00 × 2 + 12.50 = 42.50
    pub fn default_cart() -> Vec<CartLine> {
        vec![
            CartLine {
                product_id: 1,
                name: "鱼香肉丝".to_string(),
                quantity: 2,
                unit_price: Decimal::new(1500, 2),
            },
            CartLine {
                product_id: 2,
                name: "米饭".to_string(),
                quantity: 1,
                unit_price: Decimal::new(1250, 2),
            },
        ]
    }

    /// Seed the cart and submit an order for `user_id`.
    pub async fn submit(&self, user_id: i64) -> crate::lifecycle::SubmitReceipt {
        self.cart.set_cart(user_id, Self::default_cart());
        self.lifecycle
            .submit(user_id, Self::submit_input())
            .await
            .unwrap()
    }

    /// Submit and drive the order through the payment callback.
    pub async fn submit_paid(&self, user_id: i64) -> crate::lifecycle::SubmitReceipt {
        let receipt = self.submit(user_id).await;
        self.lifecycle
            .payment_callback(&receipt.number, "txn-test")
            .await
            .unwrap();
        receipt
    }
}
