use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{info, instrument};
use validator::Validate;

use crate::{
    common,
    config::StoreConfig,
    errors::StoreError,
    events::{Event, EventSender},
    models::{
        Order, OrderItem, OrderStatus, OrderTotals, PaymentData, PaymentMethod, ShippingAddress,
    },
    services::{cart::CartService, inventory::InventoryService},
    storage::{self, keys, Storage},
};

/// Checkout submission: the cart snapshot comes from the cart engine, the
/// address and payment selection from the form.
#[derive(Clone, Debug, Validate)]
pub struct PlaceOrderInput {
    #[validate]
    pub shipping: ShippingAddress,
    pub payment: PaymentData,
}

/// Order recorder: immutable order snapshots persisted under `orders`,
/// newest first, bounded.
///
/// Placement decrements inventory unconditionally — quantities were capped
/// by the cart engine when they entered the cart, and no re-check happens
/// here, so a stale cart clamps stock at zero instead of erroring.
#[derive(Clone)]
pub struct OrderService {
    storage: Arc<dyn Storage>,
    cart: CartService,
    inventory: InventoryService,
    config: StoreConfig,
    events: EventSender,
}

impl OrderService {
    pub fn new(
        storage: Arc<dyn Storage>,
        cart: CartService,
        inventory: InventoryService,
        config: StoreConfig,
        events: EventSender,
    ) -> Self {
        Self {
            storage,
            cart,
            inventory,
            config,
            events,
        }
    }

    pub fn get_orders(&self) -> Vec<Order> {
        storage::load_json(self.storage.as_ref(), keys::ORDERS)
    }

    pub fn save_orders(&self, orders: &[Order]) {
        storage::save_json(self.storage.as_ref(), keys::ORDERS, &orders);
    }

    /// Insert-or-replace by id; new orders go to the front and the oldest
    /// beyond the cap are evicted.
    pub fn upsert_order(&self, order: Order) {
        let mut orders = self.get_orders();
        match orders.iter().position(|o| o.id == order.id) {
            Some(idx) => orders[idx] = order,
            None => orders.insert(0, order),
        }
        orders.truncate(self.config.orders_cap);
        self.save_orders(&orders);
    }

    /// The snapshot written at checkout for the confirmation page.
    pub fn last_order(&self) -> Option<Order> {
        self.storage
            .get(keys::LAST_ORDER)
            .and_then(|raw| serde_json::from_str(&raw).ok())
    }

    fn shipping_fee(&self, subtotal: Decimal, district: &str) -> Decimal {
        if subtotal >= self.config.free_shipping_threshold {
            Decimal::ZERO
        } else if district == self.config.local_district {
            self.config.shipping_local
        } else {
            self.config.shipping_zone
        }
    }

    /// Places an order from the current cart snapshot: validates the input,
    /// builds the immutable record with derived totals, persists it,
    /// decrements stock for every line, writes the confirmation snapshot,
    /// and clears the cart.
    #[instrument(skip(self, input))]
    pub fn place_order(&self, input: PlaceOrderInput) -> Result<Order, StoreError> {
        input
            .validate()
            .map_err(|e| StoreError::Validation(e.to_string()))?;
        if input.payment.method != PaymentMethod::Cod {
            let missing_mobile = input.payment.mobile.trim().is_empty();
            let missing_txn = input
                .payment
                .transaction_id
                .as_deref()
                .map_or(true, |t| t.trim().is_empty());
            if missing_mobile || missing_txn {
                return Err(StoreError::Validation(
                    "mobile number and transaction id are required for mobile payments".into(),
                ));
            }
        }

        let lines = self.cart.detailed();
        if lines.is_empty() {
            return Err(StoreError::InvalidOperation("cart is empty".into()));
        }

        let subtotal = self.cart.total();
        let shipping = self.shipping_fee(subtotal, &input.shipping.district);
        let order = Order {
            id: format!("PB-{}", common::short_token_upper(6)),
            items: lines
                .into_iter()
                .map(|line| OrderItem {
                    product: line.product,
                    qty: line.item.qty,
                    size: line.item.size,
                })
                .collect(),
            totals: OrderTotals {
                subtotal,
                shipping,
                total: subtotal + shipping,
            },
            payment: input.payment,
            status: OrderStatus::Placed,
            payment_verified: false,
            created_at: Utc::now(),
            shipping_address: input.shipping,
        };

        self.upsert_order(order.clone());
        for item in &order.items {
            self.inventory
                .adjust_stock(&item.product.id, -i64::from(item.qty), item.size, None);
        }
        storage::save_json(self.storage.as_ref(), keys::LAST_ORDER, &order);
        self.cart.clear();
        self.events.send_or_log(Event::OrderPlaced(order.id.clone()));
        info!(order_id = %order.id, total = %order.totals.total, "order placed");
        Ok(order)
    }

    /// Admin status edit. Deliberately unguarded: the back office may set
    /// any status directly.
    #[instrument(skip(self))]
    pub fn update_status(&self, id: &str, new_status: OrderStatus) -> Result<Order, StoreError> {
        self.mutate(id, |order| {
            let old_status = order.status;
            order.status = new_status;
            Some(Event::OrderStatusChanged {
                order_id: order.id.clone(),
                old_status,
                new_status,
            })
        })
    }

    /// Admin payment verification toggle.
    pub fn set_payment_verified(&self, id: &str, verified: bool) -> Result<Order, StoreError> {
        self.mutate(id, |order| {
            order.payment_verified = verified;
            None
        })
    }

    /// Customer-facing cancellation, allowed only from `Placed` or
    /// `Processing`. Cancellation does not restock inventory; admins
    /// restock manually where warranted.
    #[instrument(skip(self))]
    pub fn cancel_order(&self, id: &str) -> Result<Order, StoreError> {
        let orders = self.get_orders();
        let order = orders
            .iter()
            .find(|o| o.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("Order {} not found", id)))?;
        if !order.status.is_cancellable() {
            return Err(StoreError::InvalidOperation(format!(
                "Order {} can no longer be cancelled",
                id
            )));
        }
        self.update_status(id, OrderStatus::Cancelled)
    }

    fn mutate(
        &self,
        id: &str,
        apply: impl FnOnce(&mut Order) -> Option<Event>,
    ) -> Result<Order, StoreError> {
        let mut orders = self.get_orders();
        let order = orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("Order {} not found", id)))?;
        let event = apply(order);
        let updated = order.clone();
        self.save_orders(&orders);
        if let Some(event) = event {
            self.events.send_or_log(event);
        }
        Ok(updated)
    }
}
