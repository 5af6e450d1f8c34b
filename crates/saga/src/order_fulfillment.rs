//! Order-creation saga constants.

/// Root span covering the whole saga.
pub const ROOT_SPAN: &str = "order-creation-process";

/// Child span names, one per step.
pub const SPAN_CHECK_INVENTORY: &str = "check-inventory";
pub const SPAN_RESERVE_INVENTORY: &str = "reserve-inventory";
pub const SPAN_CREATE_SHIPMENT: &str = "create-shipment";

/// Span attribute keys.
pub const ATTR_ORDER_ID: &str = "order.id";
pub const ATTR_PRODUCT_ID: &str = "product.id";
pub const ATTR_ORDER_QUANTITY: &str = "order.quantity";
pub const ATTR_INVENTORY_AVAILABLE: &str = "inventory.available";
pub const ATTR_INVENTORY_QUANTITY: &str = "inventory.quantity";
pub const ATTR_RESERVATION_SUCCESS: &str = "reservation.success";
pub const ATTR_INVENTORY_REMAINING: &str = "inventory.remaining";
pub const ATTR_SAGA_STATE: &str = "saga.state";

/// Detail used when a downstream answered 2xx with no body.
pub const INVALID_INVENTORY_RESPONSE: &str = "Invalid response from inventory service";

/// Path prefix under which created orders are addressed.
pub const ORDERS_PATH: &str = "/orders";

/// Returns the resource locator for an order.
pub fn order_location(order_id: &impl std::fmt::Display) -> String {
    format!("{ORDERS_PATH}/{order_id}")
}
