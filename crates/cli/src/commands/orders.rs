//! Order commands.

use merchant_admin_client::ApiClient;
use merchant_admin_core::{ListQuery, Order, OrderId, OrderStatus};

use super::{out, require_session};
use crate::error::CliError;

/// List orders, optionally filtered by status.
pub async fn list(
    client: &ApiClient,
    page: Option<u32>,
    status: Option<OrderStatus>,
) -> Result<(), CliError> {
    require_session(client)?;

    let query = ListQuery {
        page,
        status: status.map(|s| s.as_str().to_string()),
        ..ListQuery::default()
    };
    let orders = client.list_orders(&query).await?;
    if orders.items.is_empty() {
        out("No orders");
    }
    for order in &orders.items {
        out(&order_line(order));
    }
    Ok(())
}

/// Show one order with its line items.
pub async fn show(client: &ApiClient, id: &str) -> Result<(), CliError> {
    require_session(client)?;

    let order = client.get_order(&OrderId::new(id)).await?;
    out(&order_line(&order));
    for item in &order.items {
        let variant = item
            .variant_name
            .as_deref()
            .map_or_else(String::new, |v| format!(" ({v})"));
        out(&format!(
            "  {} x {}{} @ {:.2}",
            item.quantity, item.name, variant, item.unit_price
        ));
    }
    Ok(())
}

/// Move an order to a new status.
pub async fn set_status(
    client: &ApiClient,
    id: &str,
    status: OrderStatus,
    note: Option<String>,
) -> Result<(), CliError> {
    require_session(client)?;

    let order = client
        .update_order_status(&OrderId::new(id), status, note)
        .await?;
    out(&format!("Order {} is now {}", order.order_number, order.status));
    Ok(())
}

fn order_line(order: &Order) -> String {
    format!(
        "#{:<10} {:<11} payment={:<9} total={:<14} units={:<4} {} {}",
        order.order_number,
        order.status,
        order.payment_status,
        order.formatted_total(),
        order.unit_count(),
        order.created_at.format("%Y-%m-%d %H:%M"),
        order.customer_name.as_deref().unwrap_or_default(),
    )
}
