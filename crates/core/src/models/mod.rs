//! Resource payloads exchanged with the merchant backend.
//!
//! Field names follow the backend's camelCase JSON; translated fields are
//! flattened through [`LocalizedText`](crate::LocalizedText).

pub mod category;
pub mod order;
pub mod page;
pub mod product;
pub mod settings;

pub use category::{Category, NewCategory};
pub use order::{Order, OrderItem, OrderStatusUpdate};
pub use page::{ListQuery, Page};
pub use product::{NewProduct, Product};
pub use settings::{BankDetails, PaymentSettings, StoreSettings};
