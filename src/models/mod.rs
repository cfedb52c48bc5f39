//! Data model: products, inventory records, cart lines, orders, customers,
//! CMS posts, and the auth session.

pub mod auth;
pub mod cart;
pub mod cms;
pub mod customer;
pub mod inventory;
pub mod order;
pub mod product;

pub use auth::{Role, User};
pub use cart::{CartItem, CartLine};
pub use cms::{ContentMap, Post, PostStatus};
pub use customer::{CustomerProfile, CustomerStatus, Interaction, InteractionKind, PurchaseStats};
pub use inventory::{InventoryEvent, InventoryRecord, LowStockAlert};
pub use order::{
    Order, OrderItem, OrderStatus, OrderTotals, PaymentData, PaymentMethod, ShippingAddress,
};
pub use product::{CatalogProduct, Category, Size};
