//! Store services. Each service is a cheaply cloneable handle over the
//! shared storage backend; dependencies between stores (cart on inventory,
//! inventory on catalog, CRM on orders) are wired by [`Storefront::new`].
//!
//! [`Storefront::new`]: crate::Storefront::new

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod cms;
pub mod customers;
pub mod inventory;
pub mod orders;

pub use auth::AuthService;
pub use cart::CartService;
pub use catalog::CatalogService;
pub use cms::{CmsService, PostInput};
pub use customers::{CustomerInput, CustomerService};
pub use inventory::InventoryService;
pub use orders::{OrderService, PlaceOrderInput};
