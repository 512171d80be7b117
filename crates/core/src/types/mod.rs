//! Record types exchanged with the hosted backend.
//!
//! These mirror the backend's table shapes. Nothing in this module performs
//! I/O; the storefront's client deserializes rows into these types.

pub mod cart;
pub mod id;
pub mod product;
pub mod quote;

pub use cart::{Cart, CartError, CartItem, Quantity};
pub use id::*;
pub use product::{Gender, NewProduct, ONE_SIZE, Product, ProductColor, ProductError, SizeType};
pub use quote::Quote;
