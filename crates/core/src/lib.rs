//! DI Catalog Core - Shared types library.
//!
//! This crate provides the types shared by every DI catalog component:
//! - `storefront` - The web application (public catalog and admin views)
//! - `cli` - Command-line tools for inspection and seeding
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`palette`] - The fixed color palette offered by selection widgets
//! - [`routing`] - Route table and history strategies for the three views
//! - [`types`] - Product, cart and quote records exchanged with the backend

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod palette;
pub mod routing;
pub mod types;

pub use palette::{COLOR_PALETTE, ColorOption, find_color, palette};
pub use routing::{HistoryMode, Route, RouteError, RouteTable, View};
pub use types::*;
