//! DI catalog storefront library.
//!
//! This crate provides the web front end (catalog, product admin and quote
//! admin views) and the backend client as a library, allowing it to be
//! tested and reused by the CLI.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod supabase;
