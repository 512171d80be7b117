//! CLI subcommands.

pub mod check;
pub mod palette;
pub mod routes;
pub mod seed;
