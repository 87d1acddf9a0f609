//! panaderia-server, a bakery storefront backend
//!
//! Session-authenticated HTTP service over PostgreSQL:
//!
//! - **Catalog** (`api::inventory`): public reads, admin CRUD with image
//!   upload
//! - **Cart** (`api::cart`, `db::cart`): per-user (product, quantity)
//!   pairs
//! - **Checkout** (`checkout`): the transactional core. Validates the
//!   cart against live stock, decrements it with guarded updates, records
//!   the order and empties the cart, all-or-nothing
//! - **Auth** (`auth`): cookie sessions backed by an in-process store

pub mod api;
pub mod auth;
pub mod checkout;
pub mod config;
pub mod db;
pub mod error;
pub mod state;
pub mod uploads;
pub mod util;

pub use config::Config;
pub use state::AppState;
