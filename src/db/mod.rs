//! Database access layer
//!
//! Plain query functions over the shared `PgPool`. Multi-statement
//! operations open their own transaction; the checkout transaction lives
//! in [`crate::checkout`] because it is the one piece with real
//! invariants.

pub mod cart;
pub mod order;
pub mod product;
pub mod user;
