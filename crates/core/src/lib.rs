//! Kittie domain logic.
//!
//! Everything in this crate is free of I/O so it can be shared by the
//! repository layer, the HTTP server and their tests.

pub mod billing;
pub mod error;
pub mod plan;
pub mod public_kit;
pub mod render;
pub mod reorder;
pub mod section;
pub mod slug;
pub mod types;
pub mod upload;
pub mod validation;
