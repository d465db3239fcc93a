//! Shared types and the plot lifecycle engine
//!
//! This crate contains the domain models and pure calculations shared
//! between the backend and the browser (via WASM).

pub mod lifecycle;
pub mod models;
pub mod types;
pub mod validation;

pub use lifecycle::*;
pub use models::*;
pub use types::*;
pub use validation::*;
