//! d6bridge - school information from D6 for assistant tool calls
//!
//! Resolves learners, staff, parents, marks and lookup tables through a
//! tiered engine: response cache, D6 v2, D6 v1, then a synthetic dataset.

pub mod audit;
pub mod availability;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod health;
pub mod mock;
pub mod probe;
pub mod resolver;
pub mod tools;
pub mod ui;
pub mod upstream;

pub use error::{BridgeError, BridgeResult};
