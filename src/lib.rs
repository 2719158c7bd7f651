#![doc = include_str!("../README.md")]

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod providers;
pub mod services;
pub mod types;

pub use engine::*;
pub use error::*;
pub use providers::{fetch_page, Provider, ProviderKind, ProviderRegistry};
pub use services::*;
pub use types::*;
