// src/lib.rs

pub mod card;
pub mod config;
pub mod core;
pub mod error;
pub mod logger;
pub mod persistence;

pub use crate::core::session::Session;
pub use crate::error::{CardError, Result};
