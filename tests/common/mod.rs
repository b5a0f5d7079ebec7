//! Common test utilities and helpers
//!
//! - Fake backend with failure injection and a call log
//! - Client fixtures (config, signed-in user)
//! - Custom assertion macros

#![allow(dead_code)]

pub mod assertions;
pub mod fake_backend;
pub mod fixtures;

pub use fake_backend::*;
pub use fixtures::*;
