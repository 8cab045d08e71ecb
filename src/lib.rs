// SPDX-License-Identifier: MIT

//! markflow - compiles markdown agent workflows into GitHub Actions lock files

pub mod config;
pub mod error;
pub mod workflow;

pub use error::{MarkflowError, Result};
