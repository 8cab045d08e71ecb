// SPDX-License-Identifier: MIT

pub mod command;
pub mod compiler;
pub mod condition;
pub mod emitter;
pub mod loader;
pub mod safety;
pub mod types;
