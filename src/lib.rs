//! blur-check library crate.
//!
//! This module exposes the internal components for integration testing.

pub mod analysis;
pub mod capture;
pub mod cli;
pub mod config;
pub mod devices;
pub mod encode;
pub mod host;
pub mod permissions;
pub mod pipeline;
pub mod platform;
pub mod render;
pub mod session;
pub mod sim;
