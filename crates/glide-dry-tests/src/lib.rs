// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared test doubles and fixtures for Glide crates.
//!
//! # Modules
//!
//! - [`config`] - In-memory config store fake for testing without filesystem
//! - [`controller`] - Controller builder and gesture drivers
//! - [`observer`] - Recording observer for change-notification assertions
#![forbid(unsafe_code)]

pub mod config;
pub mod controller;
pub mod observer;

pub use config::InMemoryConfigStore;
pub use controller::{ControllerBuilder, GestureDriver, FRAME_DT};
pub use observer::RecordingObserver;
