// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Device-Specific Drivers
//!
//! Drivers for external devices that sit above the raw `hw/` layer.
//!
//! ## Existing drivers
//!
//! - [`max22216`] – Analog Devices MAX22216/MAX22217 four-channel SPI solenoid driver

pub mod max22216;

pub use max22216::Max22216;
