// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Titan Flight Computer Firmware
//!
//! Peripheral drivers for the Titan flight computer, written in Rust, targeting an STM32F777 MCU.
//!
//! ## Crate Structure
//!
//! | Module | Purpose |
//! | ------ | -------- |
//! | [`hw`] | MCU-level access: register fields, GPIO, PWM timers, SPI, USART |
//! | [`drivers`] | Device-level drivers (MAX22216 solenoid driver) |
//! | [`config`] | Board configuration and default device profiles |
//! | [`error`] | Error type shared by every driver |
//!
//! ## Getting Started
//!
//! Run the host tests:
//!
//! ```bash
//! cargo test
//! ```
//!
//! Flash the board:
//!
//! ```bash
//! cargo run --release --features stm32 --target thumbv7em-none-eabihf
//! ```
//!
//! ## License
//!
//! Licensed under the **MIT License**.
//! See the `LICENSE` file in the repository root for full terms.
//!
//! © 2025–2026 Christopher Liu

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod drivers;
pub mod error;
pub mod hw;

pub use error::{Error, Result};
