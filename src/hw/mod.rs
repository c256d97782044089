// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! MCU-level peripheral access: registers, GPIO, timers, SPI and the debug USART.

pub mod gpio;
pub mod mmio;
pub mod pins;
pub mod pwm;
pub mod regs;
pub mod routing;
pub mod spi;
pub mod usart;

pub use gpio::{Gpio, MmioGpio, Pin, Port};
pub use mmio::{Field, Mmio, Register, RegisterBank};
pub use pwm::{configure_pwm, disable_pwm, PwmConfig};
pub use spi::{SpiDevice, SpiTransport};
#[cfg(feature = "stm32")]
pub use spi::SpiBus;
#[cfg(feature = "stm32")]
pub use usart::{Usart, UsartLogger};
