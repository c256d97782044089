// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Pin assignments for the Titan flight computer board (STM32F777).
//!
//! Pins driven through the [`Gpio`](super::gpio::Gpio) collaborator.

use super::gpio::{Pin, Port};

// USART1 TX/RX (PA9/PA10, AF7) and SPI4 SCK/MISO/MOSI (PE12/PE13/PE14, AF5) are claimed as
// typed HAL pins in `main.rs`.

/// MAX22216 chip select on SPI4, active low.
pub const ACTUATOR_CS: Pin = Pin::new(Port::E, 4);

// MAX22216 auxiliary lines
pub const ACTUATOR_ENABLE: Pin = Pin::new(Port::E, 7);
pub const ACTUATOR_FAULT: Pin = Pin::new(Port::E, 8); // open drain, active low
pub const ACTUATOR_STAT0: Pin = Pin::new(Port::E, 9);
pub const ACTUATOR_STAT1: Pin = Pin::new(Port::E, 10);
pub const ACTUATOR_CRC_EN: Pin = Pin::new(Port::E, 15);

/// Servo / igniter PWM output: TIM4 CH1 on PD12.
pub const PWM_OUT_INSTANCE: u8 = 4;
pub const PWM_OUT_CHANNEL: u8 = 1;
