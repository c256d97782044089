// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! GPIO abstraction layer.
//!
//! - `Pin` identifies a physical pin by port and index. Construction validates the index.
//! - `Gpio` is the collaborator interface consumed by the drivers.
//! - `MmioGpio` implements `Gpio` with direct register writes through a [`RegisterBank`].

use super::mmio::RegisterBank;
use super::regs;
use crate::error::{Error, Result};

/// GPIO port. STM32F77x has ports A through K.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Port {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
}

impl Port {
    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }
}

/// A physical pin, e.g. `PD12`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pin {
    port: Port,
    index: u8,
}

impl Pin {
    /// Panics (at compile time in `const` context) if `index > 15`.
    pub const fn new(port: Port, index: u8) -> Self {
        assert!(index < 16, "pin index out of range");
        Self { port, index }
    }

    /// Fallible constructor for indices that come from runtime data.
    pub const fn try_new(port: Port, index: u8) -> Result<Self> {
        if index < 16 {
            Ok(Self { port, index })
        } else {
            Err(Error::InvalidArgument)
        }
    }

    #[inline]
    pub const fn port(&self) -> Port {
        self.port
    }

    #[inline]
    pub const fn index(&self) -> u8 {
        self.index
    }
}

/// Alternate-function number (AF0..AF15).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AltFunction(u8);

impl AltFunction {
    pub const fn new(af: u8) -> Self {
        assert!(af < 16, "alternate function out of range");
        Self(af)
    }

    pub const fn try_new(af: u8) -> Result<Self> {
        if af < 16 {
            Ok(Self(af))
        } else {
            Err(Error::InvalidArgument)
        }
    }

    #[inline]
    pub const fn number(self) -> u8 {
        self.0
    }
}

/// MODER encoding.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PinMode {
    Input = 0b00,
    Output = 0b01,
    Alternate = 0b10,
    Analog = 0b11,
}

/// PUPDR encoding.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Pull {
    None = 0b00,
    Up = 0b01,
    Down = 0b10,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

/// Pin-level operations the drivers rely on. All of them are plain register writes on the target
/// and cannot fail.
pub trait Gpio {
    fn enable_clock(&mut self, pin: Pin);

    fn set_mode(&mut self, pin: Pin, mode: PinMode);

    fn set_alternate_function(&mut self, pin: Pin, af: AltFunction);

    fn pull(&mut self, pin: Pin, pull: Pull);

    fn write_pin(&mut self, pin: Pin, level: Level);

    fn read_pin(&mut self, pin: Pin) -> Level;
}

impl<G: Gpio + ?Sized> Gpio for &mut G {
    fn enable_clock(&mut self, pin: Pin) {
        (**self).enable_clock(pin)
    }

    fn set_mode(&mut self, pin: Pin, mode: PinMode) {
        (**self).set_mode(pin, mode)
    }

    fn set_alternate_function(&mut self, pin: Pin, af: AltFunction) {
        (**self).set_alternate_function(pin, af)
    }

    fn pull(&mut self, pin: Pin, pull: Pull) {
        (**self).pull(pin, pull)
    }

    fn write_pin(&mut self, pin: Pin, level: Level) {
        (**self).write_pin(pin, level)
    }

    fn read_pin(&mut self, pin: Pin) -> Level {
        (**self).read_pin(pin)
    }
}

/// Register-level GPIO driver.
pub struct MmioGpio<B> {
    regs: B,
}

impl<B: RegisterBank> MmioGpio<B> {
    pub fn new(regs: B) -> Self {
        Self { regs }
    }

    pub fn free(self) -> B {
        self.regs
    }
}

impl<B: RegisterBank> Gpio for MmioGpio<B> {
    fn enable_clock(&mut self, pin: Pin) {
        self.regs
            .set_field(regs::rcc::AHB1ENR, regs::rcc::gpio_en(pin.port()));
    }

    fn set_mode(&mut self, pin: Pin, mode: PinMode) {
        self.regs.write_field(
            regs::gpio::moder(pin.port()),
            regs::gpio::moder_field(pin),
            mode as u32,
        );
    }

    fn set_alternate_function(&mut self, pin: Pin, af: AltFunction) {
        self.regs.write_field(
            regs::gpio::afr(pin),
            regs::gpio::afr_field(pin),
            af.number().into(),
        );
    }

    fn pull(&mut self, pin: Pin, pull: Pull) {
        self.regs.write_field(
            regs::gpio::pupdr(pin.port()),
            regs::gpio::pupdr_field(pin),
            pull as u32,
        );
    }

    fn write_pin(&mut self, pin: Pin, level: Level) {
        // BSRR is write-only: low half sets, high half resets. No read-modify-write needed.
        let bit = match level {
            Level::High => pin.index(),
            Level::Low => pin.index() + 16,
        };
        self.regs.write(regs::gpio::bsrr(pin.port()), 1 << bit);
    }

    fn read_pin(&mut self, pin: Pin) -> Level {
        let v = self
            .regs
            .read_field(regs::gpio::idr(pin.port()), regs::gpio::idr_field(pin));
        Level::from(v != 0)
    }
}
