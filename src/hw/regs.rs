// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! STM32F7 register map for the peripherals driven through [`RegisterBank`](super::RegisterBank).
//!
//! Only the registers and fields touched by this crate are listed. Indexed descriptors take typed
//! indices so that every register named here physically exists (RM0410).

use super::gpio::{Pin, Port};
use super::mmio::{Field, Register};
use super::pwm::{TimerChannel, TimerInstance};

/// Reset and clock control.
pub mod rcc {
    use super::*;

    const BASE: u32 = 0x4002_3800;

    pub const AHB1ENR: Register = Register::at(BASE + 0x30);
    pub const APB1ENR: Register = Register::at(BASE + 0x40);

    /// GPIOxEN in AHB1ENR.
    #[inline]
    pub const fn gpio_en(port: Port) -> Field {
        Field::bit(port.index())
    }

    /// TIMxEN in APB1ENR (TIM2EN is bit 0, TIM5EN bit 3).
    #[inline]
    pub const fn tim_en(tim: TimerInstance) -> Field {
        Field::bit(tim.number() - 2)
    }
}

/// General-purpose I/O ports.
pub mod gpio {
    use super::*;

    const BASE: u32 = 0x4002_0000;
    const STRIDE: u32 = 0x400;

    #[inline]
    const fn reg(port: Port, offset: u32) -> Register {
        Register::at(BASE + STRIDE * port.index() as u32 + offset)
    }

    #[inline]
    pub const fn moder(port: Port) -> Register {
        reg(port, 0x00)
    }

    #[inline]
    pub const fn pupdr(port: Port) -> Register {
        reg(port, 0x0C)
    }

    #[inline]
    pub const fn idr(port: Port) -> Register {
        reg(port, 0x10)
    }

    #[inline]
    pub const fn bsrr(port: Port) -> Register {
        reg(port, 0x18)
    }

    /// AFRL for pins 0..=7, AFRH for 8..=15.
    #[inline]
    pub const fn afr(pin: Pin) -> Register {
        if pin.index() < 8 {
            reg(pin.port(), 0x20)
        } else {
            reg(pin.port(), 0x24)
        }
    }

    #[inline]
    pub const fn moder_field(pin: Pin) -> Field {
        Field::new(2 * pin.index(), 2)
    }

    #[inline]
    pub const fn pupdr_field(pin: Pin) -> Field {
        Field::new(2 * pin.index(), 2)
    }

    #[inline]
    pub const fn afr_field(pin: Pin) -> Field {
        Field::new(4 * (pin.index() % 8), 4)
    }

    #[inline]
    pub const fn idr_field(pin: Pin) -> Field {
        Field::bit(pin.index())
    }
}

/// General-purpose timers TIM2..TIM5.
pub mod tim {
    use super::*;

    const TIM2_BASE: u32 = 0x4000_0000;
    const STRIDE: u32 = 0x400;

    #[inline]
    const fn reg(tim: TimerInstance, offset: u32) -> Register {
        Register::at(TIM2_BASE + STRIDE * (tim.number() as u32 - 2) + offset)
    }

    #[inline]
    pub const fn cr1(tim: TimerInstance) -> Register {
        reg(tim, 0x00)
    }

    /// CCMR1 (channels 1–2) or CCMR2 (channels 3–4), output-compare view.
    #[inline]
    pub const fn ccmr_output(tim: TimerInstance, ch: TimerChannel) -> Register {
        match ch {
            TimerChannel::Ch1 | TimerChannel::Ch2 => reg(tim, 0x18),
            TimerChannel::Ch3 | TimerChannel::Ch4 => reg(tim, 0x1C),
        }
    }

    #[inline]
    pub const fn ccer(tim: TimerInstance) -> Register {
        reg(tim, 0x20)
    }

    #[inline]
    pub const fn arr(tim: TimerInstance) -> Register {
        reg(tim, 0x2C)
    }

    /// CCR1..CCR4.
    #[inline]
    pub const fn ccr(tim: TimerInstance, ch: TimerChannel) -> Register {
        reg(tim, 0x34 + 4 * (ch.number() as u32 - 1))
    }

    pub const CR1_CEN: Field = Field::bit(0);
    pub const CR1_ARPE: Field = Field::bit(7);

    /// Low half of ARR. TIM3/TIM4 only implement these bits; TIM2/TIM5 are 32-bit.
    pub const ARR_L: Field = Field::new(0, 16);
    pub const CCR_L: Field = Field::new(0, 16);

    /// OCxM[2:0]. Odd channels sit in the low byte of their CCMR, even channels in the high byte.
    #[inline]
    pub const fn ocxm(ch: TimerChannel) -> Field {
        match ch {
            TimerChannel::Ch1 | TimerChannel::Ch3 => Field::new(4, 3),
            TimerChannel::Ch2 | TimerChannel::Ch4 => Field::new(12, 3),
        }
    }

    /// OCxPE (preload enable).
    #[inline]
    pub const fn ocxpe(ch: TimerChannel) -> Field {
        match ch {
            TimerChannel::Ch1 | TimerChannel::Ch3 => Field::bit(3),
            TimerChannel::Ch2 | TimerChannel::Ch4 => Field::bit(11),
        }
    }

    /// CCxE (capture/compare output enable).
    #[inline]
    pub const fn ccxe(ch: TimerChannel) -> Field {
        Field::bit(4 * (ch.number() - 1))
    }

    /// OCxM value for PWM mode 1: active while CNT < CCRx.
    pub const OCM_PWM_MODE_1: u32 = 0b110;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_register_addresses() {
        assert_eq!(tim::cr1(TimerInstance::Tim2).addr(), 0x4000_0000);
        assert_eq!(tim::arr(TimerInstance::Tim3).addr(), 0x4000_042C);
        assert_eq!(tim::ccr(TimerInstance::Tim4, TimerChannel::Ch3).addr(), 0x4000_083C);
        assert_eq!(tim::ccer(TimerInstance::Tim5).addr(), 0x4000_0C20);
    }

    #[test]
    fn ccmr_split_by_channel_pair() {
        let t = TimerInstance::Tim2;
        assert_eq!(tim::ccmr_output(t, TimerChannel::Ch1).addr(), 0x4000_0018);
        assert_eq!(tim::ccmr_output(t, TimerChannel::Ch2).addr(), 0x4000_0018);
        assert_eq!(tim::ccmr_output(t, TimerChannel::Ch3).addr(), 0x4000_001C);
        assert_eq!(tim::ccmr_output(t, TimerChannel::Ch4).addr(), 0x4000_001C);
        assert_eq!(tim::ocxm(TimerChannel::Ch4).mask(), 0x7000);
        assert_eq!(tim::ccxe(TimerChannel::Ch4).mask(), 1 << 12);
    }

    #[test]
    fn gpio_afr_picks_low_or_high_register() {
        let pd12 = Pin::new(Port::D, 12);
        assert_eq!(gpio::afr(pd12).addr(), 0x4002_0C24);
        assert_eq!(gpio::afr_field(pd12).mask(), 0xF << 16);

        let pa3 = Pin::new(Port::A, 3);
        assert_eq!(gpio::afr(pa3).addr(), 0x4002_0020);
        assert_eq!(gpio::afr_field(pa3).mask(), 0xF << 12);
    }

    #[test]
    fn clock_gate_bits() {
        assert_eq!(rcc::tim_en(TimerInstance::Tim2).mask(), 1);
        assert_eq!(rcc::tim_en(TimerInstance::Tim5).mask(), 1 << 3);
        assert_eq!(rcc::gpio_en(Port::E).mask(), 1 << 4);
    }
}
