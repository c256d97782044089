// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! PWM output on the general-purpose timers TIM2..TIM5.
//!
//! The driver is stateless: each call validates a [`PwmConfig`], then programs the timer and the
//! routed output pin from scratch. Validation happens before any register is touched.
//!
//! The timer prescaler (PSC) is left at its reset value, so the counter runs at the timer input
//! clock and the period is set entirely through ARR. This caps the period at 65 535 ticks.
//!
//! Example:
//! ```ignore
//! let cfg = PwmConfig { instance: 4, channel: 1, frequency: 1_000, duty: 250, clock_freq: 16_000_000 };
//! configure_pwm(&mut regs, &mut gpio, &cfg)?;
//! ```

use super::gpio::{Gpio, PinMode};
use super::mmio::RegisterBank;
use super::regs::{rcc, tim};
use super::routing::route;
use crate::error::{Error, Result};

/// Full scale of the duty cycle (permille).
pub const MAX_DUTY: u16 = 1000;

/// Widest value the ARR/CCR fields accept on the 16-bit timers.
const MAX_PRESCALE: u32 = u16::MAX as u32;

/// Shortest period that still toggles the output (ARR >= 1).
const MIN_PRESCALE: u32 = 2;

/// Timers with PWM support.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TimerInstance {
    Tim2,
    Tim3,
    Tim4,
    Tim5,
}

impl TimerInstance {
    pub const ALL: [Self; 4] = [Self::Tim2, Self::Tim3, Self::Tim4, Self::Tim5];

    /// Hardware instance number (TIMn).
    #[inline]
    pub const fn number(self) -> u8 {
        match self {
            Self::Tim2 => 2,
            Self::Tim3 => 3,
            Self::Tim4 => 4,
            Self::Tim5 => 5,
        }
    }

    #[inline]
    pub(crate) const fn table_index(self) -> usize {
        self as usize
    }
}

impl TryFrom<u8> for TimerInstance {
    type Error = Error;

    fn try_from(n: u8) -> Result<Self> {
        match n {
            2 => Ok(Self::Tim2),
            3 => Ok(Self::Tim3),
            4 => Ok(Self::Tim4),
            5 => Ok(Self::Tim5),
            _ => Err(Error::InvalidArgument),
        }
    }
}

/// Output-compare channel of a timer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TimerChannel {
    Ch1,
    Ch2,
    Ch3,
    Ch4,
}

impl TimerChannel {
    pub const ALL: [Self; 4] = [Self::Ch1, Self::Ch2, Self::Ch3, Self::Ch4];

    #[inline]
    pub const fn number(self) -> u8 {
        self as u8 + 1
    }

    #[inline]
    pub(crate) const fn table_index(self) -> usize {
        self as usize
    }
}

impl TryFrom<u8> for TimerChannel {
    type Error = Error;

    fn try_from(n: u8) -> Result<Self> {
        match n {
            1 => Ok(Self::Ch1),
            2 => Ok(Self::Ch2),
            3 => Ok(Self::Ch3),
            4 => Ok(Self::Ch4),
            _ => Err(Error::InvalidArgument),
        }
    }
}

/// One PWM request.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PwmConfig {
    /// Timer number, 2..=5.
    pub instance: u8,
    /// Channel number, 1..=4.
    pub channel: u8,
    /// Output frequency in Hz.
    pub frequency: u32,
    /// Duty cycle in permille, 0..=1000.
    pub duty: u16,
    /// Timer input clock in Hz.
    pub clock_freq: u32,
}

/// Register values derived from a `PwmConfig`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PwmTiming {
    /// Counter ticks per PWM period.
    pub prescale: u32,
    pub auto_reload: u32,
    pub compare: u32,
}

impl PwmConfig {
    /// Validate the request and compute its register values.
    ///
    /// Fails with `InvalidArgument` for a zero frequency, a period outside 2..=65 535 ticks
    /// (frequency too low or too high for the clock), or a duty above 1000.
    pub fn timing(&self) -> Result<PwmTiming> {
        if self.frequency == 0 {
            return Err(Error::InvalidArgument);
        }

        let prescale = self.clock_freq / self.frequency;
        // No rounding or capping: a period the field can't hold is an error.
        if !(MIN_PRESCALE..=MAX_PRESCALE).contains(&prescale) {
            return Err(Error::InvalidArgument);
        }

        if self.duty > MAX_DUTY {
            return Err(Error::InvalidArgument);
        }

        let auto_reload = prescale - 1;
        // auto_reload < 2^16 and duty <= 1000, so the product fits comfortably in u32.
        let compare = auto_reload * u32::from(self.duty) / u32::from(MAX_DUTY);

        Ok(PwmTiming {
            prescale,
            auto_reload,
            compare,
        })
    }
}

/// Start PWM output for one timer channel.
///
/// A zero duty cycle is not a silent success: it gates the timer clock off and returns
/// `InvalidArgument`. Any other validation failure leaves every register untouched.
pub fn configure_pwm<B, G>(regs: &mut B, gpio: &mut G, config: &PwmConfig) -> Result<()>
where
    B: RegisterBank,
    G: Gpio,
{
    let (Ok(instance), Ok(channel)) = (
        TimerInstance::try_from(config.instance),
        TimerChannel::try_from(config.channel),
    ) else {
        log::warn!(
            "pwm: no such output TIM{} CH{}",
            config.instance,
            config.channel
        );
        return Err(Error::InvalidArgument);
    };

    let timing = config.timing().map_err(|e| {
        log::warn!("pwm: rejected {:?}", config);
        e
    })?;

    if config.duty == 0 {
        regs.clear_field(rcc::APB1ENR, rcc::tim_en(instance));
        log::warn!("pwm: TIM{} off (zero duty)", instance.number());
        return Err(Error::InvalidArgument);
    }

    regs.set_field(rcc::APB1ENR, rcc::tim_en(instance));

    let out = route(instance, channel);
    gpio.enable_clock(out.pin);
    gpio.set_mode(out.pin, PinMode::Alternate);
    gpio.set_alternate_function(out.pin, out.alt);

    regs.write_field(tim::arr(instance), tim::ARR_L, timing.auto_reload);
    regs.write_field(tim::ccr(instance, channel), tim::CCR_L, timing.compare);

    let ccmr = tim::ccmr_output(instance, channel);
    regs.write_field(ccmr, tim::ocxm(channel), tim::OCM_PWM_MODE_1);
    regs.set_field(ccmr, tim::ocxpe(channel));

    regs.set_field(tim::ccer(instance), tim::ccxe(channel));
    regs.set_field(tim::cr1(instance), tim::CR1_CEN);
    regs.set_field(tim::cr1(instance), tim::CR1_ARPE);

    log::debug!(
        "pwm: TIM{} CH{} on {:?} arr={} ccr={}",
        instance.number(),
        channel.number(),
        out.pin,
        timing.auto_reload,
        timing.compare
    );

    Ok(())
}

/// Stop driving one channel's output. The counter and the other channels keep running.
pub fn disable_pwm<B: RegisterBank>(regs: &mut B, instance: TimerInstance, channel: TimerChannel) {
    regs.clear_field(tim::ccer(instance), tim::ccxe(channel));
}
