// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Timer channel to output pin routing.
//!
//! Closed table taken from the STM32F77x alternate-function map. TIM2 outputs use AF1, TIM3..TIM5
//! use AF2.

use super::gpio::{AltFunction, Pin, Port};
use super::pwm::{TimerChannel, TimerInstance};

/// Physical pin and alternate function carrying one timer channel.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PinRoute {
    pub pin: Pin,
    pub alt: AltFunction,
}

const fn r(port: Port, index: u8, af: u8) -> PinRoute {
    PinRoute {
        pin: Pin::new(port, index),
        alt: AltFunction::new(af),
    }
}

/// Indexed by `[instance][channel]`, TIM2 CH1 first.
const ROUTES: [[PinRoute; 4]; 4] = [
    // TIM2
    [r(Port::A, 0, 1), r(Port::A, 1, 1), r(Port::A, 2, 1), r(Port::A, 3, 1)],
    // TIM3
    [r(Port::A, 6, 2), r(Port::A, 7, 2), r(Port::B, 0, 2), r(Port::B, 1, 2)],
    // TIM4
    [r(Port::D, 12, 2), r(Port::D, 13, 2), r(Port::D, 14, 2), r(Port::D, 15, 2)],
    // TIM5
    [r(Port::A, 0, 2), r(Port::A, 1, 2), r(Port::A, 2, 2), r(Port::A, 3, 2)],
];

/// Look up the output pin for a timer channel.
#[inline]
pub const fn route(tim: TimerInstance, ch: TimerChannel) -> PinRoute {
    ROUTES[tim.table_index()][ch.table_index()]
}
