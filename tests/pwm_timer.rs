//! Timer PWM programming checked register by register.

mod common;

use common::{FakeBank, GpioCall, RecordingGpio};
use titan::error::Error;
use titan::hw::gpio::{AltFunction, Pin, PinMode, Port};
use titan::hw::pwm::{configure_pwm, disable_pwm, PwmConfig, TimerChannel, TimerInstance};
use titan::hw::regs::{rcc, tim};
use titan::hw::routing::route;

fn request(instance: u8, channel: u8, frequency: u32, duty: u16, clock_freq: u32) -> PwmConfig {
    PwmConfig {
        instance,
        channel,
        frequency,
        duty,
        clock_freq,
    }
}

#[test]
fn tim2_ch1_at_40_hz_half_duty() {
    let mut regs = FakeBank::default();
    let mut gpio = RecordingGpio::default();

    configure_pwm(&mut regs, &mut gpio, &request(2, 1, 40, 500, 2_000_000)).unwrap();

    let t = TimerInstance::Tim2;
    let ch = TimerChannel::Ch1;
    assert_eq!(regs.get(rcc::APB1ENR), 1 << 0);
    assert_eq!(regs.get(tim::arr(t)), 49_999);
    assert_eq!(regs.get(tim::ccr(t, ch)), 24_999);
    assert_eq!(regs.get(tim::ccmr_output(t, ch)), (0b110 << 4) | (1 << 3));
    assert_eq!(regs.get(tim::ccer(t)), 1 << 0);
    assert_eq!(regs.get(tim::cr1(t)), (1 << 7) | (1 << 0));

    // Clock gate first, counter enable last.
    assert_eq!(regs.writes.first().map(|w| w.0), Some(rcc::APB1ENR.addr()));
    assert_eq!(regs.writes.last().map(|w| w.0), Some(tim::cr1(t).addr()));

    let pa0 = Pin::new(Port::A, 0);
    assert_eq!(
        gpio.calls,
        [
            GpioCall::EnableClock(pa0),
            GpioCall::SetMode(pa0, PinMode::Alternate),
            GpioCall::SetAlt(pa0, AltFunction::new(1)),
        ]
    );
}

#[test]
fn period_too_long_for_the_timer_is_rejected() {
    let mut regs = FakeBank::default();
    let mut gpio = RecordingGpio::default();

    // 16 MHz / 100 Hz = 160 000 ticks.
    let res = configure_pwm(&mut regs, &mut gpio, &request(3, 2, 100, 500, 16_000_000));

    assert_eq!(res, Err(Error::InvalidArgument));
    assert!(regs.writes.is_empty());
    assert!(gpio.calls.is_empty());
}

#[test]
fn period_too_short_for_the_timer_is_rejected() {
    for frequency in [1_000_001, 2_000_000, 3_000_000] {
        let mut regs = FakeBank::default();
        let mut gpio = RecordingGpio::default();

        let res = configure_pwm(&mut regs, &mut gpio, &request(2, 1, frequency, 500, 2_000_000));

        assert_eq!(res, Err(Error::InvalidArgument), "{frequency} Hz");
        assert!(regs.writes.is_empty(), "{frequency} Hz");
        assert!(gpio.calls.is_empty(), "{frequency} Hz");
    }
}

#[test]
fn zero_duty_gates_the_timer_clock_off() {
    let mut regs = FakeBank::default();
    let mut gpio = RecordingGpio::default();
    // TIM4EN plus an unrelated PWREN bit.
    regs.preset(rcc::APB1ENR, (1 << 28) | (1 << 2));

    let res = configure_pwm(&mut regs, &mut gpio, &request(4, 1, 1_000, 0, 16_000_000));

    assert_eq!(res, Err(Error::InvalidArgument));
    assert_eq!(regs.get(rcc::APB1ENR), 1 << 28);
    assert_eq!(regs.written(), [rcc::APB1ENR.addr()]);
    assert!(gpio.calls.is_empty());
}

#[test]
fn every_channel_lands_on_its_routed_pin() {
    for t in TimerInstance::ALL {
        for ch in TimerChannel::ALL {
            let mut regs = FakeBank::default();
            let mut gpio = RecordingGpio::default();
            let cfg = request(t.number(), ch.number(), 1_000, 250, 16_000_000);

            configure_pwm(&mut regs, &mut gpio, &cfg).unwrap();

            let out = route(t, ch);
            assert!(gpio.calls.contains(&GpioCall::SetAlt(out.pin, out.alt)), "{t:?} {ch:?}");
            assert_eq!(regs.get(tim::ccer(t)), tim::ccxe(ch).mask(), "{t:?} {ch:?}");
            assert_eq!(regs.get(tim::ccr(t, ch)), 15_999 * 250 / 1000);
        }
    }
}

#[test]
fn channels_of_one_timer_coexist() {
    let mut regs = FakeBank::default();
    let mut gpio = RecordingGpio::default();
    let t = TimerInstance::Tim3;

    configure_pwm(&mut regs, &mut gpio, &request(3, 1, 1_000, 100, 16_000_000)).unwrap();
    configure_pwm(&mut regs, &mut gpio, &request(3, 2, 1_000, 900, 16_000_000)).unwrap();

    let ccmr1 = regs.get(tim::ccmr_output(t, TimerChannel::Ch1));
    assert_eq!(ccmr1, (0b110 << 4) | (1 << 3) | (0b110 << 12) | (1 << 11));
    assert_eq!(regs.get(tim::ccer(t)), (1 << 0) | (1 << 4));
    assert_eq!(regs.get(tim::ccr(t, TimerChannel::Ch1)), 1_599);
    assert_eq!(regs.get(tim::ccr(t, TimerChannel::Ch2)), 14_399);

    disable_pwm(&mut regs, t, TimerChannel::Ch1);
    assert_eq!(regs.get(tim::ccer(t)), 1 << 4);
}
