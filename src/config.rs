// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Board configuration.
//!
//! Compile-time parameters for the peripherals and the default actuator profile. Pin numbers live
//! in [`hw::pins`](crate::hw::pins).

use crate::drivers::max22216::{AuxPins, ChannelConfig, Max22216Config};
use crate::hw::pins;
use crate::hw::spi::{BitOrder, SpiConfig, SpiDevice, SpiMode};

/// Timer input clock on APB1 with the default (HSI, undivided) clock tree.
pub const TIMER_CLOCK_HZ: u32 = 16_000_000;

/// Polling budget for one 3-byte actuator transaction.
pub const ACTUATOR_SPI_TIMEOUT: u32 = 1_000_000;

/// Debug terminal (USART1) baud rate.
pub const DEBUG_BAUD: u32 = 115_200;

/// SPI peripheral the actuator IC sits on.
pub const ACTUATOR_SPI_INSTANCE: u8 = 4;

/// Default PWM output frequency and duty (permille).
pub const PWM_OUT_FREQ_HZ: u32 = 1_000;
pub const PWM_OUT_DUTY: u16 = 500;

/// SCK rate of the actuator bus.
pub const ACTUATOR_SPI_HZ: u32 = 1_000_000;

/// SPI4 settings for the MAX22216: mode 0, MSB first, 8-bit frames. The firmware enables the HAL
/// peripheral from these.
pub const fn actuator_spi() -> SpiConfig {
    SpiConfig {
        mode: SpiMode::Mode0,
        data_size: 8,
        frequency_hz: ACTUATOR_SPI_HZ,
        first_bit: BitOrder::MsbFirst,
    }
}

/// Actuator IC wiring on this board.
pub const fn actuator() -> Max22216Config {
    Max22216Config {
        spi: actuator_spi(),
        device: SpiDevice {
            instance: ACTUATOR_SPI_INSTANCE,
            cs: Some(pins::ACTUATOR_CS),
        },
        pins: AuxPins {
            enable: Some(pins::ACTUATOR_ENABLE),
            fault: Some(pins::ACTUATOR_FAULT),
            stat0: Some(pins::ACTUATOR_STAT0),
            stat1: Some(pins::ACTUATOR_STAT1),
            crc_en: Some(pins::ACTUATOR_CRC_EN),
        },
        enable_crc: false,
    }
}

/// Hit-and-hold profile for the valve solenoids: full duty while pulling in, then a reduced hold.
pub const fn solenoid_profile() -> ChannelConfig {
    ChannelConfig {
        dc_l2h: 0xFFFF,
        dc_h: 0x4000,
        dc_l: 0x0000,
        time_l2h: 0x0100,

        ctrl_mode: 0,
        hhf_enable: false,
        open_load_enable: true,
        h2l_enable: true,
        ramp_down: false,
        ramp_mid: false,
        ramp_up: false,
        ramp: 0,

        high_side: false,
        pwm_div: 0,
        t_blank: 1,
        slew_rate: 0,
        gain: 0,
        snsf: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_sane() {
        let a = actuator();
        assert!(!a.enable_crc);
        assert_eq!(a.device.instance, ACTUATOR_SPI_INSTANCE);
        assert_eq!(a.spi.data_size, 8);

        let p = solenoid_profile();
        assert!(p.ctrl0().is_ok());
        assert!(p.ctrl1().is_ok());
        assert!(p.dc_h < p.dc_l2h);
    }

    #[test]
    fn actuator_bus_matches_the_enabled_spi() {
        let spi = actuator_spi();
        assert!(crate::hw::spi::settings_match(&spi, SpiMode::Mode0, ACTUATOR_SPI_HZ));
    }

    #[test]
    fn default_pwm_fits_the_timer() {
        let prescale = TIMER_CLOCK_HZ / PWM_OUT_FREQ_HZ;
        assert!((2..=u32::from(u16::MAX)).contains(&prescale));
        assert!(PWM_OUT_DUTY <= crate::hw::pwm::MAX_DUTY);
    }
}
