// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

#![no_main]
#![no_std]

use cortex_m_rt::entry;
use panic_halt as _;

use hal::{
    pac,
    prelude::*,
    serial::{Config, Serial},
    spi::Spi,
};
use stm32f7xx_hal as hal;

use titan::config;
use titan::drivers::max22216::Channel;
use titan::drivers::Max22216;
use titan::hw::{configure_pwm, pins, Mmio, MmioGpio, PwmConfig, SpiBus, Usart, UsartLogger};

#[entry]
fn main() -> ! {
    // Peripherals
    let dp = pac::Peripherals::take().unwrap();

    // Clocks
    let rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.freeze();
    let mut apb2 = rcc.apb2;

    let gpioa = dp.GPIOA.split();
    let gpioe = dp.GPIOE.split();

    // USART1 (DBG) carries the log output
    let tx = gpioa.pa9.into_alternate::<7>();
    let rx = gpioa.pa10.into_alternate::<7>();
    let usart_cfg = Config {
        baud_rate: config::DEBUG_BAUD.bps(),
        ..Default::default()
    };
    let serial = Serial::new(dp.USART1, (tx, rx), &clocks, usart_cfg);
    UsartLogger::install(Usart::new(serial), log::LevelFilter::Debug);

    // SPI4, enabled with the same settings the actuator driver will request
    let spi_cfg = config::actuator_spi();
    let sck = gpioe.pe12.into_alternate::<5>();
    let miso = gpioe.pe13.into_alternate::<5>();
    let mosi = gpioe.pe14.into_alternate::<5>();
    let spi4 = Spi::new(dp.SPI4, (sck, miso, mosi)).enable::<u8>(
        spi_cfg.mode.into(),
        spi_cfg.frequency_hz.Hz(),
        &clocks,
        &mut apb2,
    );
    let spi_bus = SpiBus::new(
        spi4,
        config::ACTUATOR_SPI_INSTANCE,
        spi_cfg.mode,
        spi_cfg.frequency_hz,
    );

    // SAFETY: single-threaded, no interrupt handlers touch RCC, GPIO or TIM2..5. The pins driven
    // through these banks are not owned by any HAL type above.
    let mut regs = unsafe { Mmio::steal() };
    let gpio = MmioGpio::new(unsafe { Mmio::steal() });
    let mut pwm_gpio = MmioGpio::new(unsafe { Mmio::steal() });

    let pwm = PwmConfig {
        instance: pins::PWM_OUT_INSTANCE,
        channel: pins::PWM_OUT_CHANNEL,
        frequency: config::PWM_OUT_FREQ_HZ,
        duty: config::PWM_OUT_DUTY,
        clock_freq: config::TIMER_CLOCK_HZ,
    };
    if let Err(e) = configure_pwm(&mut regs, &mut pwm_gpio, &pwm) {
        log::error!("pwm: {}", e);
    }

    match Max22216::init(spi_bus, gpio, &config::actuator()) {
        Ok(mut actuator) => {
            let profile = config::solenoid_profile();
            let bring_up = actuator
                .set_enable(true)
                .and_then(|_| actuator.set_active(true))
                .and_then(|_| actuator.configure_channel(Channel::Ch0, &profile))
                .and_then(|_| actuator.read_status());
            match bring_up {
                Ok(status) if status.status.fault() => {
                log::warn!("max22216: fault flags {:#04x}", status.status.raw())
            }
            Ok(status) => log::info!("max22216: status {:#06x}", status.data),
                Err(e) => log::error!("max22216: {}", e),
            }
        }
        Err(e) => log::error!("max22216: init failed: {}", e),
    }

    loop {
        cortex_m::asm::nop();
    }
}
