// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Serial Peripheral Interface (SPI) abstraction layer.
//!
//! - `SpiTransport` is the blocking transfer interface consumed by device drivers.
//! - `SpiDevice` identifies one device on a bus: the bus instance and an optional manual
//!   chip-select pin, which the device driver drives through its GPIO collaborator.
//! - `SpiBus` (target only) wraps a configured HAL SPI instance with 8-bit words.

use super::gpio::Pin;
use crate::error::Result;

/// Clock polarity / phase, numbered as in the usual SPI mode 0..3 convention.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SpiMode {
    /// CPOL = 0, CPHA = 0
    Mode0,
    /// CPOL = 0, CPHA = 1
    Mode1,
    /// CPOL = 1, CPHA = 0
    Mode2,
    /// CPOL = 1, CPHA = 1
    Mode3,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BitOrder {
    MsbFirst,
    LsbFirst,
}

/// Bus-level settings. The SCK/MISO/MOSI pins are owned by the HAL peripheral, not listed here.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SpiConfig {
    pub mode: SpiMode,
    /// Bits per frame.
    pub data_size: u8,
    /// SCK rate in Hz.
    pub frequency_hz: u32,
    pub first_bit: BitOrder,
}

/// One device on a bus.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SpiDevice {
    /// SPI peripheral number (SPIn).
    pub instance: u8,
    /// Manual active-low chip select. `None` when the transport selects the device itself.
    pub cs: Option<Pin>,
}

/// Blocking, synchronous SPI transfers.
pub trait SpiTransport {
    /// Bring up bus `instance` with `config`.
    fn init(&mut self, instance: u8, config: &SpiConfig) -> Result<()>;

    /// Register a device on an initialized bus.
    fn init_device(&mut self, device: &SpiDevice) -> Result<()>;

    /// Full-duplex exchange of `tx.len()` bytes. `rx` must be the same length as `tx`.
    ///
    /// `timeout` is in transport-defined polling units. On failure no bytes of `rx` are to be
    /// trusted.
    fn transfer_sync(
        &mut self,
        device: &SpiDevice,
        tx: &[u8],
        rx: &mut [u8],
        timeout: u32,
    ) -> Result<()>;
}

impl<S: SpiTransport + ?Sized> SpiTransport for &mut S {
    fn init(&mut self, instance: u8, config: &SpiConfig) -> Result<()> {
        (**self).init(instance, config)
    }

    fn init_device(&mut self, device: &SpiDevice) -> Result<()> {
        (**self).init_device(device)
    }

    fn transfer_sync(
        &mut self,
        device: &SpiDevice,
        tx: &[u8],
        rx: &mut [u8],
        timeout: u32,
    ) -> Result<()> {
        (**self).transfer_sync(device, tx, rx, timeout)
    }
}

/// Whether a bus enabled with `mode` at `frequency_hz` (8-bit words, MSB first) serves `config`.
pub fn settings_match(config: &SpiConfig, mode: SpiMode, frequency_hz: u32) -> bool {
    config.mode == mode
        && config.frequency_hz == frequency_hz
        && config.data_size == 8
        && config.first_bit == BitOrder::MsbFirst
}

#[cfg(feature = "stm32")]
pub use self::hal::SpiBus;

#[cfg(feature = "stm32")]
mod hal {
    use super::{settings_match, SpiConfig, SpiDevice, SpiMode, SpiTransport};
    use crate::error::{Error, Result, TransportError};
    use stm32f7xx_hal::{
        prelude::*,
        spi::{self, Enabled, Mode, Phase, Polarity, Spi},
    };

    impl From<SpiMode> for Mode {
        fn from(mode: SpiMode) -> Self {
            let (polarity, phase) = match mode {
                SpiMode::Mode0 => (Polarity::IdleLow, Phase::CaptureOnFirstTransition),
                SpiMode::Mode1 => (Polarity::IdleLow, Phase::CaptureOnSecondTransition),
                SpiMode::Mode2 => (Polarity::IdleHigh, Phase::CaptureOnFirstTransition),
                SpiMode::Mode3 => (Polarity::IdleHigh, Phase::CaptureOnSecondTransition),
            };
            Mode { polarity, phase }
        }
    }

    /// Wrapper around an enabled HAL SPI instance (8-bit words).
    ///
    /// The HAL has already configured pins, mode and clock by the time this is constructed. The
    /// bus remembers the mode and SCK rate it was enabled with, and `init` refuses any request
    /// that differs.
    pub struct SpiBus<I, P> {
        spi: Spi<I, P, Enabled<u8>>,
        instance: u8,
        mode: SpiMode,
        frequency_hz: u32,
        initialized: bool,
    }

    impl<I, P> SpiBus<I, P>
    where
        I: spi::Instance,
        P: spi::Pins<I>,
    {
        /// `mode` and `frequency_hz` must be the values passed to the HAL's `enable`.
        pub fn new(
            spi: Spi<I, P, Enabled<u8>>,
            instance: u8,
            mode: SpiMode,
            frequency_hz: u32,
        ) -> Self {
            Self {
                spi,
                instance,
                mode,
                frequency_hz,
                initialized: false,
            }
        }

        pub fn free(self) -> Spi<I, P, Enabled<u8>> {
            self.spi
        }

        /// Clock one byte out and the reply in, spending at most `budget` polls in total.
        fn transfer_byte(&mut self, byte: u8, budget: &mut u32) -> Result<u8> {
            let spi = &mut self.spi;
            poll(|| spi.send(byte), budget)?;
            poll(|| spi.read(), budget)
        }

        fn check(&self, device: &SpiDevice) -> Result<()> {
            if device.instance != self.instance {
                return Err(Error::InvalidArgument);
            }
            if !self.initialized {
                return Err(TransportError::NotInitialized.into());
            }
            Ok(())
        }
    }

    fn poll<T, E>(mut op: impl FnMut() -> nb::Result<T, E>, budget: &mut u32) -> Result<T> {
        loop {
            match op() {
                Ok(v) => return Ok(v),
                Err(nb::Error::WouldBlock) if *budget > 0 => *budget -= 1,
                Err(nb::Error::WouldBlock) => return Err(TransportError::Timeout.into()),
                Err(nb::Error::Other(_)) => return Err(TransportError::Bus.into()),
            }
        }
    }

    impl<I, P> SpiTransport for SpiBus<I, P>
    where
        I: spi::Instance,
        P: spi::Pins<I>,
    {
        fn init(&mut self, instance: u8, config: &SpiConfig) -> Result<()> {
            if instance != self.instance {
                return Err(Error::InvalidArgument);
            }
            if !settings_match(config, self.mode, self.frequency_hz) {
                log::warn!("spi: SPI{} cannot provide {:?}", instance, config);
                return Err(Error::Unsupported);
            }
            self.initialized = true;
            Ok(())
        }

        fn init_device(&mut self, device: &SpiDevice) -> Result<()> {
            self.check(device)
        }

        fn transfer_sync(
            &mut self,
            device: &SpiDevice,
            tx: &[u8],
            rx: &mut [u8],
            timeout: u32,
        ) -> Result<()> {
            self.check(device)?;
            if tx.len() != rx.len() {
                return Err(Error::InvalidArgument);
            }

            let mut budget = timeout;
            for (t, r) in tx.iter().zip(rx.iter_mut()) {
                *r = self.transfer_byte(*t, &mut budget)?;
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CFG: SpiConfig = SpiConfig {
        mode: SpiMode::Mode0,
        data_size: 8,
        frequency_hz: 1_000_000,
        first_bit: BitOrder::MsbFirst,
    };

    #[test]
    fn matching_settings_are_accepted() {
        assert!(settings_match(&CFG, SpiMode::Mode0, 1_000_000));
    }

    #[test]
    fn any_difference_from_the_enabled_bus_is_refused() {
        for mode in [SpiMode::Mode1, SpiMode::Mode2, SpiMode::Mode3] {
            assert!(!settings_match(&CFG, mode, 1_000_000), "{mode:?}");
        }
        assert!(!settings_match(&CFG, SpiMode::Mode0, 2_000_000));

        let wide = SpiConfig {
            data_size: 16,
            ..CFG
        };
        assert!(!settings_match(&wide, SpiMode::Mode0, 1_000_000));

        let lsb = SpiConfig {
            first_bit: BitOrder::LsbFirst,
            ..CFG
        };
        assert!(!settings_match(&lsb, SpiMode::Mode0, 1_000_000));
    }
}
