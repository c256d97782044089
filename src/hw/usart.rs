// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! USART debug output and the `log` backend built on it.
//!
//! `UsartLogger` routes the `log` macros used throughout the crate to USART1, one CRLF-terminated
//! line per record.
//!
//! To access the terminal on the host machine, connect to the debug USB port and use
//! ```text
//! $ screen /dev/tty.usbmodem* <baud_rate>
//! ```

use core::cell::RefCell;

#[cfg(feature = "stm32")]
pub use self::hal::{Usart, UsartLogger};

/// Put `sink` into `slot` if `register` succeeds. A failed registration leaves the slot, and the
/// sink already writing through it, untouched.
pub fn install_once<T>(
    slot: &RefCell<Option<T>>,
    sink: T,
    register: impl FnOnce() -> bool,
) -> bool {
    if !register() {
        return false;
    }
    *slot.borrow_mut() = Some(sink);
    true
}

#[cfg(feature = "stm32")]
mod hal {
    use super::install_once;
    use core::cell::RefCell;
    use core::fmt::{self, Write as _};

    use cortex_m::interrupt::{self, Mutex};
    use nb::block;
    use stm32f7xx_hal::{
        pac,
        prelude::*,
        serial::{Instance, Pins, Serial, Tx},
    };

    /// Blocking writer over the TX half of a serial port. A bare `\n` goes out as `\r\n`.
    pub struct Usart<U: Instance> {
        tx: Tx<U>,
    }

    impl<U: Instance> Usart<U> {
        /// Keep the transmitter; the receiver is unused.
        pub fn new<PINS: Pins<U>>(serial: Serial<U, PINS>) -> Self {
            Self {
                tx: serial.split().0,
            }
        }

        #[inline]
        fn put(&mut self, b: u8) {
            let _ = block!(self.tx.write(b));
        }

        /// Wait for the last byte to leave the shift register.
        pub fn flush(&mut self) {
            let _ = block!(self.tx.flush());
        }
    }

    impl<U: Instance> fmt::Write for Usart<U> {
        fn write_str(&mut self, s: &str) -> fmt::Result {
            for b in s.bytes() {
                if b == b'\n' {
                    self.put(b'\r');
                }
                self.put(b);
            }
            Ok(())
        }
    }

    /// `log` backend writing to USART1.
    pub struct UsartLogger {
        usart: Mutex<RefCell<Option<Usart<pac::USART1>>>>,
    }

    static LOGGER: UsartLogger = UsartLogger {
        usart: Mutex::new(RefCell::new(None)),
    };

    impl UsartLogger {
        /// Take ownership of the debug USART and install the logger.
        ///
        /// Only the first call has any effect: later calls drop `usart` and return `false`.
        pub fn install(usart: Usart<pac::USART1>, level: log::LevelFilter) -> bool {
            let installed = interrupt::free(|cs| {
                install_once(LOGGER.usart.borrow(cs), usart, || {
                    log::set_logger(&LOGGER).is_ok()
                })
            });
            if installed {
                log::set_max_level(level);
            }
            installed
        }
    }

    impl log::Log for UsartLogger {
        fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
            metadata.level() <= log::max_level()
        }

        fn log(&self, record: &log::Record<'_>) {
            if !self.enabled(record.metadata()) {
                return;
            }
            interrupt::free(|cs| {
                if let Some(usart) = self.usart.borrow(cs).borrow_mut().as_mut() {
                    let _ = writeln!(usart, "[{:<5}] {}", record.level(), record.args());
                }
            });
        }

        fn flush(&self) {
            interrupt::free(|cs| {
                if let Some(usart) = self.usart.borrow(cs).borrow_mut().as_mut() {
                    usart.flush();
                }
            });
        }
    }
}
