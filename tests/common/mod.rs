//! Fake hardware shared by the integration tests.
//!
//! - `FakeBank`: in-memory register file recording every write.
//! - `RecordingGpio`: records pin operations and serves scripted input levels.
//! - `SimMax22216`: SPI transport modelling the MAX22216 reply pipeline, where each reply carries
//!   the value of the register addressed by the previous frame.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};

use titan::error::{Error, Result, TransportError};
use titan::hw::gpio::{AltFunction, Gpio, Level, Pin, PinMode, Pull};
use titan::hw::mmio::{Register, RegisterBank};
use titan::hw::spi::{BitOrder, SpiConfig, SpiDevice, SpiMode, SpiTransport};

// ── FakeBank ──────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeBank {
    pub regs: BTreeMap<u32, u32>,
    pub writes: Vec<(u32, u32)>,
}

impl FakeBank {
    pub fn get(&self, reg: Register) -> u32 {
        self.regs.get(&reg.addr()).copied().unwrap_or(0)
    }

    pub fn preset(&mut self, reg: Register, value: u32) {
        self.regs.insert(reg.addr(), value);
    }

    pub fn written(&self) -> Vec<u32> {
        let mut addrs: Vec<u32> = self.writes.iter().map(|&(a, _)| a).collect();
        addrs.dedup();
        addrs
    }
}

impl RegisterBank for FakeBank {
    fn read(&mut self, reg: Register) -> u32 {
        self.get(reg)
    }

    fn write(&mut self, reg: Register, value: u32) {
        self.writes.push((reg.addr(), value));
        self.regs.insert(reg.addr(), value);
    }
}

// ── RecordingGpio ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpioCall {
    EnableClock(Pin),
    SetMode(Pin, PinMode),
    SetAlt(Pin, AltFunction),
    Pull(Pin, Pull),
    Write(Pin, Level),
}

#[derive(Default)]
pub struct RecordingGpio {
    pub calls: Vec<GpioCall>,
    pub inputs: HashMap<Pin, Level>,
}

impl RecordingGpio {
    pub fn calls_for(&self, pin: Pin) -> Vec<GpioCall> {
        self.calls
            .iter()
            .copied()
            .filter(|c| match *c {
                GpioCall::EnableClock(p)
                | GpioCall::SetMode(p, _)
                | GpioCall::SetAlt(p, _)
                | GpioCall::Pull(p, _)
                | GpioCall::Write(p, _) => p == pin,
            })
            .collect()
    }

    /// Last level written to `pin`, if any.
    pub fn level(&self, pin: Pin) -> Option<Level> {
        self.calls.iter().rev().find_map(|c| match *c {
            GpioCall::Write(p, l) if p == pin => Some(l),
            _ => None,
        })
    }
}

impl Gpio for RecordingGpio {
    fn enable_clock(&mut self, pin: Pin) {
        self.calls.push(GpioCall::EnableClock(pin));
    }

    fn set_mode(&mut self, pin: Pin, mode: PinMode) {
        self.calls.push(GpioCall::SetMode(pin, mode));
    }

    fn set_alternate_function(&mut self, pin: Pin, af: AltFunction) {
        self.calls.push(GpioCall::SetAlt(pin, af));
    }

    fn pull(&mut self, pin: Pin, pull: Pull) {
        self.calls.push(GpioCall::Pull(pin, pull));
    }

    fn write_pin(&mut self, pin: Pin, level: Level) {
        self.calls.push(GpioCall::Write(pin, level));
    }

    fn read_pin(&mut self, pin: Pin) -> Level {
        self.inputs.get(&pin).copied().unwrap_or(Level::High)
    }
}

// ── SimMax22216 ───────────────────────────────────────────────

pub struct SimMax22216 {
    pub regs: [u16; 128],
    /// Status byte returned with every reply.
    pub status: u8,
    pub initialized: bool,
    pub device_inits: usize,
    pub frames: Vec<[u8; 3]>,
    pub replies: Vec<[u8; 3]>,
    /// Fail the transfer with this index (0-based) with a timeout.
    pub fail_at: Option<usize>,
    attempts: usize,
    latched: Option<u8>,
}

impl Default for SimMax22216 {
    fn default() -> Self {
        Self {
            regs: [0; 128],
            status: 0x00,
            initialized: false,
            device_inits: 0,
            frames: Vec::new(),
            replies: Vec::new(),
            fail_at: None,
            attempts: 0,
            latched: None,
        }
    }
}

impl SimMax22216 {
    pub fn data(reply: &[u8; 3]) -> u16 {
        u16::from_be_bytes([reply[1], reply[2]])
    }
}

impl SpiTransport for SimMax22216 {
    fn init(&mut self, _instance: u8, _config: &SpiConfig) -> Result<()> {
        self.initialized = true;
        Ok(())
    }

    fn init_device(&mut self, _device: &SpiDevice) -> Result<()> {
        if !self.initialized {
            return Err(TransportError::NotInitialized.into());
        }
        self.device_inits += 1;
        Ok(())
    }

    fn transfer_sync(
        &mut self,
        _device: &SpiDevice,
        tx: &[u8],
        rx: &mut [u8],
        _timeout: u32,
    ) -> Result<()> {
        if !self.initialized {
            return Err(TransportError::NotInitialized.into());
        }
        if tx.len() != 3 || rx.len() != 3 {
            return Err(Error::InvalidArgument);
        }

        let attempt = self.attempts;
        self.attempts += 1;
        if self.fail_at == Some(attempt) {
            return Err(TransportError::Timeout.into());
        }

        let addr = tx[0] & 0x7F;
        let write = tx[0] & 0x80 != 0;

        let out = self.latched.map_or(0, |a| self.regs[usize::from(a)]);
        let [hi, lo] = out.to_be_bytes();
        let reply = [self.status, hi, lo];
        rx.copy_from_slice(&reply);

        if write {
            self.regs[usize::from(addr)] = u16::from_be_bytes([tx[1], tx[2]]);
        }
        self.latched = Some(addr);

        self.frames.push([tx[0], tx[1], tx[2]]);
        self.replies.push(reply);
        Ok(())
    }
}

// ── Helpers ───────────────────────────────────────────────────

pub fn spi_config() -> SpiConfig {
    SpiConfig {
        mode: SpiMode::Mode0,
        data_size: 8,
        frequency_hz: 1_000_000,
        first_bit: BitOrder::MsbFirst,
    }
}
