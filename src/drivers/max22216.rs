// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! MAX22216/MAX22217 SPI solenoid driver.
//!
//! This module handles SPI framing and register access for the MAX22216 and exposes the channel
//! configuration, enable and diagnostic operations built on them.
//!
//! Every transaction is a 3-byte frame:
//! - byte 0: bit 7 = write, bits 6..0 = register address
//! - bytes 1..2: 16-bit data, MSB first (zero for reads)
//!
//! The reply clocked out during a frame carries a status byte followed by the value of the register
//! addressed by the *previous* frame. A read therefore takes two frames to the same address; this
//! is hidden inside [`Max22216::read_reg`].

use crate::config::ACTUATOR_SPI_TIMEOUT;
use crate::error::{Error, Result};
use crate::hw::gpio::{Gpio, Level, Pin, PinMode, Pull};
use crate::hw::mmio::Field;
use crate::hw::spi::{SpiConfig, SpiDevice, SpiTransport};

pub const FRAME_LEN: usize = 3;

const RW_BIT: u8 = 0x80;
const ADDR_MASK: u8 = 0x7F;

// Register addresses
pub mod reg {
    pub const GLOBAL_CTRL: u8 = 0x00;
    pub const GLOBAL_CFG: u8 = 0x01;
    pub const STATUS: u8 = 0x02;
    pub const FAULT0: u8 = 0x65;
    pub const FAULT1: u8 = 0x66;

    /// First per-channel register block and the distance between blocks.
    pub const CH0_BASE: u8 = 0x09;
    pub const CH_STRIDE: u8 = 0x0E;

    // Offsets inside a channel block
    pub const DC_L2H: u8 = 0x00;
    pub const DC_H: u8 = 0x01;
    pub const DC_L: u8 = 0x02;
    pub const TIME_L2H: u8 = 0x03;
    pub const CTRL0: u8 = 0x04;
    pub const CTRL1: u8 = 0x05;

    /// I_MONITOR register of channels 0..3.
    pub const I_MONITOR: [u8; 4] = [0x45, 0x50, 0x57, 0x60];
}

/// Bit layout of GLOBAL_CTRL / GLOBAL_CFG.
pub mod global {
    use crate::hw::mmio::Field;

    /// CNTLx: channel x output enable.
    #[inline]
    pub const fn cntl(ch: super::Channel) -> Field {
        Field::bit(ch as u8)
    }

    /// Master PWM frequency divider.
    pub const F_PWM_M: Field = Field::new(4, 4);

    /// GLOBAL_CFG.ACTIVE: leave low-power mode.
    pub const ACTIVE: Field = Field::bit(15);
}

/// Bit layout of CFG_CTRL0.
mod ctrl0 {
    use crate::hw::mmio::Field;

    pub const RAMP: Field = Field::new(0, 8);
    pub const RUPE: Field = Field::bit(8);
    pub const RMDE: Field = Field::bit(9);
    pub const RDWE: Field = Field::bit(10);
    pub const H2L_EN: Field = Field::bit(11);
    pub const OL_EN: Field = Field::bit(12);
    pub const HHF_EN: Field = Field::bit(13);
    pub const CTRL_MODE: Field = Field::new(14, 2);
}

/// Bit layout of CFG_CTRL1.
mod ctrl1 {
    use crate::hw::mmio::Field;

    pub const SNSF: Field = Field::new(0, 2);
    pub const GAIN: Field = Field::new(2, 2);
    pub const SLEW: Field = Field::new(4, 2);
    pub const T_BLANK: Field = Field::new(6, 2);
    pub const F_PWM: Field = Field::new(8, 2);
    pub const HSNLS: Field = Field::bit(10);
}

/// Output channel of the IC.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Channel {
    Ch0,
    Ch1,
    Ch2,
    Ch3,
}

impl Channel {
    pub const ALL: [Self; 4] = [Self::Ch0, Self::Ch1, Self::Ch2, Self::Ch3];

    /// First register of this channel's configuration block.
    #[inline]
    pub const fn base(self) -> u8 {
        reg::CH0_BASE + reg::CH_STRIDE * self as u8
    }

    #[inline]
    pub const fn reg(self, offset: u8) -> u8 {
        self.base() + offset
    }

    #[inline]
    pub const fn i_monitor_reg(self) -> u8 {
        reg::I_MONITOR[self as usize]
    }
}

impl TryFrom<u8> for Channel {
    type Error = Error;

    fn try_from(n: u8) -> Result<Self> {
        match n {
            0 => Ok(Self::Ch0),
            1 => Ok(Self::Ch1),
            2 => Ok(Self::Ch2),
            3 => Ok(Self::Ch3),
            _ => Err(Error::InvalidArgument),
        }
    }
}

/// Status byte returned in the first byte of every reply.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Status {
    raw: u8,
}

impl Status {
    const FAULT_MASK: u8 = 0xFE;

    #[inline]
    pub fn raw(&self) -> u8 {
        self.raw
    }

    /// Overtemperature.
    #[inline]
    pub fn ovt(&self) -> bool {
        (self.raw & (1 << 7)) != 0
    }

    /// Overcurrent on any channel.
    #[inline]
    pub fn ocp(&self) -> bool {
        (self.raw & (1 << 6)) != 0
    }

    /// Open load on any channel.
    #[inline]
    pub fn olf(&self) -> bool {
        (self.raw & (1 << 5)) != 0
    }

    /// Hit current not reached.
    #[inline]
    pub fn hhf(&self) -> bool {
        (self.raw & (1 << 4)) != 0
    }

    /// Plunger movement not detected.
    #[inline]
    pub fn dpm(&self) -> bool {
        (self.raw & (1 << 3)) != 0
    }

    /// SPI communication error on the previous frame.
    #[inline]
    pub fn comer(&self) -> bool {
        (self.raw & (1 << 2)) != 0
    }

    /// Supply undervoltage.
    #[inline]
    pub fn uvm(&self) -> bool {
        (self.raw & (1 << 1)) != 0
    }

    /// Any of the fault flags above.
    #[inline]
    pub fn fault(&self) -> bool {
        (self.raw & Self::FAULT_MASK) != 0
    }
}

/// Reply to one register access.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Response {
    pub status: Status,
    pub data: u16,
}

/// Both fault registers, read back to back.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Faults {
    pub fault0: u16,
    pub fault1: u16,
    /// Status byte of the last read.
    pub status: Status,
}

/// Optional auxiliary lines. `None` means the line is not wired to the MCU.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct AuxPins {
    /// ENABLE input of the IC, driven by the MCU.
    pub enable: Option<Pin>,
    /// Open-drain active-low FAULT output.
    pub fault: Option<Pin>,
    pub stat0: Option<Pin>,
    pub stat1: Option<Pin>,
    /// CRC_EN strap, held low.
    pub crc_en: Option<Pin>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Max22216Config {
    pub spi: SpiConfig,
    pub device: SpiDevice,
    pub pins: AuxPins,
    /// CRC-protected SPI frames. Not implemented by this driver.
    pub enable_crc: bool,
}

/// Per-channel drive profile.
///
/// Two-bit fields must be in `0..=3`; anything larger is rejected rather than truncated.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ChannelConfig {
    /// Duty cycle during the low-to-high (hit) phase.
    pub dc_l2h: u16,
    /// Duty cycle during the hold phase.
    pub dc_h: u16,
    pub dc_l: u16,
    /// Length of the hit phase.
    pub time_l2h: u16,

    pub ctrl_mode: u8,
    pub hhf_enable: bool,
    pub open_load_enable: bool,
    pub h2l_enable: bool,
    pub ramp_down: bool,
    pub ramp_mid: bool,
    pub ramp_up: bool,
    pub ramp: u8,

    /// High-side (true) or low-side (false) switch.
    pub high_side: bool,
    pub pwm_div: u8,
    pub t_blank: u8,
    pub slew_rate: u8,
    pub gain: u8,
    pub snsf: u8,
}

/// OR together `(field, value)` pairs, rejecting any value wider than its field.
fn pack(fields: &[(Field, u32)]) -> Result<u16> {
    let word = fields.iter().try_fold(0u32, |acc, &(field, value)| {
        field
            .encode(value)
            .map(|bits| acc | bits)
            .ok_or(Error::InvalidArgument)
    })?;
    u16::try_from(word).map_err(|_| Error::InvalidArgument)
}

impl ChannelConfig {
    /// CFG_CTRL0 word.
    pub fn ctrl0(&self) -> Result<u16> {
        pack(&[
            (ctrl0::CTRL_MODE, self.ctrl_mode.into()),
            (ctrl0::HHF_EN, self.hhf_enable.into()),
            (ctrl0::OL_EN, self.open_load_enable.into()),
            (ctrl0::H2L_EN, self.h2l_enable.into()),
            (ctrl0::RDWE, self.ramp_down.into()),
            (ctrl0::RMDE, self.ramp_mid.into()),
            (ctrl0::RUPE, self.ramp_up.into()),
            (ctrl0::RAMP, self.ramp.into()),
        ])
    }

    /// CFG_CTRL1 word.
    pub fn ctrl1(&self) -> Result<u16> {
        pack(&[
            (ctrl1::HSNLS, self.high_side.into()),
            (ctrl1::F_PWM, self.pwm_div.into()),
            (ctrl1::T_BLANK, self.t_blank.into()),
            (ctrl1::SLEW, self.slew_rate.into()),
            (ctrl1::GAIN, self.gain.into()),
            (ctrl1::SNSF, self.snsf.into()),
        ])
    }
}

/// MAX22216 driver.
///
/// Owns its SPI transport and GPIO collaborator, so `&mut self` guarantees that the two frames of
/// a register read are never interleaved with another transaction. Pass `&mut` references as `S`
/// and `G` to keep the collaborators usable elsewhere.
pub struct Max22216<S, G> {
    spi: S,
    gpio: G,
    device: SpiDevice,
    pins: AuxPins,
}

impl<S: SpiTransport, G: Gpio> Max22216<S, G> {
    /// Bring up the SPI bus and the auxiliary pins.
    ///
    /// CRC mode is refused with `Unsupported` before anything is touched.
    pub fn init(mut spi: S, mut gpio: G, config: &Max22216Config) -> Result<Self> {
        if config.enable_crc {
            log::warn!("max22216: CRC mode requested, not supported");
            return Err(Error::Unsupported);
        }

        spi.init(config.device.instance, &config.spi)?;
        spi.init_device(&config.device)?;

        if let Some(cs) = config.device.cs {
            gpio.enable_clock(cs);
            gpio.write_pin(cs, Level::High);
            gpio.set_mode(cs, PinMode::Output);
        }

        let pins = config.pins;
        for out in [pins.enable, pins.crc_en].into_iter().flatten() {
            gpio.enable_clock(out);
            gpio.set_mode(out, PinMode::Output);
            gpio.write_pin(out, Level::Low);
        }
        if let Some(fault) = pins.fault {
            gpio.enable_clock(fault);
            gpio.set_mode(fault, PinMode::Input);
            gpio.pull(fault, Pull::Up);
        }
        for stat in [pins.stat0, pins.stat1].into_iter().flatten() {
            gpio.enable_clock(stat);
            gpio.set_mode(stat, PinMode::Input);
            gpio.pull(stat, Pull::None);
        }

        log::info!("max22216: ready on SPI{}", config.device.instance);

        Ok(Self {
            spi,
            gpio,
            device: config.device,
            pins,
        })
    }

    /// Release the collaborators.
    pub fn free(self) -> (S, G) {
        (self.spi, self.gpio)
    }

    /// Build one frame.
    #[inline]
    pub fn frame(write: bool, addr: u8, data: u16) -> [u8; FRAME_LEN] {
        let rw = if write { RW_BIT } else { 0 };
        let [hi, lo] = data.to_be_bytes();
        [rw | (addr & ADDR_MASK), hi, lo]
    }

    /// Exchange one frame, framing it with the chip-select line if the device has one.
    fn transfer(&mut self, frame: [u8; FRAME_LEN]) -> Result<Response> {
        let mut rx = [0u8; FRAME_LEN];

        if let Some(cs) = self.device.cs {
            self.gpio.write_pin(cs, Level::Low);
        }
        let res = self
            .spi
            .transfer_sync(&self.device, &frame, &mut rx, ACTUATOR_SPI_TIMEOUT);
        if let Some(cs) = self.device.cs {
            self.gpio.write_pin(cs, Level::High);
        }
        res?;

        log::trace!("max22216: {:02x?} -> {:02x?}", frame, rx);

        Ok(Response {
            status: Status { raw: rx[0] },
            data: u16::from_be_bytes([rx[1], rx[2]]),
        })
    }

    fn check_addr(addr: u8) -> Result<()> {
        if addr > ADDR_MASK {
            return Err(Error::InvalidArgument);
        }
        Ok(())
    }

    /// Write a register and return the status byte of the reply.
    pub fn write_reg(&mut self, addr: u8, value: u16) -> Result<Status> {
        Self::check_addr(addr)?;
        Ok(self.transfer(Self::frame(true, addr, value))?.status)
    }

    /// Read a register.
    ///
    /// Issues two frames to `addr`: the first latches the address, the second clocks out its
    /// value. The reply to a single frame belongs to whatever was addressed before it.
    pub fn read_reg(&mut self, addr: u8) -> Result<Response> {
        Self::check_addr(addr)?;
        let frame = Self::frame(false, addr, 0x0000);
        self.transfer(frame)?;
        self.transfer(frame)
    }

    /// Read-modify-write: replace the bits selected by `mask` with `value & mask`.
    pub fn update_reg(&mut self, addr: u8, mask: u16, value: u16) -> Result<Status> {
        let current = self.read_reg(addr)?.data;
        self.write_reg(addr, (current & !mask) | (value & mask))
    }

    /// Drive the ENABLE pin.
    pub fn set_enable(&mut self, enable: bool) -> Result<()> {
        let pin = self.pins.enable.ok_or(Error::InvalidArgument)?;
        self.gpio.write_pin(pin, Level::from(enable));
        Ok(())
    }

    /// Set or clear GLOBAL_CFG.ACTIVE.
    pub fn set_active(&mut self, active: bool) -> Result<Status> {
        let f = global::ACTIVE;
        self.update_reg(reg::GLOBAL_CFG, f.mask() as u16, field_value(f, active.into()))
    }

    /// Set the master PWM divider (`0..=15`).
    pub fn set_pwm_master(&mut self, f_pwm_m: u8) -> Result<Status> {
        let f = global::F_PWM_M;
        let value = f
            .encode(f_pwm_m.into())
            .ok_or(Error::InvalidArgument)?;
        self.update_reg(reg::GLOBAL_CTRL, f.mask() as u16, value as u16)
    }

    /// Program a channel's duty, timing and control registers.
    ///
    /// The control words are validated before the first transfer. After that the six writes are
    /// issued in order and the first failure is returned immediately: registers written before the
    /// failure keep their new values.
    pub fn configure_channel(&mut self, ch: Channel, cfg: &ChannelConfig) -> Result<()> {
        let ctrl0 = cfg.ctrl0()?;
        let ctrl1 = cfg.ctrl1()?;

        self.write_reg(ch.reg(reg::DC_L2H), cfg.dc_l2h)?;
        self.write_reg(ch.reg(reg::DC_H), cfg.dc_h)?;
        self.write_reg(ch.reg(reg::DC_L), cfg.dc_l)?;
        self.write_reg(ch.reg(reg::TIME_L2H), cfg.time_l2h)?;
        self.write_reg(ch.reg(reg::CTRL0), ctrl0)?;
        self.write_reg(ch.reg(reg::CTRL1), ctrl1)?;

        log::debug!("max22216: {:?} configured", ch);
        Ok(())
    }

    /// Set or clear GLOBAL_CTRL.CNTLx.
    pub fn set_channel_enable(&mut self, ch: Channel, enable: bool) -> Result<Status> {
        let f = global::cntl(ch);
        self.update_reg(reg::GLOBAL_CTRL, f.mask() as u16, field_value(f, enable.into()))
    }

    pub fn read_status(&mut self) -> Result<Response> {
        self.read_reg(reg::STATUS)
    }

    pub fn read_fault(&mut self) -> Result<Faults> {
        let fault0 = self.read_reg(reg::FAULT0)?.data;
        let last = self.read_reg(reg::FAULT1)?;
        Ok(Faults {
            fault0,
            fault1: last.data,
            status: last.status,
        })
    }

    /// Read the current monitor of one channel.
    pub fn read_i_monitor(&mut self, ch: Channel) -> Result<Response> {
        self.read_reg(ch.i_monitor_reg())
    }

    /// Sample the FAULT pin. `true` while the IC pulls it low.
    pub fn fault_asserted(&mut self) -> Result<bool> {
        let pin = self.pins.fault.ok_or(Error::InvalidArgument)?;
        Ok(self.gpio.read_pin(pin) == Level::Low)
    }

    /// Sample STAT0 and STAT1.
    pub fn stat_pins(&mut self) -> Result<(Level, Level)> {
        let (Some(s0), Some(s1)) = (self.pins.stat0, self.pins.stat1) else {
            return Err(Error::InvalidArgument);
        };
        Ok((self.gpio.read_pin(s0), self.gpio.read_pin(s1)))
    }
}

/// `value` shifted into a single-register field, truncated to 16 bits.
#[inline]
fn field_value(f: Field, value: u32) -> u16 {
    ((value << f.pos()) & f.mask()) as u16
}
