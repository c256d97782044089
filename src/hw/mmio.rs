// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Memory-mapped register access.
//!
//! - `Register` names one 32-bit register by address.
//! - `Field` names a contiguous bit range inside a register.
//! - `RegisterBank` is the access capability handed to drivers. Its provided methods implement the
//!   read-modify-write field operations; implementors only supply `read` and `write`.
//!
//! On the target, `Mmio` performs volatile accesses at the physical address. Tests substitute an
//! in-memory bank.

use core::ptr;

/// A single 32-bit memory-mapped register.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Register {
    addr: u32,
}

impl Register {
    #[inline]
    pub const fn at(addr: u32) -> Self {
        assert!(addr % 4 == 0, "registers are word aligned");
        Self { addr }
    }

    #[inline]
    pub const fn addr(&self) -> u32 {
        self.addr
    }
}

/// Contiguous bit range `[pos, pos + width)` inside a 32-bit register.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Field {
    mask: u32,
    pos: u8,
}

impl Field {
    /// Field of `width` bits starting at bit `pos`.
    ///
    /// Panics (at compile time when used in a `const`) if the range does not fit in 32 bits.
    pub const fn new(pos: u8, width: u8) -> Self {
        assert!(width > 0 && width <= 32, "field width out of range");
        assert!(pos as u32 + width as u32 <= 32, "field exceeds register width");
        let ones = if width == 32 {
            u32::MAX
        } else {
            (1u32 << width) - 1
        };
        Self {
            mask: ones << pos,
            pos,
        }
    }

    /// Single-bit field.
    #[inline]
    pub const fn bit(pos: u8) -> Self {
        Self::new(pos, 1)
    }

    #[inline]
    pub const fn mask(&self) -> u32 {
        self.mask
    }

    #[inline]
    pub const fn pos(&self) -> u8 {
        self.pos
    }

    /// Largest value the field can hold.
    #[inline]
    pub const fn max(&self) -> u32 {
        self.mask >> self.pos
    }

    /// Shift `value` into position, or `None` if it does not fit the field width.
    #[inline]
    pub const fn encode(&self, value: u32) -> Option<u32> {
        if value > self.max() {
            None
        } else {
            Some(value << self.pos)
        }
    }

    /// Extract the field from a full register value.
    #[inline]
    pub const fn extract(&self, reg_val: u32) -> u32 {
        (reg_val & self.mask) >> self.pos
    }
}

/// Access capability for memory-mapped registers.
///
/// Every provided method touches exactly one register: one read followed by one write.
pub trait RegisterBank {
    fn read(&mut self, reg: Register) -> u32;

    fn write(&mut self, reg: Register, value: u32);

    /// OR the field mask into the register.
    #[inline]
    fn set_field(&mut self, reg: Register, field: Field) {
        let v = self.read(reg);
        self.write(reg, v | field.mask());
    }

    /// Clear every bit of the field.
    #[inline]
    fn clear_field(&mut self, reg: Register, field: Field) {
        let v = self.read(reg);
        self.write(reg, v & !field.mask());
    }

    /// XOR the field mask into the register.
    #[inline]
    fn toggle_field(&mut self, reg: Register, field: Field) {
        let v = self.read(reg);
        self.write(reg, v ^ field.mask());
    }

    /// Replace the field with `value`. Bits of `value` beyond the field width are dropped.
    #[inline]
    fn write_field(&mut self, reg: Register, field: Field, value: u32) {
        let v = self.read(reg) & !field.mask();
        self.write(reg, v | ((value << field.pos()) & field.mask()));
    }

    #[inline]
    fn read_field(&mut self, reg: Register, field: Field) -> u32 {
        field.extract(self.read(reg))
    }
}

impl<B: RegisterBank + ?Sized> RegisterBank for &mut B {
    #[inline]
    fn read(&mut self, reg: Register) -> u32 {
        (**self).read(reg)
    }

    #[inline]
    fn write(&mut self, reg: Register, value: u32) {
        (**self).write(reg, value)
    }
}

/// Volatile access to the physical peripheral address space.
pub struct Mmio {
    _private: (),
}

impl Mmio {
    /// # Safety
    ///
    /// Only valid on the target MCU, where every `Register` handed to this bank names a mapped
    /// peripheral register. The caller must also ensure no other code is concurrently performing
    /// read-modify-write sequences on the same registers (e.g. from an interrupt handler).
    pub unsafe fn steal() -> Self {
        Self { _private: () }
    }
}

impl RegisterBank for Mmio {
    #[inline]
    fn read(&mut self, reg: Register) -> u32 {
        // SAFETY: `Mmio::steal` contract, address is a word-aligned peripheral register.
        unsafe { ptr::read_volatile(reg.addr() as usize as *const u32) }
    }

    #[inline]
    fn write(&mut self, reg: Register, value: u32) {
        // SAFETY: see `read`.
        unsafe { ptr::write_volatile(reg.addr() as usize as *mut u32, value) }
    }
}
