// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Error types shared by every driver in the crate.
//!
//! All variants are `Copy` so results can be passed around freely in `no_std` code.

use core::fmt;

/// Every fallible operation in the firmware returns this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Bad caller input: out-of-range index, unrepresentable timing, missing pin.
    InvalidArgument,
    /// The request names a capability this driver does not implement.
    Unsupported,
    /// The SPI collaborator failed; the inner error is passed through unchanged.
    Transport(TransportError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument => write!(f, "invalid argument"),
            Self::Unsupported => write!(f, "unsupported"),
            Self::Transport(e) => write!(f, "transport: {e}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// The transfer did not complete within the caller-supplied timeout.
    Timeout,
    /// The peripheral reported a bus fault (overrun, mode fault, ...).
    Bus,
    /// A transfer was attempted before the bus was initialized.
    NotInitialized,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "timed out"),
            Self::Bus => write!(f, "bus error"),
            Self::NotInitialized => write!(f, "bus not initialized"),
        }
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
