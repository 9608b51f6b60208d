//! The 8-bit input control word and its named sub-fields.
//!
//! Bit layout:
//!
//! ```text
//!   7   6   5   4   3   2   1   0
//! +---------------+-------+---+---+
//! |  debug mode   | rsvd  |ord|dat|
//! +---------------+-------+---+---+
//! ```
//!
//! Every setter replaces exactly one field and carries the remaining bits
//! through unchanged, so the stimulus driver and the debug-mode sweep can
//! update the word independently.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Mask of the serial stimulus bit.
pub const DATA_BIT_MASK: u8 = 0x01;
/// Mask of the filter-order select bit.
pub const ORDER_SELECT_MASK: u8 = 0x02;
/// Mask of the 4-bit debug-mode selector.
pub const DEBUG_MODE_MASK: u8 = 0xF0;
/// Bit position of the least significant debug-mode bit.
pub const DEBUG_MODE_SHIFT: u32 = 4;
/// Largest debug-mode selector value.
pub const MAX_DEBUG_MODE: u8 = 0x0F;

/// Decimation filter order selected by bit 1 of the control word.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterOrder {
    /// Single integrator/comb stage (`order_select = 0`).
    #[default]
    First,
    /// Two cascaded integrator/comb stages (`order_select = 1`).
    Second,
}

impl FilterOrder {
    /// Returns the value of the `order_select` field for this order.
    pub fn select_bit(self) -> u8 {
        match self {
            FilterOrder::First => 0,
            FilterOrder::Second => 1,
        }
    }

    /// Returns the number of integrator (and comb) stages.
    pub fn stages(self) -> u32 {
        match self {
            FilterOrder::First => 1,
            FilterOrder::Second => 2,
        }
    }
}

impl fmt::Display for FilterOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterOrder::First => write!(f, "cic1"),
            FilterOrder::Second => write!(f, "cic2"),
        }
    }
}

/// Error returned when an `order_select` value is neither 0 nor 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid filter order select {0} (expected 0 or 1)")]
pub struct InvalidOrderError(pub u8);

impl TryFrom<u8> for FilterOrder {
    type Error = InvalidOrderError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(FilterOrder::First),
            1 => Ok(FilterOrder::Second),
            other => Err(InvalidOrderError(other)),
        }
    }
}

/// The DUT's 8-bit input control word.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ControlWord(u8);

impl ControlWord {
    /// Wraps a raw 8-bit value.
    pub fn from_raw(raw: u8) -> Self {
        Self(raw)
    }

    /// The word written at the start of a scenario: only `order_select` set.
    pub fn for_order(order: FilterOrder) -> Self {
        Self::default().with_order(order)
    }

    /// Returns the raw 8-bit value.
    pub fn raw(self) -> u8 {
        self.0
    }

    /// Returns the serial stimulus bit (bit 0).
    pub fn data_bit(self) -> bool {
        self.0 & DATA_BIT_MASK != 0
    }

    /// Replaces the stimulus bit, keeping every other field.
    pub fn with_data_bit(self, bit: bool) -> Self {
        Self((self.0 & !DATA_BIT_MASK) | u8::from(bit))
    }

    /// Returns the selected filter order (bit 1).
    pub fn order(self) -> FilterOrder {
        if self.0 & ORDER_SELECT_MASK != 0 {
            FilterOrder::Second
        } else {
            FilterOrder::First
        }
    }

    /// Replaces the filter-order select bit, keeping every other field.
    pub fn with_order(self, order: FilterOrder) -> Self {
        Self((self.0 & !ORDER_SELECT_MASK) | (order.select_bit() << 1))
    }

    /// Returns the debug-mode selector (bits 4–7).
    pub fn debug_mode(self) -> u8 {
        (self.0 & DEBUG_MODE_MASK) >> DEBUG_MODE_SHIFT
    }

    /// Replaces the debug-mode selector, keeping the low nibble.
    ///
    /// Only the low four bits of `mode` are used.
    pub fn with_debug_mode(self, mode: u8) -> Self {
        debug_assert!(mode <= MAX_DEBUG_MODE, "debug mode {mode} out of range");
        Self((self.0 & !DEBUG_MODE_MASK) | ((mode & MAX_DEBUG_MODE) << DEBUG_MODE_SHIFT))
    }
}

impl From<u8> for ControlWord {
    fn from(raw: u8) -> Self {
        Self(raw)
    }
}

impl fmt::Debug for ControlWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControlWord")
            .field("raw", &format_args!("{:#04x}", self.0))
            .field("data_bit", &self.data_bit())
            .field("order", &self.order())
            .field("debug_mode", &self.debug_mode())
            .finish()
    }
}

impl fmt::Display for ControlWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08b}", self.0)
    }
}
