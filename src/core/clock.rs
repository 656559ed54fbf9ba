//! Master-clock (CLKN) arithmetic
//!
//! CLKN is a free-running 27-bit counter at 3200 Hz. One master/slave slot
//! pair spans four ticks; the master owns the transmit half when CLKN1 = 0.
//! Transmissions must be prepared one tick ahead, in the last tick of the
//! preceding slot pair.

use super::CLKN_MASK;

/// Slot-pair tick index in which a transmission is prepared so it goes on air
/// at CLKN[1:0] = 0
pub const TX_PREPARE_IDX: u32 = 3;

/// Ticks elapsed from `start` to `now`, wrapping at the 27-bit clock boundary
pub fn elapsed_ticks(now: u32, start: u32) -> u32 {
    now.wrapping_sub(start) & CLKN_MASK
}

/// Position of `clkn` within its four-tick slot pair
pub fn slot_index(clkn: u32) -> u32 {
    clkn & 3
}

/// Ticks until the next transmit-prepare point (CLKN[1:0] = 3)
pub fn tx_prepare_delay(clkn: u32) -> u32 {
    (TX_PREPARE_IDX.wrapping_sub(slot_index(clkn))) & 3
}
