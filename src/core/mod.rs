//! Core types and constants for the BR/EDR baseband components
//!
//! This module contains the fundamental building blocks shared by the hop
//! kernel and the paging state machine.

pub mod clock;
pub mod error;
pub mod types;

pub use self::error::{Error, Result};
pub use self::types::{
    ChannelMap,
    ControlState,
    DeviceAddress,
    HoppingMode,
    LocalIdentity,
    PacketHeader,
    PacketType,
    PagingConfig,
    StateReason,
};

/// Number of BR/EDR RF channels (2402..2480 MHz, 1 MHz spacing)
pub const NUM_CHANNELS: usize = 79;

/// Master clock ticks per second (one tick = 312.5 us)
pub const CLKN_RATE: u32 = 3200;

/// The master clock is a 27-bit counter
pub const CLKN_MASK: u32 = (1 << 27) - 1;

/// Minimum usable channels for a viable AFH map (N_min per core spec)
pub const AFH_MIN_CHANNELS: usize = 20;

/// Size of the opaque FHS payload buffer handed to the packet codec
pub const FHS_PAYLOAD_LEN: usize = 20;
