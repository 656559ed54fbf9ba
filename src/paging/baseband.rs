use crate::core::{ControlState, HoppingMode, PacketHeader, StateReason, FHS_PAYLOAD_LEN};

/// Tags a scheduled listen window so its completion can be routed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RxWindow {
    /// ID2 window in the first half of the slot following an ID1 pair
    FirstId,
    /// Follow-up ID2 window in the second half of the same slot
    SecondId,
    /// ID3 window following an FHS transmission
    Ack,
}

/// A decoded packet handed back by the radio layer
#[derive(Debug, Clone)]
pub struct RxPacket {
    pub header: Option<PacketHeader>,
    pub payload: Vec<u8>,
}

impl RxPacket {
    /// A bare ID packet (access code only, no header or payload)
    pub fn id() -> Self {
        RxPacket {
            header: None,
            payload: Vec::new(),
        }
    }
}

/// Outcome of a listen window
#[derive(Debug, Clone)]
pub struct RxCompletion {
    /// The decoded packet, or `None` when the window closed empty
    pub packet: Option<RxPacket>,
    /// Tick offset of the decode relative to the window open, as a hint
    pub time_offset: i32,
}

impl RxCompletion {
    pub fn empty() -> Self {
        RxCompletion {
            packet: None,
            time_offset: 0,
        }
    }

    pub fn with_packet(packet: RxPacket) -> Self {
        RxCompletion {
            packet: Some(packet),
            time_offset: 0,
        }
    }
}

/// A framed transmission; passing `None` to
/// [`Baseband::schedule_transmit`] instead sends a minimal ID packet on the
/// currently frozen sync word
#[derive(Debug, Clone)]
pub struct TxFrame {
    pub header: PacketHeader,
    pub payload: [u8; FHS_PAYLOAD_LEN],
}

/// Inputs the packet codec needs to fill the constant part of an FHS payload
#[derive(Debug, Clone, Copy)]
pub struct FhsParams {
    /// Low 32 bits of the master's sync word (parity field)
    pub sync_word_low: u32,
    pub lap: u32,
    pub uap: u8,
    pub nap: u16,
    pub class_of_device: u32,
    /// LT_ADDR assigned to the slave
    pub lt_addr: u8,
    /// Whether an extended inquiry response follows
    pub eir: bool,
}

/// Services the paging master consumes from the rest of the baseband stack
///
/// The TDMA scheduler, radio mode layer, packet codec and control plane,
/// folded into one injected trait so tests can substitute a deterministic
/// fake. All offsets are ticks relative to the tick the current callback runs
/// in; callbacks run to completion and must not block. A scheduled receive
/// completes by re-entering the master through
/// [`PagingMaster::receive_complete`](crate::paging::PagingMaster::receive_complete)
/// with the same [`RxWindow`] tag; the clock-sync callback re-enters through
/// [`PagingMaster::clock_sync_elapsed`](crate::paging::PagingMaster::clock_sync_elapsed).
pub trait Baseband {
    /// Live 27-bit master clock
    fn master_clkn(&self) -> u32;

    /// Arranges the clock-sync callback `offset` ticks ahead
    fn schedule_clock_sync(&mut self, offset: u32);

    /// Arranges a transmission prepared `offset` ticks ahead
    fn schedule_transmit(&mut self, offset: u32, frame: Option<TxFrame>);

    /// Arranges a listen window prepared `offset` ticks ahead
    fn schedule_receive(&mut self, offset: u32, window: RxWindow, expected_payload_len: usize);

    /// Clears any stale scheduled clock delay before re-synchronizing to the
    /// master clock
    fn cancel_clkn_delay(&mut self);

    /// Switches the hopping scheme, keeping the session address
    fn set_hopping_mode(&mut self, mode: HoppingMode);

    /// Switches hopping scheme and target address for a new session
    fn set_session(&mut self, mode: HoppingMode, lap: u32, uap: u8);

    /// Outer control-plane state, polled for cooperative cancellation
    fn control_state(&self) -> ControlState;

    /// Reports a control-plane transition with its reason
    fn set_control_state(&mut self, state: ControlState, reason: StateReason);

    /// Fills the constant part of an FHS payload
    fn build_fhs_payload(&mut self, payload: &mut [u8; FHS_PAYLOAD_LEN], params: &FhsParams);

    /// Patches the CLK27_2 field of a prebuilt FHS payload
    fn patch_fhs_clock(&mut self, payload: &mut [u8; FHS_PAYLOAD_LEN], clk27_2: u32);
}
