use serde::{Deserialize, Serialize};

use super::{CLKN_RATE, NUM_CHANNELS};

/// A BR/EDR device address split into its paging-relevant parts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceAddress {
    /// Lower address part (24 bits)
    pub lap: u32,
    /// Upper address part
    pub uap: u8,
    /// Non-significant address part
    pub nap: u16,
}

impl DeviceAddress {
    /// Creates an address from its parts, masking the LAP to 24 bits
    pub fn new(lap: u32, uap: u8, nap: u16) -> Self {
        DeviceAddress {
            lap: lap & 0xff_ffff,
            uap,
            nap,
        }
    }

    /// The 28-bit word feeding the hop-selection register loads:
    /// UAP[3:0] above the LAP
    pub fn hop_address_word(&self) -> u32 {
        ((self.uap as u32 & 0xf) << 24) | (self.lap & 0xff_ffff)
    }
}

/// The master's own identity, used to fill the FHS payload it pages with
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LocalIdentity {
    /// Local device address
    pub address: DeviceAddress,
    /// Access-code sync word derived from the local LAP
    pub sync_word: u64,
}

/// Hopping scheme currently driving channel selection in the radio layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoppingMode {
    /// Basic (connection) hopping
    Basic,
    /// Inquiry hopping on the GIAC
    Inquiry,
    /// Page hopping while chasing the target's scan phase
    Paging,
    /// Master page-response hopping with the frozen phase
    PageResponse,
}

/// Outer control-plane state, polled for cooperative cancellation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlState {
    /// No procedure active
    Standby,
    /// A paging session is running
    Page,
    /// Link established, connection layer owns the radio
    Connected,
}

/// Reason reported alongside a control-plane state change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateReason {
    Success,
    Timeout,
}

/// BR/EDR baseband packet type codes used on this path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PacketType {
    Null = 0,
    Poll = 1,
    Fhs = 2,
    Dm1 = 3,
}

/// Baseband packet header; ID packets carry none
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketHeader {
    /// Logical transport address
    pub lt_addr: u8,
    /// Packet type code
    pub packet_type: PacketType,
    /// FLOW/ARQN/SEQN header bits
    pub flags: u8,
}

/// AFH channel-usage map: one bit per RF channel, 79 bits in 10 bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelMap(pub [u8; 10]);

impl ChannelMap {
    /// A map with all 79 channels marked usable
    pub fn all_enabled() -> Self {
        let mut bytes = [0xff; 10];
        bytes[9] = 0x7f; // bit 79 is reserved
        ChannelMap(bytes)
    }

    /// Whether the given channel (0..78) is marked usable
    pub fn is_usable(&self, channel: u8) -> bool {
        let channel = channel as usize;
        channel < NUM_CHANNELS && (self.0[channel / 8] >> (channel % 8)) & 1 == 1
    }

    /// Number of usable channels in the map
    pub fn usable_count(&self) -> usize {
        self.usable_channels().count()
    }

    /// Usable channels in ascending channel-number order
    pub fn usable_channels(&self) -> impl Iterator<Item = u8> + '_ {
        (0..NUM_CHANNELS as u8).filter(move |&ch| self.is_usable(ch))
    }
}

/// Configuration for a paging session
///
/// The FHS fields the original hardware left hard-coded (class of device,
/// LT_ADDR, header flags, EIR) vary between peer devices in practice, so they
/// are exposed here with the field-tested defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagingConfig {
    /// Overall paging deadline in ticks
    pub max_page_ticks: u32,
    /// Ticks to keep retrying FHS after ID2 before falling back to paging
    /// (pagerespTO, in ticks)
    pub page_response_timeout: u32,
    /// Class of device advertised in the FHS payload
    pub class_of_device: u32,
    /// LT_ADDR assigned to the slave in the FHS payload
    pub lt_addr: u8,
    /// Header flag bits on the FHS packet; some peers expect FLOW|SEQN, most
    /// accept 0
    pub fhs_header_flags: u8,
    /// Whether the FHS announces an extended inquiry response
    pub eir: bool,
}

impl Default for PagingConfig {
    fn default() -> Self {
        PagingConfig {
            max_page_ticks: CLKN_RATE * 45,
            page_response_timeout: 8 * 2,
            class_of_device: 0x5A020C,
            lt_addr: 1,
            fhs_header_flags: 0,
            eir: false,
        }
    }
}
