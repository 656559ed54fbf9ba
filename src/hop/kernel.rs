use tracing::{debug, warn};

use crate::core::{ChannelMap, Error, Result, AFH_MIN_CHANNELS, CLKN_MASK, NUM_CHANNELS};

use super::perm::perm5;
use super::phase::page_scan_phase;

/// Master-side channel-selection kernel
///
/// Holds the address-derived register loads, the rolling phase counter used
/// by page/inquiry hopping, and the frequency register banks. Create once,
/// [`init`](HopKernel::init) per session, then query channels for any clock
/// value; selection is a pure function of clock and stored registers.
#[derive(Debug, Clone)]
pub struct HopKernel {
    // Address register loads, immutable between init calls
    a27_23: u8,
    a22_19: u8,
    c: u8,
    e: u8,
    a18_10: u16,
    /// Rolling 5-bit position within the page/inquiry hop sequence
    phase: u8,
    /// Full 79-channel bank: index -> RF channel, even channels first
    basic_bank: [u8; NUM_CHANNELS],
    /// Peer-negotiated usable channels, ascending; first `afh_channel_count`
    /// entries are valid
    afh_bank: [u8; NUM_CHANNELS],
    afh_channel_count: usize,
    afh_enabled: bool,
    initialized: bool,
}

impl HopKernel {
    /// Creates an unconfigured kernel; [`init`](HopKernel::init) must run
    /// before any selection query
    pub fn new() -> Self {
        let mut basic_bank = [0u8; NUM_CHANNELS];
        let mut i = 0;
        while i < NUM_CHANNELS {
            basic_bank[i] = ((2 * i) % NUM_CHANNELS) as u8;
            i += 1;
        }
        HopKernel {
            a27_23: 0,
            a22_19: 0,
            c: 0,
            e: 0,
            a18_10: 0,
            phase: 0,
            basic_bank,
            afh_bank: [0u8; NUM_CHANNELS],
            afh_channel_count: NUM_CHANNELS,
            afh_enabled: false,
            initialized: false,
        }
    }

    /// Loads the selection registers from the 28-bit address word
    /// (UAP[3:0] over the LAP) and resets phase and AFH state
    pub fn init(&mut self, address: u32) {
        self.a27_23 = ((address >> 23) & 0x1f) as u8;
        self.a22_19 = ((address >> 19) & 0x0f) as u8;
        // C = A{8,6,4,2,0}, E = A{13,11,9,7,5,3,1}
        self.c = (((address >> 4) & 0x10)
            | ((address >> 3) & 0x08)
            | ((address >> 2) & 0x04)
            | ((address >> 1) & 0x02)
            | (address & 0x01)) as u8;
        self.a18_10 = ((address >> 10) & 0x1ff) as u16;
        self.e = (((address >> 7) & 0x40)
            | ((address >> 6) & 0x20)
            | ((address >> 5) & 0x10)
            | ((address >> 4) & 0x08)
            | ((address >> 3) & 0x04)
            | ((address >> 2) & 0x02)
            | ((address >> 1) & 0x01)) as u8;
        self.phase = 0;
        self.afh_enabled = false;
        self.afh_channel_count = NUM_CHANNELS;
        self.initialized = true;
    }

    /// Basic (connection) hopping channel for master clock `clk`
    pub fn select_basic(&self, clk: u32) -> u8 {
        assert!(self.initialized, "hop kernel used before init");
        let clk = clk & CLKN_MASK;
        let x = ((clk >> 2) & 0x1f) as u8;
        let y1 = ((clk >> 1) & 1) as u8;
        let a = self.a27_23 ^ ((clk >> 21) & 0x1f) as u8;
        let c = self.c ^ ((clk >> 16) & 0x1f) as u8;
        let d = self.a18_10 ^ ((clk >> 7) & 0x1ff) as u16;
        let f = ((16 * ((clk >> 7) & 0x1f_ffff)) % NUM_CHANNELS as u32) as u8;
        self.selection_box(x, y1, a, self.a22_19, c, d, self.e, f)
    }

    /// Page / page-response hopping channel for master clock `clk`
    ///
    /// X is the stored phase counter; while chasing the slave the radio layer
    /// drives it through the page-scan iteration, and after
    /// [`freeze_phase`](HopKernel::freeze_phase) it advances one step per
    /// master slot pair via [`advance_phase`](HopKernel::advance_phase).
    pub fn select_page(&self, clk: u32) -> u8 {
        assert!(self.initialized, "hop kernel used before init");
        self.phase_selector(clk)
    }

    /// Inquiry hopping channel for master clock `clk`
    ///
    /// Same selection wiring as page hopping; the kernel is expected to have
    /// been initialized with the inquiry access address (GIAC) instead of a
    /// target device address.
    pub fn select_inquiry(&self, clk: u32) -> u8 {
        assert!(self.initialized, "hop kernel used before init");
        self.phase_selector(clk)
    }

    fn phase_selector(&self, clk: u32) -> u8 {
        let clk = clk & CLKN_MASK;
        let y1 = ((clk >> 1) & 1) as u8;
        self.selection_box(
            self.phase & 0x1f,
            y1,
            self.a27_23,
            self.a22_19,
            self.c,
            self.a18_10,
            self.e,
            0,
        )
    }

    /// The shared add / xor / permute / add / bank-map pipeline
    #[allow(clippy::too_many_arguments)]
    fn selection_box(&self, x: u8, y1: u8, a: u8, b: u8, c: u8, d: u16, e: u8, f: u8) -> u8 {
        let z = perm5(((x + a) % 32) ^ b, c ^ (0x1f * y1), d);
        let (bank, count) = self.active_bank();
        let y2 = 32 * y1 as usize;
        bank[(z as usize + e as usize + f as usize + y2) % count]
    }

    /// The bank and modulus current lookups go through
    fn active_bank(&self) -> (&[u8], usize) {
        if self.afh_enabled {
            (&self.afh_bank[..self.afh_channel_count], self.afh_channel_count)
        } else {
            (&self.basic_bank[..], NUM_CHANNELS)
        }
    }

    /// Rebuilds the AFH bank from a peer-supplied channel-usage map and
    /// enables AFH selection.
    ///
    /// Maps with fewer than [`AFH_MIN_CHANNELS`] usable channels are rejected
    /// and the previous configuration is left untouched.
    pub fn configure_afh(&mut self, map: &ChannelMap) -> Result<()> {
        let count = map.usable_count();
        if count < AFH_MIN_CHANNELS {
            warn!("rejecting AFH map with {} usable channels", count);
            return Err(Error::insufficient_afh_channels(count));
        }
        for (slot, channel) in map.usable_channels().enumerate() {
            self.afh_bank[slot] = channel;
        }
        self.afh_channel_count = count;
        self.afh_enabled = true;
        debug!("AFH enabled with {} channels", count);
        Ok(())
    }

    /// Reverts lookups to the full 79-channel bank
    pub fn disable_afh(&mut self) {
        self.afh_enabled = false;
        debug!("AFH disabled");
    }

    /// Whether AFH remapping is active
    pub fn afh_enabled(&self) -> bool {
        self.afh_enabled
    }

    /// Channels in the active bank
    pub fn active_channel_count(&self) -> usize {
        self.active_bank().1
    }

    /// Locks the phase counter to the page-scan phase for `clk`; called once,
    /// at the moment the slave's acknowledgment is observed
    pub fn freeze_phase(&mut self, clk: u32) {
        self.phase = page_scan_phase(clk);
    }

    /// Steps the phase counter; called once per master transmission attempt
    /// in the page-response sub-phase
    pub fn advance_phase(&mut self) {
        self.phase = (self.phase + 1) & 0x1f;
    }

    /// Current 5-bit phase counter
    pub fn phase(&self) -> u8 {
        self.phase
    }
}

impl Default for HopKernel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn kernel() -> HopKernel {
        let mut hop = HopKernel::new();
        hop.init(0x2123456);
        hop
    }

    #[test]
    #[should_panic(expected = "before init")]
    fn test_select_before_init_panics() {
        let hop = HopKernel::new();
        hop.select_basic(0);
    }

    #[test]
    fn test_basic_bank_layout() {
        let hop = HopKernel::new();
        assert_eq!(hop.basic_bank[0], 0);
        assert_eq!(hop.basic_bank[1], 2);
        assert_eq!(hop.basic_bank[39], 78);
        assert_eq!(hop.basic_bank[40], 1);
        assert_eq!(hop.basic_bank[78], 77);
    }

    #[test]
    fn test_basic_selection_in_range_and_spreads() {
        let hop = kernel();
        let mut seen = HashSet::new();
        for clk in 0..128u32 {
            let ch = hop.select_basic(clk);
            assert!((ch as usize) < NUM_CHANNELS);
            seen.insert(ch);
        }
        // With constant control registers across this span, each half-slot
        // sweep is a bijection over 32 perm outputs
        assert!(seen.len() >= 32, "only {} distinct channels", seen.len());
    }

    #[test]
    fn test_page_sequence_visits_32_channels() {
        let mut hop = kernel();
        let mut seen = HashSet::new();
        for _ in 0..32 {
            seen.insert(hop.select_page(0));
            hop.advance_phase();
        }
        assert_eq!(seen.len(), 32);
    }

    #[test]
    fn test_page_and_inquiry_share_wiring() {
        let hop = kernel();
        for clk in 0..64u32 {
            assert_eq!(hop.select_page(clk), hop.select_inquiry(clk));
        }
    }

    #[test]
    fn test_init_resets_phase_and_afh() {
        let mut hop = kernel();
        hop.configure_afh(&ChannelMap::all_enabled()).unwrap();
        hop.freeze_phase(0x1234);
        hop.init(0x2123456);
        assert_eq!(hop.phase(), 0);
        assert!(!hop.afh_enabled());
        assert_eq!(hop.active_channel_count(), NUM_CHANNELS);
    }

    #[test]
    fn test_afh_accepts_viable_map() {
        let mut hop = kernel();
        // Channels 0..39 usable
        let mut bytes = [0u8; 10];
        for byte in bytes.iter_mut().take(5) {
            *byte = 0xff;
        }
        let map = ChannelMap(bytes);
        hop.configure_afh(&map).unwrap();
        assert!(hop.afh_enabled());
        assert_eq!(hop.active_channel_count(), 40);

        // Every selection lands inside the usable set
        for clk in 0..4096u32 {
            assert!(map.is_usable(hop.select_basic(clk)));
        }
    }

    #[test]
    fn test_afh_rejects_thin_map_keeping_previous() {
        let mut hop = kernel();
        let mut bytes = [0u8; 10];
        bytes[0] = 0xff;
        bytes[1] = 0xff;
        bytes[2] = 0xff; // 24 channels
        hop.configure_afh(&ChannelMap(bytes)).unwrap();
        assert_eq!(hop.active_channel_count(), 24);

        let mut thin = [0u8; 10];
        thin[0] = 0xff;
        thin[1] = 0x07; // 11 channels
        let err = hop.configure_afh(&ChannelMap(thin)).unwrap_err();
        assert!(matches!(
            err,
            Error::InsufficientAfhChannels {
                available: 11,
                required: AFH_MIN_CHANNELS
            }
        ));
        // Prior configuration retained
        assert!(hop.afh_enabled());
        assert_eq!(hop.active_channel_count(), 24);
        for clk in 0..256u32 {
            assert!(hop.select_basic(clk) < 24);
        }
    }

    #[test]
    fn test_disable_afh_restores_full_bank() {
        let mut hop = kernel();
        let mut bytes = [0u8; 10];
        for byte in bytes.iter_mut().take(3) {
            *byte = 0xff;
        }
        hop.configure_afh(&ChannelMap(bytes)).unwrap();
        hop.disable_afh();
        assert_eq!(hop.active_channel_count(), NUM_CHANNELS);

        let mut seen = HashSet::new();
        for clk in 0..4096u32 {
            seen.insert(hop.select_basic(clk));
        }
        assert!(seen.len() > 40);
    }

    #[test]
    fn test_freeze_matches_phase_formula() {
        let mut hop = kernel();
        for clk in [0u32, 10, 0x1234, 0x7ff_ffff] {
            hop.freeze_phase(clk);
            assert_eq!(hop.phase(), page_scan_phase(clk));
        }
    }

    #[test]
    fn test_advance_wraps_mod_32() {
        let mut hop = kernel();
        for _ in 0..31 {
            hop.advance_phase();
        }
        assert_eq!(hop.phase(), 31);
        hop.advance_phase();
        assert_eq!(hop.phase(), 0);
    }
}
