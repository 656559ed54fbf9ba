use tracing::{debug, info, warn};

use crate::core::clock;
use crate::core::{
    ControlState, DeviceAddress, Error, HoppingMode, LocalIdentity, PacketHeader, PacketType,
    PagingConfig, Result, StateReason, CLKN_MASK, FHS_PAYLOAD_LEN,
};
use crate::hop::HopKernel;

use super::baseband::{Baseband, FhsParams, RxCompletion, RxWindow, TxFrame};

/// Paging-session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    /// Transmitting ID1 pairs, listening for ID2
    Paging,
    /// ID2 received; transmitting FHS, listening for ID3
    PageResponse,
    /// ID3 received; link control owns the radio from here
    Established,
    TimedOut,
    Canceled,
}

/// Bookkeeping for one in-flight page attempt
#[derive(Debug)]
struct PagingState {
    /// Tick the attempt began at, for the session deadline
    clkn_start: u32,
    /// Tick the slave's ID2 was last observed at
    clkn_got_id2: Option<u32>,
    fhs_header: PacketHeader,
    fhs_payload: [u8; FHS_PAYLOAD_LEN],
}

impl PagingState {
    fn new(fhs_header: PacketHeader) -> Self {
        PagingState {
            clkn_start: 0,
            clkn_got_id2: None,
            fhs_header,
            fhs_payload: [0u8; FHS_PAYLOAD_LEN],
        }
    }
}

/// Master side of the page -> page-response -> link-establishment handshake
///
/// Timeframe of one successful exchange (ticks within a slot pair):
///
/// ```text
/// usec          0                 625                    1250            1875
/// clk    -1     0        1        2           3          4        5      6
/// master: prep  | tx id  | tx id  | rx        | rx       | tx fhs | ..   | rx
/// slave:        |        |        | tx id(2)  |          |        | ..   | tx id(3)
/// ```
///
/// Owns the [`HopKernel`] for the session; the radio layer reads channels
/// through [`hop`](PagingMaster::hop) and advances its phase per master
/// transmission while in page-response hopping.
pub struct PagingMaster {
    local: LocalIdentity,
    config: PagingConfig,
    hop: HopKernel,
    state: SessionState,
    paging: PagingState,
}

impl PagingMaster {
    pub fn new(local: LocalIdentity, config: PagingConfig) -> Self {
        let fhs_header = PacketHeader {
            lt_addr: 0,
            packet_type: PacketType::Fhs,
            flags: config.fhs_header_flags,
        };
        PagingMaster {
            local,
            config,
            hop: HopKernel::new(),
            state: SessionState::Idle,
            paging: PagingState::new(fhs_header),
        }
    }

    /// Current session state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The session's hop kernel, for the radio layer's channel lookups
    pub fn hop(&self) -> &HopKernel {
        &self.hop
    }

    pub fn hop_mut(&mut self) -> &mut HopKernel {
        &mut self.hop
    }

    /// Begins paging the device with the given address parts
    ///
    /// Prebuilds the FHS frame from the local identity, arms the hop kernel
    /// for the target, and schedules the clock-sync callback two ticks out so
    /// transmissions align with the master's even-tick slot ownership.
    pub fn start_paging<B: Baseband>(&mut self, bb: &mut B, lap: u32, uap: u8) -> Result<()> {
        if matches!(self.state, SessionState::Paging | SessionState::PageResponse) {
            return Err(Error::invalid_state("paging session already active"));
        }

        bb.set_session(HoppingMode::Paging, lap, uap);
        self.hop.init(DeviceAddress::new(lap, uap, 0).hop_address_word());

        self.paging = PagingState::new(PacketHeader {
            lt_addr: 0,
            packet_type: PacketType::Fhs,
            flags: self.config.fhs_header_flags,
        });
        let params = FhsParams {
            sync_word_low: (self.local.sync_word & 0xffff_ffff) as u32,
            lap: self.local.address.lap,
            uap: self.local.address.uap,
            nap: self.local.address.nap,
            class_of_device: self.config.class_of_device,
            lt_addr: self.config.lt_addr,
            eir: self.config.eir,
        };
        bb.build_fhs_payload(&mut self.paging.fhs_payload, &params);

        self.state = SessionState::Idle;
        bb.schedule_clock_sync(2);
        bb.set_control_state(ControlState::Page, StateReason::Success);
        info!("paging started for lap={:06x} uap={:02x}", lap, uap);
        Ok(())
    }

    /// Clock-sync callback: latches the session start tick against the live
    /// master clock and kicks off the first ID1 cycle
    pub fn clock_sync_elapsed<B: Baseband>(&mut self, bb: &mut B) {
        if self.check_canceled(bb) {
            return;
        }
        bb.cancel_clkn_delay();
        let clkn = bb.master_clkn();
        let delay = 4 + clock::tx_prepare_delay(clkn);
        self.paging.clkn_start = clkn;
        self.state = SessionState::Paging;
        self.schedule_page_burst(bb, delay);
    }

    /// A listen window completed; `window` is the tag it was scheduled with
    pub fn receive_complete<B: Baseband>(
        &mut self,
        bb: &mut B,
        window: RxWindow,
        completion: RxCompletion,
    ) {
        if self.check_canceled(bb) {
            // Cooperative cancel: the completion and its buffer are dropped
            // without touching the retry bookkeeping
            return;
        }
        match window {
            RxWindow::FirstId | RxWindow::SecondId => self.on_id_window(bb, window, completion),
            RxWindow::Ack => self.on_ack_window(bb, completion),
        }
    }

    /// ID2 window outcome while in the paging sub-phase
    fn on_id_window<B: Baseband>(
        &mut self,
        bb: &mut B,
        window: RxWindow,
        completion: RxCompletion,
    ) {
        let clkn = bb.master_clkn();
        if completion.packet.is_some() {
            // The slave answered at t'(k). Freeze the page-scan phase as the
            // X we will carry through the page-response hops, and send the
            // FHS in the next master slot.
            let delay = clock::tx_prepare_delay(clkn);
            self.paging.clkn_got_id2 = Some(clkn);
            bb.set_hopping_mode(HoppingMode::PageResponse);
            self.hop.freeze_phase(clkn);
            self.send_fhs(bb, delay);
            self.state = SessionState::PageResponse;
            debug!("ID2 at clkn={}, entering page response", clkn);
        } else if window == RxWindow::FirstId {
            // Nothing in the first half-slot: listen again in the second
            bb.schedule_receive(0, RxWindow::SecondId, 0);
        } else {
            self.schedule_page_burst(bb, clock::tx_prepare_delay(clkn));
        }
    }

    /// ID3 window outcome while in the page-response sub-phase
    fn on_ack_window<B: Baseband>(&mut self, bb: &mut B, completion: RxCompletion) {
        let clkn = bb.master_clkn();
        if completion.packet.is_some() {
            self.state = SessionState::Established;
            bb.set_control_state(ControlState::Connected, StateReason::Success);
            info!("ID3 at clkn={}, link established", clkn);
            return;
        }

        let delay = clock::tx_prepare_delay(clkn);
        if self.page_response_timeout_exceeded(clkn) {
            // The slave listens for an FHS only until pagerespTO runs out;
            // past that, go back to sending ID1
            debug!("no ID3 within pagerespTO, resuming paging");
            self.schedule_page_burst(bb, delay);
        } else {
            // Retry the FHS without re-freezing: the page-response sequence
            // advances only when the master's CLK1 wraps, so the channel
            // stays in step
            self.send_fhs(bb, delay);
        }
    }

    /// Schedules one full ID1 cycle: two transmissions covering two phase
    /// guesses, then the ID2 window. Every retry path funnels through here,
    /// which is where the session deadline is enforced.
    fn schedule_page_burst<B: Baseband>(&mut self, bb: &mut B, delay: u32) {
        let clkn = bb.master_clkn();
        if clock::elapsed_ticks(clkn, self.paging.clkn_start) > self.config.max_page_ticks {
            warn!("paging timeout after {} ticks", self.config.max_page_ticks);
            self.state = SessionState::TimedOut;
            bb.set_control_state(ControlState::Standby, StateReason::Timeout);
            return;
        }

        // Coming back from the FHS retry path this must also revert the
        // hopping mode from page-response to page
        bb.set_hopping_mode(HoppingMode::Paging);
        self.state = SessionState::Paging;

        // ID1 in both halves of the master's transmit slot
        bb.schedule_transmit(delay, None);
        bb.schedule_transmit(delay + 1, None);
        // ID2 window in the first half of the following slot; if it closes
        // empty, on_id_window opens the second half
        bb.schedule_receive(delay + 2, RxWindow::FirstId, 0);
    }

    /// Patches the FHS clock field for the upcoming transmit tick, then
    /// schedules the transmission and the ID3 window two ticks behind it
    fn send_fhs<B: Baseband>(&mut self, bb: &mut B, delay: u32) {
        let clkn = bb.master_clkn();
        // CLK27_2 as it will read at the start of the transmit tick
        let clk27_2 = ((clkn + delay + 1) & CLKN_MASK) >> 2;
        bb.patch_fhs_clock(&mut self.paging.fhs_payload, clk27_2);
        bb.schedule_transmit(
            delay,
            Some(TxFrame {
                header: self.paging.fhs_header,
                payload: self.paging.fhs_payload,
            }),
        );
        bb.schedule_receive(delay + 2, RxWindow::Ack, 0);
    }

    fn page_response_timeout_exceeded(&self, clkn: u32) -> bool {
        match self.paging.clkn_got_id2 {
            Some(got) => clock::elapsed_ticks(clkn, got) > self.config.page_response_timeout,
            None => true,
        }
    }

    /// Polls the control plane; once the session leaves the page state every
    /// pending callback becomes a no-op on arrival
    fn check_canceled<B: Baseband>(&mut self, bb: &B) -> bool {
        if bb.control_state() == ControlState::Page {
            return false;
        }
        if matches!(
            self.state,
            SessionState::Idle | SessionState::Paging | SessionState::PageResponse
        ) {
            debug!("paging canceled, dropping event");
            self.state = SessionState::Canceled;
        }
        true
    }
}
