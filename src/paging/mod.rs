//! Paging master
//!
//! The master side of the page / page-response handshake: transmit ID1 pairs
//! while sweeping the target's unknown scan phase, catch its ID2, deliver the
//! FHS, and confirm with ID3 — all under the 45 s session bound. Driven by
//! the external TDMA scheduler through the [`Baseband`] collaborator trait.

pub mod baseband;
pub mod master;

pub use self::baseband::{Baseband, FhsParams, RxCompletion, RxPacket, RxWindow, TxFrame};
pub use self::master::{PagingMaster, SessionState};
