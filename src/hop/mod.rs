//! Channel-selection (hop) kernel
//!
//! This module computes, for a 27-bit master clock value and a set of
//! address-derived register loads, the RF channel to use for basic, inquiry
//! and page hopping, and manages the adaptive-frequency-hopping channel
//! remapping. Pure computation: no I/O and no state beyond the
//! [`HopKernel`] instance owned by the caller.

pub mod kernel;
pub mod perm;
pub mod phase;

pub use self::kernel::HopKernel;
pub use self::perm::perm5;
pub use self::phase::page_scan_phase;
