//! BR/EDR Baseband: master-side hop selection and paging for Bluetooth BR/EDR
//!
//! This library implements the clock-driven channel-selection (frequency-hopping)
//! kernel and the paging-master handshake state machine of a BR/EDR baseband
//! stack. The TDMA slot scheduler, radio, and packet codec are external
//! collaborators reached through the [`paging::Baseband`] trait.

pub mod core;
pub mod hop;
pub mod paging;

// Re-export commonly used items
pub use crate::core::{Error, Result};
pub use crate::hop::HopKernel;
pub use crate::paging::{PagingMaster, SessionState};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
