//! Page-scan phase iteration
//!
//! While paging, the master knows the target's address but not its clock, so
//! it must sweep all 32 possible values of the slave's CLK[16:12] — the X
//! input the slave's own page-scan hopping uses. A slave in page scan listens
//! for at least 10 ms (16 master-owned ticks) every scan interval of 0 s,
//! 1.28 s or 2.56 s, and its X guess advances by one every 1.28 s.
//!
//! `page_scan_phase` turns the master clock into the X value to try on each
//! tick so that:
//!
//! 1. all 32 values are swept repeatedly within any 1.28 s interval;
//! 2. if the values tried during the window at time T were (X0..X15), none of
//!    (X0+1..X15+1) is tried in the window at T+1.28 s — those correspond to
//!    slave clock guesses already rejected;
//! 3. likewise none of (X0+2..X15+2) is tried at T+2.56 s.
//!
//! CLK[5:2,0] is a counter that skips slave-owned ticks, giving (1);
//! CLK[16:12]*17 adds 17 per 1.28 s, giving (2); CLK[16:13]*16 makes the
//! 2.56 s step 17+17+16 = 50 ≡ 18 (mod 32), giving (3).

/// X input for page hopping when the master clock reads `clk`
///
/// The bit decomposition is normative for the coverage guarantees above;
/// do not refactor the arithmetic.
pub fn page_scan_phase(clk: u32) -> u8 {
    // X = ( CLK[5:2,0] + CLK[16:12]*17 + CLK[16:13]*16 ) mod 32
    (((((clk >> 1) & 0x1e) | (clk & 1)) + ((clk >> 12) & 0x1f) * 17 + ((clk >> 13) & 0xf) * 16)
        % 32) as u8
}
