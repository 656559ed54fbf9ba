//! The 5-bit butterfly permutation at the heart of channel selection
//!
//! `perm5` runs a 14-stage butterfly network over a 5-bit input. Each stage
//! conditionally exchanges one pair of input bits under one control bit. The
//! network is evaluated through two 4096-entry substitution tables baked into
//! the binary at build time: the first covers the seven high control bits,
//! the second the seven low ones.

/// Bit pairs exchanged by butterfly stages 0..13 (low position of the pair)
const EXCHANGE_A: [u8; 14] = [0, 2, 1, 3, 0, 1, 0, 3, 1, 0, 2, 1, 0, 1];
/// Bit pairs exchanged by butterfly stages 0..13 (high position of the pair)
const EXCHANGE_B: [u8; 14] = [1, 3, 2, 4, 4, 3, 2, 4, 4, 3, 4, 3, 3, 2];

/// Runs butterfly stages `last` down to `first`; control bit `i - first`
/// of `ctrl` gates stage `i`.
const fn run_stages(mut z: u8, ctrl: u8, first: usize, last: usize) -> u8 {
    let mut i = last + 1;
    while i > first {
        i -= 1;
        if (ctrl >> (i - first)) & 1 == 1 {
            let a = EXCHANGE_A[i];
            let b = EXCHANGE_B[i];
            if (z >> a) & 1 != (z >> b) & 1 {
                z ^= (1 << a) | (1 << b);
            }
        }
    }
    z
}

/// Expands one half of the network into a (ctrl << 5 | z) -> z' table
const fn build_half(first: usize, last: usize) -> [u8; 4096] {
    let mut table = [0u8; 4096];
    let mut ctrl = 0;
    while ctrl < 128 {
        let mut z = 0;
        while z < 32 {
            table[(ctrl << 5) | z] = run_stages(z as u8, ctrl as u8, first, last);
            z += 1;
        }
        ctrl += 1;
    }
    table
}

/// Substitution tables for stages 13..7 and 6..0
static PERM5_LUT: [[u8; 4096]; 2] = [build_half(7, 13), build_half(0, 6)];

/// Applies the two-stage table-driven permutation to the 5-bit input `z`
/// under the control word `p = p_low[8:0] | p_high[4:0] << 9`.
pub fn perm5(z: u8, p_high: u8, p_low: u16) -> u8 {
    let p = (p_low & 0x1ff) | (((p_high & 0x1f) as u16) << 9);
    let z = z & 0x1f;

    let z = PERM5_LUT[0][(((p >> 7) as usize) << 5) | z as usize];
    PERM5_LUT[1][(((p & 0x7f) as usize) << 5) | z as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Straight-line reference: all 14 stages under the full control word
    fn perm5_reference(z: u8, p: u16) -> u8 {
        let mut z = z & 0x1f;
        for i in (0..14).rev() {
            if (p >> i) & 1 == 1 {
                let a = EXCHANGE_A[i];
                let b = EXCHANGE_B[i];
                if (z >> a) & 1 != (z >> b) & 1 {
                    z ^= (1 << a) | (1 << b);
                }
            }
        }
        z
    }

    #[test]
    fn test_identity_without_control_bits() {
        for z in 0..32u8 {
            assert_eq!(perm5(z, 0, 0), z);
        }
    }

    #[test]
    fn test_split_tables_match_reference_network() {
        for p in 0..(1u16 << 14) {
            let p_high = ((p >> 9) & 0x1f) as u8;
            let p_low = p & 0x1ff;
            for z in 0..32u8 {
                assert_eq!(perm5(z, p_high, p_low), perm5_reference(z, p));
            }
        }
    }

    #[test]
    fn test_bijection_for_every_control_word() {
        // Pigeonhole: 32 distinct inputs must land on 32 distinct outputs
        for p in 0..(1u16 << 14) {
            let p_high = ((p >> 9) & 0x1f) as u8;
            let p_low = p & 0x1ff;
            let mut seen = 0u32;
            for z in 0..32u8 {
                let out = perm5(z, p_high, p_low);
                assert!(out < 32);
                seen |= 1 << out;
            }
            assert_eq!(seen, u32::MAX, "perm5 not a bijection for p={:#x}", p);
        }
    }

    #[test]
    fn test_output_always_five_bits() {
        for &entry in PERM5_LUT[0].iter().chain(PERM5_LUT[1].iter()) {
            assert!(entry < 32);
        }
    }
}
