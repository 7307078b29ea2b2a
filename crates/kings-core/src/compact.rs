// Consensus-critical. Changes require a network upgrade + tests.
//! Field layout of the 4-byte compact target encoding.
//!
//! The top byte is a base-256 exponent, bit 23 is a sign flag and the low
//! 23 bits are the mantissa. The 256-bit arithmetic lives in the consensus
//! crate; this is only the part parameter validation also needs.

/// Sign flag of a compact target.
pub const COMPACT_SIGN_BIT: u32 = 0x0080_0000;

/// Mantissa mask of a compact target.
pub const COMPACT_MANTISSA_MASK: u32 = 0x007f_ffff;

/// A compact target split into its fields, with flags computed on the
/// shifted mantissa.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompactFields {
    /// Encoded size in bytes (the exponent byte).
    pub size: u32,
    /// Mantissa after the right shift applied when `size <= 3`.
    pub word: u32,
    /// Sign flag set with a nonzero mantissa.
    pub negative: bool,
    /// Nonzero mantissa shifted past 256 bits.
    pub overflow: bool,
}

impl CompactFields {
    /// Split `bits` into its fields.
    pub const fn parse(bits: u32) -> Self {
        let size = bits >> 24;
        let mut word = bits & COMPACT_MANTISSA_MASK;
        if size <= 3 {
            word >>= 8 * (3 - size);
        }
        let negative = word != 0 && (bits & COMPACT_SIGN_BIT) != 0;
        let overflow = word != 0
            && (size > 34 || (word > 0xff && size > 33) || (word > 0xffff && size > 32));
        Self {
            size,
            word,
            negative,
            overflow,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_sizes_shift_the_mantissa() {
        let f = CompactFields::parse(0x0112_3456);
        assert_eq!(f.word, 0x12);
        assert!(!f.negative && !f.overflow);

        // Sign bit with a mantissa shifted to zero is not negative.
        let f = CompactFields::parse(0x0180_0001);
        assert_eq!(f.word, 0);
        assert!(!f.negative);
    }

    #[test]
    fn overflow_depends_on_mantissa_width() {
        assert!(!CompactFields::parse(0x2000_ffff).overflow);
        assert!(!CompactFields::parse(0x2100_8000).overflow);
        assert!(!CompactFields::parse(0x2100_ffff).overflow);
        assert!(CompactFields::parse(0x2101_0000).overflow);
        assert!(!CompactFields::parse(0x2200_00ff).overflow);
        assert!(CompactFields::parse(0x2200_0100).overflow);
        assert!(CompactFields::parse(0x2300_0001).overflow);
        assert!(!CompactFields::parse(0xff00_0000).overflow);
    }
}
