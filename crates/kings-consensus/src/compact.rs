// Consensus-critical. Changes require a network upgrade + tests.
//! Fixed-width 256-bit targets and the compact `bits` encoding.
//!
//! A block header stores its target as `bits = (size << 24) | mantissa`, a
//! floating-point-like form with a 3-byte mantissa and a byte-count exponent:
//!
//! - size = bits >> 24
//! - mantissa = bits & 0x007fffff (bit 23 is a sign flag)
//!
//! target = mantissa * 256^(size - 3)
//!
//! All arithmetic on [`Uint256`] wraps modulo 2^256. The retarget rules were
//! defined on a fixed-width integer and every node must reproduce the same
//! truncation and wraparound, so nothing here saturates or checks overflow.

use core::fmt;
use core::ops::Not;
use kings_core::{CompactFields, Hash32, COMPACT_MANTISSA_MASK, COMPACT_SIGN_BIT};
use primitive_types::U256;

/// Unsigned 256-bit integer with wrapping arithmetic.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Uint256(U256);

/// Result of decoding a compact target.
///
/// `value` is meaningful only when neither flag is set; callers must check
/// [`DecodedCompact::is_valid`] before trusting it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodedCompact {
    /// Decoded magnitude.
    pub value: Uint256,
    /// Sign bit was set on a non-zero mantissa.
    pub negative: bool,
    /// Mantissa shifted past 256 bits.
    pub overflow: bool,
}

impl DecodedCompact {
    /// True when the value decoded without a sign or overflow flag.
    pub fn is_valid(&self) -> bool {
        !self.negative && !self.overflow
    }
}

impl Uint256 {
    /// Zero.
    pub const ZERO: Self = Self(U256([0; 4]));
    /// One.
    pub const ONE: Self = Self(U256([1, 0, 0, 0]));
    /// 2^256 - 1.
    pub const MAX: Self = Self(U256::MAX);

    /// Widen a `u64`.
    pub fn from_u64(value: u64) -> Self {
        Self(U256::from(value))
    }

    /// Read a little-endian 32-byte number.
    pub fn from_le_bytes(bytes: &[u8; 32]) -> Self {
        Self(U256::from_little_endian(bytes))
    }

    /// Read a big-endian number of at most 32 bytes.
    pub fn from_be_slice(bytes: &[u8]) -> Option<Self> {
        (bytes.len() <= 32).then(|| Self(U256::from_big_endian(bytes)))
    }

    /// Little-endian 32-byte encoding.
    pub fn to_le_bytes(&self) -> [u8; 32] {
        self.0.to_little_endian()
    }

    /// Big-endian 32-byte encoding.
    pub fn to_be_bytes(&self) -> [u8; 32] {
        self.0.to_big_endian()
    }

    /// Interpret a block hash as a number.
    pub fn from_hash(hash: &Hash32) -> Self {
        Self::from_le_bytes(hash.as_bytes())
    }

    /// The hash whose numeric value is `self`.
    pub fn to_hash(&self) -> Hash32 {
        Hash32(self.to_le_bytes())
    }

    /// `2^exp`, or zero once `exp` reaches 256.
    pub fn pow2(exp: u32) -> Self {
        Self::ONE.shl_bits(exp)
    }

    /// True if the value is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Number of significant bits.
    pub fn bits(&self) -> u32 {
        self.0.bits() as u32
    }

    /// Low 64 bits.
    pub fn low_u64(&self) -> u64 {
        self.0.low_u64()
    }

    /// Shift left, dropping bits pushed past 256.
    pub fn shl_bits(self, shift: u32) -> Self {
        if shift >= 256 {
            return Self::ZERO;
        }
        Self(self.0 << shift)
    }

    /// Shift right.
    pub fn shr_bits(self, shift: u32) -> Self {
        if shift >= 256 {
            return Self::ZERO;
        }
        Self(self.0 >> shift)
    }

    /// Sum modulo 2^256.
    pub fn wrapping_add(self, rhs: Self) -> Self {
        Self(self.0.overflowing_add(rhs.0).0)
    }

    /// Product modulo 2^256.
    pub fn wrapping_mul(self, rhs: Self) -> Self {
        Self(self.0.overflowing_mul(rhs.0).0)
    }

    /// Multiply by a signed scalar the way the legacy retarget code does.
    ///
    /// The scalar is narrowed to its low 32 bits before multiplying, exactly
    /// like the legacy `operator*=(uint32_t)` overload it was passed to.
    pub fn wrapping_mul_scalar(self, scalar: i64) -> Self {
        self.wrapping_mul(Self::from_u64(u64::from(scalar as u32)))
    }

    /// Truncating division, `None` for a zero divisor.
    pub fn checked_div(self, rhs: Self) -> Option<Self> {
        self.0.checked_div(rhs.0).map(Self)
    }

    /// Divide by a signed scalar reinterpreted as unsigned 64-bit.
    pub fn checked_div_scalar(self, scalar: i64) -> Option<Self> {
        self.checked_div(Self::from_u64(scalar as u64))
    }

    /// Decode compact `bits`, reporting the sign and overflow flags.
    pub fn from_compact(bits: u32) -> DecodedCompact {
        let fields = CompactFields::parse(bits);
        let word = Self::from_u64(u64::from(fields.word));
        let value = if fields.size <= 3 {
            word
        } else {
            word.shl_bits(8 * (fields.size - 3))
        };

        DecodedCompact {
            value,
            negative: fields.negative,
            overflow: fields.overflow,
        }
    }

    /// Canonical compact encoding of the value.
    pub fn to_compact(&self) -> u32 {
        let mut size = self.bits().div_ceil(8);
        let mut compact = if size <= 3 {
            (self.low_u64() << (8 * (3 - size))) as u32
        } else {
            self.shr_bits(8 * (size - 3)).low_u64() as u32
        };

        // Keep the sign bit clear: move the mantissa down a byte instead.
        if compact & COMPACT_SIGN_BIT != 0 {
            compact >>= 8;
            size += 1;
        }

        (size << 24) | (compact & COMPACT_MANTISSA_MASK)
    }
}

impl Not for Uint256 {
    type Output = Self;

    fn not(self) -> Self {
        Self(!self.0)
    }
}

impl From<u64> for Uint256 {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

impl fmt::Debug for Uint256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Uint256(0x{})", hex::encode(self.to_be_bytes()))
    }
}

impl fmt::Display for Uint256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.to_be_bytes()))
    }
}

/// Decode compact `bits` to `(value, negative, overflow)`.
pub fn decode_compact(bits: u32) -> DecodedCompact {
    Uint256::from_compact(bits)
}

/// Canonical compact encoding of `value`.
pub fn encode_compact(value: &Uint256) -> u32 {
    value.to_compact()
}

/// Legacy RPC difficulty: how many times harder `bits` is than `0x1d00ffff`.
pub fn difficulty_from_bits(bits: u32) -> f64 {
    let mut shift = (bits >> 24) & 0xff;
    let mantissa = bits & 0x00ff_ffff;
    if mantissa == 0 {
        return 0.0;
    }
    let mut diff = f64::from(0x0000_ffffu32) / f64::from(mantissa);
    while shift < 29 {
        diff *= 256.0;
        shift += 1;
    }
    while shift > 29 {
        diff /= 256.0;
        shift -= 1;
    }
    diff
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_bitcoin_genesis_bits() {
        let decoded = Uint256::from_compact(0x1d00_ffff);
        assert!(decoded.is_valid());
        assert_eq!(decoded.value, Uint256::from_u64(0xffff).shl_bits(8 * 26));
        assert_eq!(decoded.value.to_compact(), 0x1d00_ffff);
    }

    #[test]
    fn small_sizes_shift_mantissa_right() {
        assert_eq!(Uint256::from_compact(0x0112_3456).value, Uint256::from_u64(0x12));
        assert_eq!(Uint256::from_compact(0x0212_3456).value, Uint256::from_u64(0x1234));
        assert_eq!(Uint256::from_compact(0x0312_3456).value, Uint256::from_u64(0x12_3456));
        // Sign bit only counts when the surviving mantissa is non-zero.
        let d = Uint256::from_compact(0x0180_3456);
        assert!(d.value.is_zero());
        assert!(!d.negative);
    }

    #[test]
    fn flags_negative_and_overflow() {
        let neg = Uint256::from_compact(0x0492_3456);
        assert!(neg.negative);
        assert!(!neg.overflow);
        assert_eq!(neg.value, Uint256::from_u64(0x1234_5600));

        assert!(Uint256::from_compact(0xff12_3456).overflow);
        assert!(Uint256::from_compact(0x2300_0001).overflow);
        assert!(!Uint256::from_compact(0x2200_0001).overflow);
        assert!(Uint256::from_compact(0x2200_0100).overflow);
        assert!(Uint256::from_compact(0x2101_0000).overflow);
        assert!(!Uint256::from_compact(0x2100_ffff).overflow);
    }

    #[test]
    fn encoding_keeps_sign_bit_clear() {
        assert_eq!(Uint256::from_u64(0x80).to_compact(), 0x0200_8000);
        assert_eq!(Uint256::from_u64(0x7f).to_compact(), 0x017f_0000);
        assert_eq!(Uint256::ZERO.to_compact(), 0);
        assert_eq!(Uint256::pow2(255).to_compact(), 0x2100_8000);
    }

    #[test]
    fn canonical_encoding_round_trips() {
        for exp in 0..256u32 {
            let value = Uint256::pow2(exp);
            let bits = value.to_compact();
            let decoded = Uint256::from_compact(bits);
            assert!(decoded.is_valid(), "2^{exp}");
            assert_eq!(decoded.value, value, "2^{exp}");
            assert_eq!(decoded.value.to_compact(), bits);
        }
    }

    #[test]
    fn arithmetic_wraps() {
        assert_eq!(Uint256::MAX.wrapping_add(Uint256::ONE), Uint256::ZERO);
        assert_eq!(
            Uint256::pow2(255).wrapping_mul_scalar(2),
            Uint256::ZERO
        );
        assert_eq!(!Uint256::ZERO, Uint256::MAX);
        assert_eq!(Uint256::pow2(256), Uint256::ZERO);
    }

    #[test]
    fn scalar_operands_follow_legacy_widths() {
        let v = Uint256::from_u64(10);
        // Multiplier keeps only its low 32 bits.
        assert_eq!(v.wrapping_mul_scalar((1i64 << 32) + 3), Uint256::from_u64(30));
        // Negative divisor reinterprets as a huge unsigned value.
        assert_eq!(v.checked_div_scalar(-1), Some(Uint256::ZERO));
        assert_eq!(v.checked_div_scalar(0), None);
        assert_eq!(v.checked_div_scalar(3), Some(Uint256::from_u64(3)));
    }

    #[test]
    fn hash_conversion_is_little_endian() {
        let mut bytes = [0u8; 32];
        bytes[0] = 0x01;
        bytes[31] = 0x80;
        let n = Uint256::from_hash(&Hash32(bytes));
        assert_eq!(n, Uint256::pow2(255).wrapping_add(Uint256::ONE));
        assert_eq!(n.to_hash(), Hash32(bytes));
    }

    #[test]
    fn rpc_difficulty() {
        assert_eq!(difficulty_from_bits(0x1d00_ffff), 1.0);
        assert_eq!(difficulty_from_bits(0x1c00_ffff), 256.0);
        assert_eq!(difficulty_from_bits(0x1e00_ffff), 1.0 / 256.0);
        assert_eq!(difficulty_from_bits(0), 0.0);
    }
}
