//! Arbitrary-precision arithmetic over hexadecimal-encoded key ranges.
//!
//! Every value here is a `BigUint`: puzzle ranges routinely sit at or above
//! 256 bits, so no fixed-width integer is ever used for bounds, keys or sizes.
//! Percentages are the only floating-point quantities, and they are applied
//! to big sizes exactly (see [`scale_by_percent`]).

use num_bigint::{BigInt, BigUint};
use num_traits::{ToPrimitive, Zero};

use crate::errors::{KeyspanError, KeyspanResult};

// ---------------------------------------------------------------------------
// Interval
// ---------------------------------------------------------------------------

/// An inclusive range `[start, end]` with `end >= start`.
///
/// A range of size zero is a single point.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Interval {
    start: BigUint,
    end: BigUint,
}

impl Interval {
    pub fn new(start: BigUint, end: BigUint) -> KeyspanResult<Self> {
        if end < start {
            return Err(KeyspanError::InvalidRange {
                start: int_to_hex(&start, 0),
                end: int_to_hex(&end, 0),
            });
        }
        Ok(Self { start, end })
    }

    /// Parse both bounds from hex text.
    pub fn from_hex(start: &str, end: &str) -> KeyspanResult<Self> {
        Self::new(hex_to_int(start)?, hex_to_int(end)?)
    }

    pub fn start(&self) -> &BigUint {
        &self.start
    }

    pub fn end(&self) -> &BigUint {
        &self.end
    }

    pub fn size(&self) -> BigUint {
        &self.end - &self.start
    }

    pub fn contains(&self, value: &BigUint) -> bool {
        &self.start <= value && value <= &self.end
    }

    /// Relative location of `key` in this range, as a percentage of its size.
    ///
    /// Keys below `start` or above `end` give values outside `[0, 100]`.
    /// A zero-size range cannot express a linear position: an exact match is
    /// `100.0`, anything else `0.0`.
    pub fn position_of(&self, key: &BigUint) -> f64 {
        let size = self.size();
        if size.is_zero() {
            return if key == &self.start { 100.0 } else { 0.0 };
        }
        let offset = BigInt::from(key.clone()) - BigInt::from(self.start.clone());
        let numerator = offset.to_f64().unwrap_or(f64::NAN);
        let denominator = size.to_f64().unwrap_or(f64::INFINITY);
        numerator / denominator * 100.0
    }

    /// `start + floor(size * percent / 100)`.
    pub fn key_at(&self, percent: f64) -> KeyspanResult<BigUint> {
        check_percent(percent)?;
        Ok(&self.start + scale_by_percent(&self.size(), percent))
    }

    /// A window of `width_percent` of this range's size on each side of
    /// `center`, clamped to this range.
    ///
    /// A `center` outside the range is first clamped to the nearest bound,
    /// so the result always satisfies `start <= window.start <= window.end <= end`.
    pub fn window(&self, center: &BigUint, width_percent: f64) -> KeyspanResult<Interval> {
        check_percent(width_percent)?;
        let radius = scale_by_percent(&self.size(), width_percent);
        let center = center.clone().clamp(self.start.clone(), self.end.clone());

        let low = if center >= &self.start + &radius {
            &center - &radius
        } else {
            self.start.clone()
        };
        let high = (&center + &radius).min(self.end.clone());
        Ok(Interval {
            start: low,
            end: high,
        })
    }
}

// ---------------------------------------------------------------------------
// Free-function surface
// ---------------------------------------------------------------------------

/// Parse case-insensitive hexadecimal text.
///
/// Surrounding whitespace and a leading `0x`/`0X` are accepted; anything else
/// that is not a hex digit (including empty input) is `MalformedHex`.
pub fn hex_to_int(text: &str) -> KeyspanResult<BigUint> {
    let trimmed = text.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(KeyspanError::MalformedHex(text.to_string()));
    }
    BigUint::parse_bytes(digits.as_bytes(), 16)
        .ok_or_else(|| KeyspanError::MalformedHex(text.to_string()))
}

/// Lowercase hex, zero-padded on the left to at least `min_width` characters.
pub fn int_to_hex(value: &BigUint, min_width: usize) -> String {
    format!("{:0>min_width$}", value.to_str_radix(16))
}

pub fn position_percent(key: &BigUint, start: &BigUint, end: &BigUint) -> KeyspanResult<f64> {
    Ok(Interval::new(start.clone(), end.clone())?.position_of(key))
}

pub fn key_at_percent(start: &BigUint, end: &BigUint, percent: f64) -> KeyspanResult<BigUint> {
    check_percent(percent)?;
    Interval::new(start.clone(), end.clone())?.key_at(percent)
}

pub fn search_window(
    start: &BigUint,
    end: &BigUint,
    center: &BigUint,
    width_percent: f64,
) -> KeyspanResult<Interval> {
    check_percent(width_percent)?;
    Interval::new(start.clone(), end.clone())?.window(center, width_percent)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn check_percent(percent: f64) -> KeyspanResult<()> {
    if (0.0..=100.0).contains(&percent) {
        Ok(())
    } else {
        Err(KeyspanError::InvalidPercentage(percent))
    }
}

/// `floor(value * percent / 100)`, computed from the exact binary value of
/// `percent`. Callers guarantee `percent` is finite and non-negative.
pub(crate) fn scale_by_percent(value: &BigUint, percent: f64) -> BigUint {
    if percent == 0.0 || value.is_zero() {
        return BigUint::zero();
    }
    let bits = percent.to_bits();
    let biased_exponent = ((bits >> 52) & 0x7ff) as i64;
    let fraction = bits & ((1u64 << 52) - 1);
    let (mantissa, exponent) = if biased_exponent == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1u64 << 52), biased_exponent - 1075)
    };

    let mut numerator = value * mantissa;
    let mut denominator = BigUint::from(100u32);
    if exponent >= 0 {
        numerator <<= exponent as usize;
    } else {
        denominator <<= (-exponent) as usize;
    }
    numerator / denominator
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn hex(text: &str) -> BigUint {
        hex_to_int(text).unwrap()
    }

    fn range(start: &str, end: &str) -> Interval {
        Interval::from_hex(start, end).unwrap()
    }

    #[test]
    fn test_hex_to_int_case_insensitive() {
        assert_eq!(hex("1FfFfFfF"), hex("1fffffff"));
        assert_eq!(hex("1fffffff"), BigUint::from(0x1fff_ffffu32));
    }

    #[test]
    fn test_hex_to_int_accepts_prefix_and_padding() {
        assert_eq!(hex("  0x17e2551e "), BigUint::from(0x17e2_551eu32));
        assert_eq!(
            hex("0000000000000000000000000000000000000000000000000000000017e2551e"),
            BigUint::from(0x17e2_551eu32)
        );
    }

    #[test]
    fn test_hex_to_int_rejects_garbage() {
        for bad in ["", "0x", "12g4", "-1", "1 2", "ff_ff"] {
            assert!(
                matches!(hex_to_int(bad), Err(KeyspanError::MalformedHex(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_int_to_hex_pads_without_truncating() {
        let value = BigUint::from(0x1764fu32);
        assert_eq!(int_to_hex(&value, 8), "0001764f");
        assert_eq!(int_to_hex(&value, 2), "1764f");
        assert_eq!(int_to_hex(&BigUint::zero(), 0), "0");
        assert_eq!(int_to_hex(&value, 64).len(), 64);
    }

    #[test]
    fn test_interval_rejects_inverted_bounds() {
        let err = Interval::from_hex("20", "10").unwrap_err();
        assert!(matches!(err, KeyspanError::InvalidRange { .. }));
    }

    #[test]
    fn test_position_of_puzzle_29() {
        let puzzle = range("10000000", "1fffffff");
        let position = puzzle.position_of(&hex("17e2551e"));
        assert!((position - 49.2757).abs() < 0.001, "got {position}");
    }

    #[test]
    fn test_position_of_zero_size_range() {
        let point = range("1", "1");
        assert_eq!(point.position_of(&hex("1")), 100.0);
        assert_eq!(point.position_of(&hex("2")), 0.0);
        assert_eq!(point.position_of(&hex("0")), 0.0);
    }

    #[test]
    fn test_position_of_key_outside_range() {
        let puzzle = range("10", "20");
        assert!(puzzle.position_of(&hex("8")) < 0.0);
        assert!(puzzle.position_of(&hex("30")) > 100.0);
    }

    #[test]
    fn test_position_of_256_bit_range() {
        let start = BigUint::from(1u8) << 255usize;
        let end = (BigUint::from(1u8) << 256usize) - 1u8;
        let middle = &start + ((&end - &start) >> 1usize);
        let position = Interval::new(start, end).unwrap().position_of(&middle);
        assert!((position - 50.0).abs() < 1e-9, "got {position}");
    }

    #[test]
    fn test_key_at_bounds() {
        let puzzle = range("20000", "3ffff");
        assert_eq!(puzzle.key_at(0.0).unwrap(), hex("20000"));
        assert_eq!(puzzle.key_at(100.0).unwrap(), hex("3ffff"));
    }

    #[test]
    fn test_key_at_truncates() {
        // size 10, 15% of 10 = 1.5 -> 1
        let small = Interval::new(BigUint::from(100u32), BigUint::from(110u32)).unwrap();
        assert_eq!(small.key_at(15.0).unwrap(), BigUint::from(101u32));
    }

    #[test]
    fn test_key_at_rejects_out_of_range_percent() {
        let puzzle = range("10", "20");
        for bad in [-0.1, 100.01, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                puzzle.key_at(bad),
                Err(KeyspanError::InvalidPercentage(_))
            ));
        }
    }

    #[test]
    fn test_key_at_percent_checks_percent_before_range() {
        let err = key_at_percent(&hex("20"), &hex("10"), 150.0).unwrap_err();
        assert!(matches!(err, KeyspanError::InvalidPercentage(_)));
    }

    #[test]
    fn test_scale_by_percent_is_exact_for_large_sizes() {
        // 2^200 * 50 / 100 == 2^199 exactly; an f64 product would round.
        let size = (BigUint::from(1u8) << 200usize) + 1u8;
        assert_eq!(scale_by_percent(&size, 50.0), BigUint::from(1u8) << 199usize);
    }

    #[test]
    fn test_window_is_clamped_to_range() {
        let puzzle = range("10000000", "1fffffff");
        let near_start = puzzle.window(&hex("10000001"), 1.0).unwrap();
        assert_eq!(near_start.start(), &hex("10000000"));
        let near_end = puzzle.window(&hex("1ffffffe"), 1.0).unwrap();
        assert_eq!(near_end.end(), &hex("1fffffff"));
    }

    #[test]
    fn test_window_centre_outside_range() {
        let puzzle = range("100", "200");
        let window = puzzle.window(&hex("5"), 10.0).unwrap();
        assert_eq!(window.start(), &hex("100"));
        assert!(window.start() <= window.end());
        assert!(window.end() <= &hex("200"));
    }

    #[test]
    fn test_search_window_rejects_bad_width() {
        let err = search_window(&hex("1"), &hex("ff"), &hex("10"), 101.0).unwrap_err();
        assert!(matches!(err, KeyspanError::InvalidPercentage(_)));
    }

    fn big(value: u128) -> BigUint {
        BigUint::from(value)
    }

    proptest! {
        #[test]
        fn prop_position_in_bounds_and_recoverable(
            start_high in any::<u128>(),
            start_low in any::<u128>(),
            size in 1u64..(1u64 << 40),
            offset_seed in any::<u64>(),
        ) {
            let start = (big(start_high) << 128usize) + big(start_low);
            let offset = offset_seed % (size + 1);
            let end = &start + size;
            let key = &start + offset;
            let puzzle = Interval::new(start, end).unwrap();

            let position = puzzle.position_of(&key);
            prop_assert!((0.0..=100.0).contains(&position));

            let recovered = BigInt::from(puzzle.key_at(position).unwrap());
            let drift = (recovered - BigInt::from(key)).magnitude().clone();
            prop_assert!(drift <= BigUint::from(1u8));
        }

        #[test]
        fn prop_zero_size_range_is_all_or_nothing(start in any::<u128>(), key in any::<u128>()) {
            let point = Interval::new(big(start), big(start)).unwrap();
            let expected = if key == start { 100.0 } else { 0.0 };
            prop_assert_eq!(point.position_of(&big(key)), expected);
        }

        #[test]
        fn prop_window_stays_inside_range(
            start in any::<u64>(),
            size in any::<u64>(),
            center in any::<u128>(),
            width in 0.0f64..=100.0,
        ) {
            let start = big(start as u128);
            let end = &start + size;
            let window = search_window(&start, &end, &big(center), width).unwrap();
            prop_assert!(&start <= window.start());
            prop_assert!(window.start() <= window.end());
            prop_assert!(window.end() <= &end);
        }

        #[test]
        fn prop_hex_round_trip(digits in prop::collection::vec(any::<u32>(), 0..10), width in 0usize..80) {
            let value = BigUint::new(digits);
            prop_assert_eq!(hex_to_int(&int_to_hex(&value, width)).unwrap(), value);
        }
    }
}
