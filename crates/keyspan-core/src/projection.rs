//! Theoretical key projection: where a key would sit in a range at a given
//! percentage, and the search window around it.

use num_bigint::{BigInt, BigUint};
use serde::Serialize;

use crate::errors::KeyspanResult;
use crate::interval::{hex_to_int, int_to_hex, Interval};
use crate::models::decimal;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RangeInfo {
    #[serde(serialize_with = "decimal::serialize")]
    pub start_dec: BigUint,
    #[serde(serialize_with = "decimal::serialize")]
    pub end_dec: BigUint,
    #[serde(serialize_with = "decimal::serialize")]
    pub size: BigUint,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TheoreticalKey {
    #[serde(serialize_with = "decimal::serialize")]
    pub decimal: BigUint,
    pub hex: String,
    pub hex_padded: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SearchWindow {
    #[serde(serialize_with = "decimal::serialize")]
    pub start_dec: BigUint,
    #[serde(serialize_with = "decimal::serialize")]
    pub end_dec: BigUint,
    #[serde(serialize_with = "decimal::serialize")]
    pub size: BigUint,
    pub start_hex: String,
    pub end_hex: String,
}

impl SearchWindow {
    fn interval(&self) -> KeyspanResult<Interval> {
        Interval::new(self.start_dec.clone(), self.end_dec.clone())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct KeyProjection {
    pub range_info: RangeInfo,
    pub theoretical_key: TheoreticalKey,
    pub search_range: SearchWindow,
}

/// Outcome of checking a known key against a projection.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct KeyVerification {
    pub in_window: bool,
    /// Position of the key inside the search window, when it falls there.
    pub position_in_window: Option<f64>,
    /// Absolute distance between the theoretical and the known key.
    #[serde(serialize_with = "decimal::serialize")]
    pub deviation: BigUint,
}

/// Project the key at `position_percent` of `[start_hex, end_hex]`, with a
/// search window of `window_percent` of the range size on each side.
pub fn project_key(
    start_hex: &str,
    end_hex: &str,
    position_percent: f64,
    window_percent: f64,
    key_width: usize,
) -> KeyspanResult<KeyProjection> {
    let range = Interval::from_hex(start_hex, end_hex)?;
    let theoretical = range.key_at(position_percent)?;
    let window = range.window(&theoretical, window_percent)?;

    Ok(KeyProjection {
        range_info: RangeInfo {
            start_dec: range.start().clone(),
            end_dec: range.end().clone(),
            size: range.size(),
        },
        theoretical_key: TheoreticalKey {
            hex: int_to_hex(&theoretical, 0),
            hex_padded: int_to_hex(&theoretical, key_width),
            decimal: theoretical,
        },
        search_range: SearchWindow {
            start_hex: int_to_hex(window.start(), 0),
            end_hex: int_to_hex(window.end(), 0),
            size: window.size(),
            start_dec: window.start().clone(),
            end_dec: window.end().clone(),
        },
    })
}

/// Check whether `key_hex` falls inside the projection's search window.
pub fn verify_known_key(
    projection: &KeyProjection,
    key_hex: &str,
) -> KeyspanResult<KeyVerification> {
    let key = hex_to_int(key_hex)?;
    let window = projection.search_range.interval()?;
    let in_window = window.contains(&key);
    let theoretical = BigInt::from(projection.theoretical_key.decimal.clone());
    let deviation = (theoretical - BigInt::from(key.clone())).magnitude().clone();

    Ok(KeyVerification {
        in_window,
        position_in_window: in_window.then(|| window.position_of(&key)),
        deviation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_KEY_WIDTH;
    use crate::errors::KeyspanError;

    fn project(position: f64) -> KeyProjection {
        project_key("10000000", "1fffffff", position, 1.0, DEFAULT_KEY_WIDTH).unwrap()
    }

    #[test]
    fn test_projection_of_puzzle_29() {
        let projection = project(49.28);
        let start = BigUint::from(0x1000_0000u32);
        let size = BigUint::from(0x0fff_ffffu32);

        let expected = &start + (&size * 4928u32) / 10_000u32;
        assert_eq!(projection.theoretical_key.decimal, expected);
        assert_eq!(projection.theoretical_key.decimal, BigUint::from(400_720_448u32));
        assert_eq!(projection.theoretical_key.hex, "17e28240");
        assert_eq!(projection.theoretical_key.hex_padded.len(), 64);

        let one_percent = &size / 100u32;
        assert_eq!(projection.search_range.start_dec, &expected - &one_percent);
        assert_eq!(projection.search_range.end_dec, &expected + &one_percent);
        assert_eq!(projection.range_info.size, size);
    }

    #[test]
    fn test_window_clamped_at_range_edges() {
        let low = project(0.0);
        assert_eq!(low.search_range.start_dec, low.range_info.start_dec);
        let high = project(100.0);
        assert_eq!(high.search_range.end_dec, high.range_info.end_dec);
    }

    #[test]
    fn test_projection_rejects_bad_position() {
        let err = project_key("10", "20", 120.0, 1.0, 64).unwrap_err();
        assert!(matches!(err, KeyspanError::InvalidPercentage(_)));
    }

    #[test]
    fn test_verify_known_key_inside_window() {
        let projection = project(49.28);
        let verification = verify_known_key(&projection, "0x17e2551e").unwrap();
        assert!(verification.in_window);
        let position = verification.position_in_window.unwrap();
        assert!((0.0..=100.0).contains(&position));
        assert_eq!(
            verification.deviation,
            BigUint::from(400_720_448u32 - 0x17e2_551eu32)
        );
    }

    #[test]
    fn test_verify_known_key_outside_window() {
        let projection = project(10.0);
        let verification = verify_known_key(&projection, "17e2551e").unwrap();
        assert!(!verification.in_window);
        assert_eq!(verification.position_in_window, None);
    }

    #[test]
    fn test_verify_rejects_malformed_key() {
        let projection = project(50.0);
        assert!(matches!(
            verify_known_key(&projection, "xyz"),
            Err(KeyspanError::MalformedHex(_))
        ));
    }
}
