//! Full-precision fixed-point rate math.
//!
//! A rate is an output/input ratio scaled by [`RATE_SCALE`] (10^36). Both
//! operations multiply before dividing, and the product of two 256-bit
//! operands does not fit 256 bits, so the intermediate is carried in 512
//! bits. Results are always the exact floor of the rational value; the only
//! failure is a final quotient that does not fit 256 bits.

use alloy_primitives::{uint, U256, U512};
use thiserror::Error;

/// Fixed-point scale of a rate: 10^36 represents 1.0.
pub const RATE_SCALE: U256 = uint!(1000000000000000000000000000000000000_U256);

/// Errors that can occur during rate arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RateError {
	/// The exact result does not fit 256 bits.
	#[error("Rate arithmetic overflow")]
	Overflow,
}

/// Computes the rate `floor(output * 10^36 / input)`.
///
/// A zero input yields the "undefined" rate 0 instead of a division error.
pub fn calc_rate(input: U256, output: U256) -> Result<U256, RateError> {
	if input.is_zero() {
		return Ok(U256::ZERO);
	}
	mul_div(output, RATE_SCALE, input)
}

/// Applies a rate to an amount: `floor(input * rate / 10^36)`.
pub fn apply_rate(input: U256, rate: U256) -> Result<U256, RateError> {
	if input.is_zero() || rate.is_zero() {
		return Ok(U256::ZERO);
	}
	mul_div(input, rate, RATE_SCALE)
}

/// `floor(a * b / denominator)` with a 512-bit intermediate product.
///
/// `denominator` must be non-zero; both callers guarantee it.
fn mul_div(a: U256, b: U256, denominator: U256) -> Result<U256, RateError> {
	// 256 x 256 bits always fits 512, so the multiplication cannot wrap.
	let product = widen(a) * widen(b);
	let quotient = product / widen(denominator);
	narrow(quotient).ok_or(RateError::Overflow)
}

fn widen(value: U256) -> U512 {
	let limbs = value.as_limbs();
	U512::from_limbs([limbs[0], limbs[1], limbs[2], limbs[3], 0, 0, 0, 0])
}

fn narrow(value: U512) -> Option<U256> {
	let limbs = value.as_limbs();
	if limbs[4..].iter().any(|&limb| limb != 0) {
		return None;
	}
	Some(U256::from_limbs([limbs[0], limbs[1], limbs[2], limbs[3]]))
}

#[cfg(test)]
mod tests {
	use super::*;

	fn n(value: &str) -> U256 {
		value.parse().unwrap()
	}

	const HUGE_178: &str = "333222681494555123841157212873451652317831239041736123";
	const HUGE_150: &str = "942333789111012345888800555777000814765505999";

	#[test]
	fn test_scale_is_ten_to_the_36() {
		assert_eq!(RATE_SCALE, U256::from(10u64).pow(U256::from(36u64)));
	}

	#[test]
	fn test_calc_rate_simple_ratios() {
		assert_eq!(calc_rate(n("1"), n("1")), Ok(RATE_SCALE));
		assert_eq!(
			calc_rate(n("5"), n("4")),
			Ok(n("800000000000000000000000000000000000"))
		);
		assert_eq!(
			calc_rate(n("4"), n("5")),
			Ok(n("1250000000000000000000000000000000000"))
		);
	}

	#[test]
	fn test_calc_rate_zero_operands() {
		assert_eq!(calc_rate(n("1"), U256::ZERO), Ok(U256::ZERO));
		assert_eq!(calc_rate(U256::ZERO, n("1")), Ok(U256::ZERO));
		assert_eq!(calc_rate(U256::ZERO, U256::ZERO), Ok(U256::ZERO));
		assert_eq!(calc_rate(U256::ZERO, U256::MAX), Ok(U256::ZERO));
		assert_eq!(calc_rate(U256::MAX, U256::ZERO), Ok(U256::ZERO));
	}

	#[test]
	fn test_calc_rate_huge_operands() {
		assert_eq!(
			calc_rate(n(HUGE_178), n(HUGE_150)),
			Ok(n("2827940117654956598787394054"))
		);
		assert_eq!(
			calc_rate(n(HUGE_150), n(HUGE_178)),
			Ok(n("353614276963276304014279451446318987918664599"))
		);
	}

	#[test]
	fn test_calc_rate_overflow_is_reported() {
		// MAX * 10^36 / 1 cannot fit 256 bits.
		assert_eq!(calc_rate(n("1"), U256::MAX), Err(RateError::Overflow));
	}

	#[test]
	fn test_apply_rate_zero_operands() {
		assert_eq!(apply_rate(U256::ZERO, U256::ZERO), Ok(U256::ZERO));
		assert_eq!(apply_rate(n("1"), U256::ZERO), Ok(U256::ZERO));
		assert_eq!(apply_rate(U256::ZERO, RATE_SCALE), Ok(U256::ZERO));
		assert_eq!(apply_rate(U256::MAX, U256::ZERO), Ok(U256::ZERO));
	}

	#[test]
	fn test_apply_rate_rounds_down() {
		assert_eq!(apply_rate(n("1"), RATE_SCALE), Ok(n("1")));
		assert_eq!(
			apply_rate(n("1000"), n("888888888000000000000000000000000000")),
			Ok(n("888"))
		);
		assert_eq!(
			apply_rate(n("1000"), n("2694232211378200000000000000000000000")),
			Ok(n("2694"))
		);
	}

	#[test]
	fn test_apply_rate_huge_input() {
		assert_eq!(
			apply_rate(n(HUGE_178), n("888888888000000000000000000000000000")),
			Ok(n("296197938810073282085868523584261723950559632643471007"))
		);
		assert_eq!(
			apply_rate(n(HUGE_178), n("2694232211378200000000000000000000000")),
			Ok(n("897779282044448853909180558275362966334613148794890010"))
		);
	}

	#[test]
	fn test_apply_rate_keeps_full_precision_product() {
		// The intermediate product is 367 bits wide.
		assert_eq!(
			apply_rate(
				n(HUGE_178),
				n("505777814765505999942333789111012345888800555120398476114")
			),
			Ok(n(
				"168536639676618305439835003564556949195417068861362688570225222991215790055"
			))
		);
	}

	#[test]
	fn test_apply_rate_overflow_is_reported() {
		assert_eq!(apply_rate(U256::MAX, U256::MAX), Err(RateError::Overflow));
	}

	#[test]
	fn test_apply_calc_round_trip() {
		// Exact when the ratio is representable.
		let rate = calc_rate(n("400000"), n("800000")).unwrap();
		assert_eq!(apply_rate(n("400000"), rate), Ok(n("800000")));
		assert_eq!(apply_rate(n("500000"), rate), Ok(n("1000000")));

		// Otherwise the exact floor of input * floor(output * 10^36 / input) / 10^36.
		let rate = calc_rate(n("3"), n("1")).unwrap();
		assert_eq!(rate, n("333333333333333333333333333333333333"));
		assert_eq!(apply_rate(n("3"), rate), Ok(U256::ZERO));
		assert_eq!(apply_rate(n("6"), rate), Ok(n("1")));
	}
}
