use std::{
    fmt,
    ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign},
    str::FromStr,
};

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use serde::{Deserialize, Serialize};

/// Exact rational number used for every tableau entry.
///
/// Always stored in lowest terms with a positive denominator (the `Ratio`
/// invariant). Immutable value semantics: arithmetic produces new values.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct RationalValue(BigRational);

/// A rational literal that could not be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseRationalError {
    #[display(fmt = "empty rational literal")]
    Empty,
    #[display(fmt = "malformed rational literal")]
    Malformed,
    #[display(fmt = "rational literal has a zero denominator")]
    ZeroDenominator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display(fmt = "division by zero")]
pub struct DivisionByZero;

impl RationalValue {
    pub fn from_integer(n: i64) -> Self {
        Self(BigRational::from_integer(n.into()))
    }

    pub fn from_fraction(
        numer: impl Into<BigInt>,
        denom: impl Into<BigInt>,
    ) -> Result<Self, DivisionByZero> {
        let denom = denom.into();
        if denom.is_zero() {
            return Err(DivisionByZero);
        }
        Ok(Self(BigRational::new(numer.into(), denom)))
    }

    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Division that surfaces a zero divisor instead of panicking. The engine's
    /// own divisions are guarded by pivot selection, so this is for callers.
    pub fn checked_div(&self, rhs: &Self) -> Result<Self, DivisionByZero> {
        if rhs.0.is_zero() {
            return Err(DivisionByZero);
        }
        Ok(Self(&self.0 / &rhs.0))
    }

    pub fn numer(&self) -> &BigInt {
        self.0.numer()
    }

    pub fn denom(&self) -> &BigInt {
        self.0.denom()
    }

    pub fn into_inner(self) -> BigRational {
        self.0
    }

    /// Typeset form for the presentation layer: `-\frac{1}{2}`, integers as-is.
    pub fn to_latex(&self) -> String {
        if self.0.is_integer() {
            self.0.numer().to_string()
        } else if self.0.is_negative() {
            format!("-\\frac{{{}}}{{{}}}", -self.0.numer(), self.0.denom())
        } else {
            format!("\\frac{{{}}}{{{}}}", self.0.numer(), self.0.denom())
        }
    }
}

impl FromStr for RationalValue {
    type Err = ParseRationalError;

    /// Accepts integer (`"3"`), fraction (`"-1/2"`) and decimal (`"0.25"`)
    /// literals. Decimals become exact fractions over a power of ten; there is
    /// no floating-point intermediate.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseRationalError::Empty);
        }

        if let Some((numer, denom)) = s.split_once('/') {
            let numer: BigInt = numer
                .trim()
                .parse()
                .map_err(|_| ParseRationalError::Malformed)?;
            let denom: BigInt = denom
                .trim()
                .parse()
                .map_err(|_| ParseRationalError::Malformed)?;
            if denom.is_zero() {
                return Err(ParseRationalError::ZeroDenominator);
            }
            return Ok(Self(BigRational::new(numer, denom)));
        }

        if let Some(unsigned) = s.strip_prefix('-').or_else(|| s.strip_prefix('+')) {
            if let Some(value) = parse_decimal(unsigned)? {
                return Ok(if s.starts_with('-') { -value } else { value });
            }
        } else if let Some(value) = parse_decimal(s)? {
            return Ok(value);
        }

        let n: BigInt = s.parse().map_err(|_| ParseRationalError::Malformed)?;
        Ok(Self(BigRational::from_integer(n)))
    }
}

/// Parses an unsigned decimal literal (`"0.25"`, `".5"`, `"1."`) into an exact
/// fraction. Returns `Ok(None)` when the literal carries no decimal point.
fn parse_decimal(s: &str) -> Result<Option<RationalValue>, ParseRationalError> {
    let Some((int_part, frac_part)) = s.split_once('.') else {
        return Ok(None);
    };
    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(int_part) || !all_digits(frac_part) || (int_part.is_empty() && frac_part.is_empty())
    {
        return Err(ParseRationalError::Malformed);
    }
    let digits = format!("{int_part}{frac_part}");
    let numer: BigInt = digits.parse().map_err(|_| ParseRationalError::Malformed)?;
    let denom = BigInt::from(10u8).pow(frac_part.len() as u32);
    Ok(Some(RationalValue(BigRational::new(numer, denom))))
}

impl fmt::Display for RationalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for RationalValue {
    fn from(n: i64) -> Self {
        Self::from_integer(n)
    }
}

impl From<i32> for RationalValue {
    fn from(n: i32) -> Self {
        Self::from_integer(n.into())
    }
}

impl From<BigInt> for RationalValue {
    fn from(n: BigInt) -> Self {
        Self(BigRational::from_integer(n))
    }
}

impl From<BigRational> for RationalValue {
    fn from(ratio: BigRational) -> Self {
        Self(ratio)
    }
}

impl Zero for RationalValue {
    #[inline]
    fn zero() -> Self {
        Self(BigRational::zero())
    }

    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl One for RationalValue {
    #[inline]
    fn one() -> Self {
        Self(BigRational::one())
    }

    fn is_one(&self) -> bool {
        self.0.is_one()
    }
}

impl Add for RationalValue {
    type Output = RationalValue;

    fn add(self, rhs: Self) -> Self::Output {
        &self + &rhs
    }
}

impl Add for &RationalValue {
    type Output = RationalValue;

    fn add(self, rhs: Self) -> Self::Output {
        RationalValue(&self.0 + &rhs.0)
    }
}

impl AddAssign for RationalValue {
    fn add_assign(&mut self, rhs: Self) {
        *self += &rhs;
    }
}

impl AddAssign<&Self> for RationalValue {
    fn add_assign(&mut self, rhs: &Self) {
        self.0 += &rhs.0;
    }
}

impl Sub for RationalValue {
    type Output = RationalValue;

    fn sub(self, rhs: Self) -> Self::Output {
        &self - &rhs
    }
}

impl Sub for &RationalValue {
    type Output = RationalValue;

    fn sub(self, rhs: Self) -> Self::Output {
        RationalValue(&self.0 - &rhs.0)
    }
}

impl SubAssign for RationalValue {
    fn sub_assign(&mut self, rhs: Self) {
        *self -= &rhs;
    }
}

impl SubAssign<&Self> for RationalValue {
    fn sub_assign(&mut self, rhs: &Self) {
        self.0 -= &rhs.0;
    }
}

impl Mul for RationalValue {
    type Output = RationalValue;

    fn mul(self, rhs: Self) -> Self::Output {
        &self * &rhs
    }
}

impl Mul for &RationalValue {
    type Output = RationalValue;

    fn mul(self, rhs: Self) -> Self::Output {
        RationalValue(&self.0 * &rhs.0)
    }
}

impl MulAssign for RationalValue {
    fn mul_assign(&mut self, rhs: Self) {
        *self *= &rhs;
    }
}

impl MulAssign<&Self> for RationalValue {
    fn mul_assign(&mut self, rhs: &Self) {
        self.0 *= &rhs.0;
    }
}

impl Div for RationalValue {
    type Output = RationalValue;

    /// Panics on a zero divisor; use [`RationalValue::checked_div`] where the
    /// divisor is not already known to be nonzero.
    fn div(self, rhs: Self) -> Self::Output {
        &self / &rhs
    }
}

impl Div for &RationalValue {
    type Output = RationalValue;

    fn div(self, rhs: Self) -> Self::Output {
        RationalValue(&self.0 / &rhs.0)
    }
}

impl DivAssign for RationalValue {
    fn div_assign(&mut self, rhs: Self) {
        *self /= &rhs;
    }
}

impl DivAssign<&Self> for RationalValue {
    fn div_assign(&mut self, rhs: &Self) {
        self.0 /= &rhs.0;
    }
}

impl Neg for RationalValue {
    type Output = RationalValue;

    fn neg(self) -> Self::Output {
        RationalValue(-self.0)
    }
}

impl Neg for &RationalValue {
    type Output = RationalValue;

    fn neg(self) -> Self::Output {
        RationalValue(-&self.0)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::{assert_eq, assert_str_eq};
    use proptest::prelude::*;

    use super::*;

    fn rat(s: &str) -> RationalValue {
        s.parse().unwrap()
    }

    #[test]
    fn parses_integers_and_fractions() {
        assert_eq!(rat("3"), RationalValue::from_integer(3));
        assert_eq!(rat("-7"), RationalValue::from_integer(-7));
        assert_eq!(rat("-1/2"), RationalValue::from_fraction(-1, 2).unwrap());
        assert_eq!(rat(" 3 / 9 "), RationalValue::from_fraction(1, 3).unwrap());
    }

    #[test]
    fn parses_decimals_exactly() {
        assert_eq!(rat("-0.5"), RationalValue::from_fraction(-1, 2).unwrap());
        assert_eq!(rat("0.25"), RationalValue::from_fraction(1, 4).unwrap());
        assert_eq!(rat("1.20"), RationalValue::from_fraction(6, 5).unwrap());
        assert_eq!(rat(".5"), RationalValue::from_fraction(1, 2).unwrap());
        assert_eq!(rat("2."), RationalValue::from_integer(2));
        assert_eq!(rat("+0.75"), RationalValue::from_fraction(3, 4).unwrap());
    }

    #[test]
    fn rejects_malformed_literals() {
        assert_eq!("".parse::<RationalValue>(), Err(ParseRationalError::Empty));
        assert_eq!(
            "abc".parse::<RationalValue>(),
            Err(ParseRationalError::Malformed)
        );
        assert_eq!(
            "1.2.3".parse::<RationalValue>(),
            Err(ParseRationalError::Malformed)
        );
        assert_eq!(
            ".".parse::<RationalValue>(),
            Err(ParseRationalError::Malformed)
        );
        assert_eq!(
            "1e3".parse::<RationalValue>(),
            Err(ParseRationalError::Malformed)
        );
        assert_eq!(
            "1/0".parse::<RationalValue>(),
            Err(ParseRationalError::ZeroDenominator)
        );
    }

    #[test]
    fn display_is_the_plain_fraction_form() {
        assert_str_eq!(rat("-1/2").to_string(), "-1/2");
        assert_str_eq!(rat("4/2").to_string(), "2");
        assert_str_eq!(rat("0.75").to_string(), "3/4");
    }

    #[test]
    fn latex_form() {
        assert_str_eq!(rat("-1/2").to_latex(), "-\\frac{1}{2}");
        assert_str_eq!(rat("1/4").to_latex(), "\\frac{1}{4}");
        assert_str_eq!(rat("-3").to_latex(), "-3");
        assert_str_eq!(rat("0").to_latex(), "0");
    }

    #[test]
    fn absolute_value_and_negation() {
        assert_eq!(rat("-1/2").abs(), rat("1/2"));
        assert_eq!(rat("1/2").abs(), rat("1/2"));
        assert_eq!(-rat("3"), RationalValue::from(-3i64));
    }

    #[test]
    fn ordering_is_exact() {
        assert!(rat("1/3") < rat("34/100"));
        assert!(rat("-1/2") < rat("-1/3"));
        assert_eq!(rat("2/4"), rat("1/2"));
    }

    #[test]
    fn checked_div_surfaces_zero_divisor() {
        assert_eq!(
            rat("1").checked_div(&RationalValue::zero()),
            Err(DivisionByZero)
        );
        assert_eq!(rat("1").checked_div(&rat("1/2")), Ok(rat("2")));
    }

    fn rational() -> impl Strategy<Value = RationalValue> {
        (-1_000i64..1_000, 1i64..1_000)
            .prop_map(|(numer, denom)| RationalValue::from_fraction(numer, denom).unwrap())
    }

    proptest! {
        #[test]
        fn addition_commutes(a in rational(), b in rational()) {
            prop_assert_eq!(&a + &b, &b + &a);
        }

        #[test]
        fn multiplication_commutes(a in rational(), b in rational()) {
            prop_assert_eq!(&a * &b, &b * &a);
        }

        #[test]
        fn addition_associates(a in rational(), b in rational(), c in rational()) {
            prop_assert_eq!(&(&a + &b) + &c, &a + &(&b + &c));
        }

        #[test]
        fn multiplication_associates(a in rational(), b in rational(), c in rational()) {
            prop_assert_eq!(&(&a * &b) * &c, &a * &(&b * &c));
        }

        #[test]
        fn division_inverts_multiplication(a in rational(), b in rational()) {
            prop_assume!(!b.is_zero());
            prop_assert_eq!(&(&a / &b) * &b, a);
        }

        #[test]
        fn display_round_trips(a in rational()) {
            prop_assert_eq!(a.to_string().parse::<RationalValue>().unwrap(), a);
        }
    }
}
