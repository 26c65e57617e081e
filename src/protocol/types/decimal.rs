//! Exact decimal values.
//!
//! Firebolt DECIMAL columns carry up to 38 significant digits. `Decimal`
//! wraps a [`BigDecimal`] so the wire digits and scale are kept as sent:
//! `value = coefficient * 10^exponent`. Nothing is ever routed through a
//! binary float.
//!
//! `Decimal` and `NullDecimal` expose a decompose/compose pair so callers can
//! marshal them into binary formats without knowing the representation.

use bigdecimal::num_bigint::{BigInt, Sign};
use bigdecimal::{BigDecimal, Signed, ToPrimitive, Zero};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Integer digits of `i64::MAX`.
const I64_DIGITS: i64 = 19;

/// Form of a decomposed decimal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum DecimalForm {
    /// Finite value.
    Finite = 0,
    /// Infinity.
    Infinite = 1,
    /// NaN. Used by `NullDecimal` for SQL NULL.
    NaN = 2,
}

impl TryFrom<u8> for DecimalForm {
    type Error = Error;

    fn try_from(form: u8) -> Result<Self> {
        match form {
            0 => Ok(DecimalForm::Finite),
            1 => Ok(DecimalForm::Infinite),
            2 => Ok(DecimalForm::NaN),
            _ => Err(Error::invalid_decimal(format!("unknown form {}", form))),
        }
    }
}

/// Binary parts of a decimal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decomposed {
    /// Value form.
    pub form: DecimalForm,
    /// Sign of the coefficient.
    pub negative: bool,
    /// Coefficient magnitude, big-endian.
    pub coefficient: Vec<u8>,
    /// Base-10 exponent.
    pub exponent: i32,
}

/// Decompose/compose pair for decimal types.
pub trait DecimalCompose: Sized {
    /// Split the value into its binary parts.
    ///
    /// The coefficient is written into `buf` when its capacity is large
    /// enough; otherwise a new vector is allocated. Either way the returned
    /// `Decomposed` owns the coefficient bytes.
    fn decompose(&self, buf: Vec<u8>) -> Decomposed;

    /// Rebuild a value from parts produced by [`decompose`](Self::decompose).
    fn compose(
        form: DecimalForm,
        negative: bool,
        coefficient: &[u8],
        exponent: i32,
    ) -> Result<Self>;
}

/// Exact decimal: `coefficient * 10^exponent`.
///
/// Equality is numeric, so `1.0 == 1.00`; `scale()` still reports the
/// digits the value was built with.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Decimal(BigDecimal);

impl Decimal {
    /// Create a decimal from coefficient and exponent.
    pub fn new(coefficient: impl Into<BigInt>, exponent: i32) -> Self {
        Self(BigDecimal::new(coefficient.into(), -i64::from(exponent)))
    }

    /// Coefficient (unscaled value).
    pub fn coefficient(&self) -> BigInt {
        self.0.as_bigint_and_scale().0.into_owned()
    }

    /// Base-10 exponent.
    pub fn exponent(&self) -> i32 {
        // Only `From<BigDecimal>` can carry a wider scale; it saturates here.
        i32::try_from(-self.raw_scale()).unwrap_or(i32::MIN)
    }

    fn raw_scale(&self) -> i64 {
        self.0.as_bigint_and_scale().1
    }

    /// Number of digits after the decimal point (0 for non-negative exponents).
    pub fn scale(&self) -> u32 {
        u32::try_from(self.raw_scale().max(0)).unwrap_or(u32::MAX)
    }

    /// Digits left of the decimal point, 0 when the magnitude is below one.
    pub fn integer_digits(&self) -> u64 {
        if self.is_zero() {
            return 0;
        }
        let digits = i64::try_from(self.0.digits()).unwrap_or(i64::MAX);
        u64::try_from(digits.saturating_sub(self.raw_scale())).unwrap_or(0)
    }

    /// Whether the value fits a DECIMAL column of `precision` digits, both
    /// left and right of the decimal point.
    pub fn fits_precision(&self, precision: u32) -> bool {
        self.integer_digits() <= u64::from(precision) && self.scale() <= precision
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_negative()
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// The underlying big decimal.
    pub fn as_big_decimal(&self) -> &BigDecimal {
        &self.0
    }

    /// Lossy conversion to `f64`.
    pub fn to_f64(&self) -> Option<f64> {
        self.0.to_f64()
    }

    /// Convert to `i64` when the value is integral and fits.
    ///
    /// The magnitude is checked from the digit count first, so a huge
    /// exponent answers `None` without expanding the value.
    pub fn to_i64(&self) -> Option<i64> {
        if self.is_zero() {
            return Some(0);
        }
        let digits = i64::try_from(self.0.digits()).ok()?;
        let scale = self.raw_scale();
        if digits.saturating_sub(scale) > I64_DIGITS || scale >= digits {
            return None;
        }
        if scale > 0 && !self.0.is_integer() {
            return None;
        }
        self.0.to_i64()
    }
}

impl From<BigDecimal> for Decimal {
    fn from(value: BigDecimal) -> Self {
        Self(value)
    }
}

fn parse_error(text: &str) -> Error {
    Error::decode("decimal", format!("'{}'", text))
}

fn is_numeric_byte(b: u8) -> bool {
    b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E')
}

impl FromStr for Decimal {
    type Err = Error;

    /// Parse `[+-]digits[.digits][(e|E)[+-]digits]`.
    fn from_str(text: &str) -> Result<Self> {
        if !text.bytes().all(is_numeric_byte) {
            return Err(parse_error(text));
        }
        let value = BigDecimal::from_str(text).map_err(|_| parse_error(text))?;
        let (_, scale) = value.as_bigint_and_scale();
        if i32::try_from(scale).is_err() || scale == i64::from(i32::MIN) {
            return Err(parse_error(text));
        }
        Ok(Self(value))
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Copy `bytes` into `buf` when it has room, else hand back `bytes` itself.
fn reuse_buffer(mut buf: Vec<u8>, bytes: Vec<u8>) -> Vec<u8> {
    if buf.capacity() >= bytes.len() {
        buf.clear();
        buf.extend_from_slice(&bytes);
        buf
    } else {
        bytes
    }
}

impl DecimalCompose for Decimal {
    fn decompose(&self, buf: Vec<u8>) -> Decomposed {
        let (coefficient, _) = self.0.as_bigint_and_scale();
        let bytes = if self.is_zero() {
            Vec::new()
        } else {
            coefficient.magnitude().to_bytes_be()
        };
        Decomposed {
            form: DecimalForm::Finite,
            negative: self.is_negative(),
            coefficient: reuse_buffer(buf, bytes),
            exponent: self.exponent(),
        }
    }

    fn compose(
        form: DecimalForm,
        negative: bool,
        coefficient: &[u8],
        exponent: i32,
    ) -> Result<Self> {
        match form {
            DecimalForm::Finite => {
                let sign = if negative { Sign::Minus } else { Sign::Plus };
                Ok(Self::new(BigInt::from_bytes_be(sign, coefficient), exponent))
            }
            DecimalForm::Infinite => Err(Error::invalid_decimal("infinity is not representable")),
            DecimalForm::NaN => Err(Error::invalid_decimal("NaN is not representable")),
        }
    }
}

/// Decimal for nullable columns; `None` is SQL NULL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct NullDecimal(pub Option<Decimal>);

impl NullDecimal {
    pub fn is_null(&self) -> bool {
        self.0.is_none()
    }
}

impl From<Decimal> for NullDecimal {
    fn from(decimal: Decimal) -> Self {
        Self(Some(decimal))
    }
}

impl DecimalCompose for NullDecimal {
    fn decompose(&self, buf: Vec<u8>) -> Decomposed {
        match &self.0 {
            Some(decimal) => decimal.decompose(buf),
            None => Decomposed {
                form: DecimalForm::NaN,
                negative: false,
                coefficient: reuse_buffer(buf, Vec::new()),
                exponent: 0,
            },
        }
    }

    fn compose(
        form: DecimalForm,
        negative: bool,
        coefficient: &[u8],
        exponent: i32,
    ) -> Result<Self> {
        match form {
            DecimalForm::NaN => Ok(Self(None)),
            _ => Decimal::compose(form, negative, coefficient, exponent).map(|d| Self(Some(d))),
        }
    }
}
