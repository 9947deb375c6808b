use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueObjectError {
  #[error("Invalid amount: {0}")]
  InvalidAmount(String),
  #[error("Invalid quantity: {0}")]
  InvalidQuantity(String),
  #[error("Invalid tax rate: {0}")]
  InvalidTaxRate(String),
  #[error("Invalid name: {0}")]
  InvalidName(String),
  #[error("Invalid email: {0}")]
  InvalidEmail(String),
  #[error("Invalid status: {0}")]
  InvalidStatus(String),
  #[error("Invalid payment method: {0}")]
  InvalidPaymentMethod(String),
  #[error("Invalid discount: {0}")]
  InvalidDiscount(String),
  #[error("Invalid template content: {0}")]
  InvalidTemplateContent(String),
}

/// Number of decimal places every stored amount is rounded to.
pub const MONEY_SCALE: u32 = 2;

fn round_to_cents(value: Decimal) -> Decimal {
  value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

// Exclusive magnitude bounds matching the NUMERIC(19, 2) and NUMERIC(19, 4) columns
fn amount_limit() -> Decimal {
  Decimal::from(100_000_000_000_000_000_i64)
}

fn quantity_limit() -> Decimal {
  Decimal::from(1_000_000_000_000_000_i64)
}

fn out_of_range() -> ValueObjectError {
  ValueObjectError::InvalidAmount("Amount exceeds the supported range".to_string())
}

// Money - signed currency amount, always held at cent precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
  pub const ZERO: Money = Money(Decimal::ZERO);

  /// Validated non-negative amount with at most two decimal places.
  pub fn new(amount: Decimal) -> Result<Self, ValueObjectError> {
    if amount.is_sign_negative() && !amount.is_zero() {
      return Err(ValueObjectError::InvalidAmount(
        "Amount cannot be negative".to_string(),
      ));
    }
    if amount.normalize().scale() > MONEY_SCALE {
      return Err(ValueObjectError::InvalidAmount(
        "Amount cannot have more than 2 decimal places".to_string(),
      ));
    }
    Self(amount).ensure_in_range()
  }

  /// Validated strictly positive amount (prices, payments).
  pub fn positive(amount: Decimal) -> Result<Self, ValueObjectError> {
    if amount <= Decimal::ZERO {
      return Err(ValueObjectError::InvalidAmount(
        "Amount must be greater than zero".to_string(),
      ));
    }
    Self::new(amount)
  }

  /// Wraps a computed value, rounding it to cents. Sign is preserved.
  pub fn from_decimal(amount: Decimal) -> Self {
    Self(round_to_cents(amount))
  }

  pub fn amount(&self) -> Decimal {
    self.0
  }

  /// `self * factor`, rounded to cents. Fails instead of overflowing.
  pub fn multiply(&self, factor: Decimal) -> Result<Money, ValueObjectError> {
    self
      .0
      .checked_mul(factor)
      .map(Money::from_decimal)
      .ok_or_else(out_of_range)?
      .ensure_in_range()
  }

  /// `self * rate / 100`, rounded to cents. Rates are at most 100, so a
  /// ranged amount cannot overflow here.
  pub fn percentage(&self, rate: Decimal) -> Money {
    Money::from_decimal(self.0.saturating_mul(rate) / Decimal::ONE_HUNDRED)
  }

  pub fn checked_add(self, rhs: Money) -> Result<Money, ValueObjectError> {
    self
      .0
      .checked_add(rhs.0)
      .map(Money)
      .ok_or_else(out_of_range)?
      .ensure_in_range()
  }

  /// Rejects amounts too large to be stored.
  pub fn ensure_in_range(self) -> Result<Money, ValueObjectError> {
    if self.0.abs() >= amount_limit() {
      return Err(out_of_range());
    }
    Ok(self)
  }

  pub fn is_zero(&self) -> bool {
    self.0.is_zero()
  }

  pub fn is_negative(&self) -> bool {
    self.0 < Decimal::ZERO
  }
}

impl Add for Money {
  type Output = Money;

  fn add(self, rhs: Money) -> Money {
    Money(self.0.saturating_add(rhs.0))
  }
}

impl AddAssign for Money {
  fn add_assign(&mut self, rhs: Money) {
    self.0 = self.0.saturating_add(rhs.0);
  }
}

impl Sub for Money {
  type Output = Money;

  fn sub(self, rhs: Money) -> Money {
    Money(self.0.saturating_sub(rhs.0))
  }
}

// Saturating sums over ranged amounts; callers that need a hard failure use
// the `Result` sum below.
impl Sum for Money {
  fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
    iter.fold(Money::ZERO, |acc, m| acc + m)
  }
}

impl<'a> Sum<&'a Money> for Money {
  fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
    iter.fold(Money::ZERO, |acc, m| acc + *m)
  }
}

impl Sum<Money> for Result<Money, ValueObjectError> {
  fn sum<I: Iterator<Item = Money>>(mut iter: I) -> Self {
    iter.try_fold(Money::ZERO, Money::checked_add)
  }
}

impl fmt::Display for Money {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:.2}", self.0)
  }
}

// Quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(Decimal);

impl Quantity {
  pub fn new(value: Decimal) -> Result<Self, ValueObjectError> {
    if value <= Decimal::ZERO {
      return Err(ValueObjectError::InvalidQuantity(
        "Quantity must be positive".to_string(),
      ));
    }
    // Max 4 decimal places
    if value.normalize().scale() > 4 {
      return Err(ValueObjectError::InvalidQuantity(
        "Quantity cannot have more than 4 decimal places".to_string(),
      ));
    }
    if value >= quantity_limit() {
      return Err(ValueObjectError::InvalidQuantity(
        "Quantity exceeds the supported range".to_string(),
      ));
    }
    Ok(Self(value))
  }

  pub fn value(&self) -> Decimal {
    self.0
  }
}

// Tax rate in percent, used for the invoice VAT rate and per-line quote taxes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaxRate(Decimal);

impl TaxRate {
  pub fn new(value: Decimal) -> Result<Self, ValueObjectError> {
    if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
      return Err(ValueObjectError::InvalidTaxRate(
        "Tax rate must be between 0 and 100".to_string(),
      ));
    }
    // Max 2 decimal places
    if value.normalize().scale() > 2 {
      return Err(ValueObjectError::InvalidTaxRate(
        "Tax rate cannot have more than 2 decimal places".to_string(),
      ));
    }
    Ok(Self(value))
  }

  /// The document-level VAT rate applied when a request does not name one.
  pub fn standard() -> Self {
    Self(Decimal::from(20))
  }

  pub fn value(&self) -> Decimal {
    self.0
  }

  /// Tax owed on `base`, rounded to cents.
  pub fn apply_to(&self, base: Money) -> Money {
    base.percentage(self.0)
  }
}

impl Default for TaxRate {
  fn default() -> Self {
    Self::standard()
  }
}

/// Trims a required free-text field and enforces a maximum length.
pub fn required_text(value: String, field: &str, max_len: usize) -> Result<String, ValueObjectError> {
  let trimmed = value.trim();
  if trimmed.is_empty() {
    return Err(ValueObjectError::InvalidName(format!(
      "{} cannot be empty",
      field
    )));
  }
  if trimmed.chars().count() > max_len {
    return Err(ValueObjectError::InvalidName(format!(
      "{} cannot exceed {} characters",
      field, max_len
    )));
  }
  Ok(trimmed.to_string())
}

/// Trims an optional free-text field, mapping blank input to `None`.
pub fn optional_text(value: Option<String>) -> Option<String> {
  value
    .map(|v| v.trim().to_string())
    .filter(|v| !v.is_empty())
}
