use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::value_objects::{Money, ValueObjectError};

// Quote Status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QuoteStatus {
  Draft,
  Sent,
  Accepted,
  Rejected,
  Converted,
}

impl QuoteStatus {
  /// Transitions reachable through an update. CONVERTED is only entered
  /// by converting the quote and is terminal.
  pub fn can_transition_to(&self, new_status: QuoteStatus) -> bool {
    if *self == new_status {
      return *self != QuoteStatus::Converted;
    }
    matches!(
      (self, new_status),
      (
        QuoteStatus::Draft,
        QuoteStatus::Sent | QuoteStatus::Accepted | QuoteStatus::Rejected
      ) | (QuoteStatus::Sent, QuoteStatus::Accepted | QuoteStatus::Rejected)
    )
  }

  pub fn is_terminal(&self) -> bool {
    matches!(self, QuoteStatus::Converted)
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      QuoteStatus::Draft => "DRAFT",
      QuoteStatus::Sent => "SENT",
      QuoteStatus::Accepted => "ACCEPTED",
      QuoteStatus::Rejected => "REJECTED",
      QuoteStatus::Converted => "CONVERTED",
    }
  }
}

impl fmt::Display for QuoteStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for QuoteStatus {
  type Err = ValueObjectError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_uppercase().as_str() {
      "DRAFT" => Ok(QuoteStatus::Draft),
      "SENT" => Ok(QuoteStatus::Sent),
      "ACCEPTED" => Ok(QuoteStatus::Accepted),
      "REJECTED" => Ok(QuoteStatus::Rejected),
      "CONVERTED" => Ok(QuoteStatus::Converted),
      _ => Err(ValueObjectError::InvalidStatus(format!(
        "Unknown quote status: {}",
        s
      ))),
    }
  }
}

/// Quote-level discount, serialized as `{"type": "percentage", "value": 10}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Discount {
  Percentage(Decimal),
  Fixed(Money),
}

impl Discount {
  pub fn percentage(value: Decimal) -> Result<Self, ValueObjectError> {
    if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
      return Err(ValueObjectError::InvalidDiscount(
        "Percentage discount must be between 0 and 100".to_string(),
      ));
    }
    if value.normalize().scale() > 2 {
      return Err(ValueObjectError::InvalidDiscount(
        "Percentage discount cannot have more than 2 decimal places".to_string(),
      ));
    }
    Ok(Discount::Percentage(value))
  }

  pub fn fixed(value: Decimal) -> Result<Self, ValueObjectError> {
    Money::new(value)
      .map(Discount::Fixed)
      .map_err(|e| ValueObjectError::InvalidDiscount(e.to_string()))
  }

  /// Parses the stored `(type, value)` column pair.
  pub fn from_parts(kind: &str, value: Decimal) -> Result<Self, ValueObjectError> {
    match kind {
      "percentage" => Self::percentage(value),
      "fixed" => Self::fixed(value),
      other => Err(ValueObjectError::InvalidDiscount(format!(
        "Unknown discount type: {}",
        other
      ))),
    }
  }

  pub fn kind(&self) -> &'static str {
    match self {
      Discount::Percentage(_) => "percentage",
      Discount::Fixed(_) => "fixed",
    }
  }

  pub fn value(&self) -> Decimal {
    match self {
      Discount::Percentage(p) => *p,
      Discount::Fixed(m) => m.amount(),
    }
  }

  /// Discount applied to `subtotal`. Not capped: a fixed discount larger
  /// than the quote yields a negative total.
  pub fn amount(&self, subtotal: Money) -> Money {
    match self {
      Discount::Percentage(p) => subtotal.percentage(*p),
      Discount::Fixed(m) => *m,
    }
  }
}
