use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::value_objects::ValueObjectError;

// Invoice Status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InvoiceStatus {
  Pending,
  Paid,
  Overdue,
  Canceled,
}

impl InvoiceStatus {
  pub const ALL: [InvoiceStatus; 4] = [
    InvoiceStatus::Pending,
    InvoiceStatus::Paid,
    InvoiceStatus::Overdue,
    InvoiceStatus::Canceled,
  ];

  /// Structural transition table. Ledger conditions (a PAID target needs a
  /// fully paid invoice, a fully paid invoice must stay PAID) are checked by
  /// the `Invoice` aggregate on top of this.
  pub fn can_transition_to(&self, new_status: InvoiceStatus) -> bool {
    match (self, new_status) {
      // Open invoices can move anywhere
      (InvoiceStatus::Pending | InvoiceStatus::Overdue, _) => true,
      // Paid only falls back to open when the ledger drops below the total
      (InvoiceStatus::Paid, InvoiceStatus::Canceled) => false,
      (InvoiceStatus::Paid, _) => true,
      // Canceled can be reopened, never paid directly
      (InvoiceStatus::Canceled, InvoiceStatus::Paid) => false,
      (InvoiceStatus::Canceled, _) => true,
    }
  }

  /// Pending and overdue are the same stored state seen at different dates.
  pub fn is_open(&self) -> bool {
    matches!(self, InvoiceStatus::Pending | InvoiceStatus::Overdue)
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      InvoiceStatus::Pending => "PENDING",
      InvoiceStatus::Paid => "PAID",
      InvoiceStatus::Overdue => "OVERDUE",
      InvoiceStatus::Canceled => "CANCELED",
    }
  }
}

impl fmt::Display for InvoiceStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for InvoiceStatus {
  type Err = ValueObjectError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_uppercase().as_str() {
      "PENDING" => Ok(InvoiceStatus::Pending),
      "PAID" => Ok(InvoiceStatus::Paid),
      "OVERDUE" => Ok(InvoiceStatus::Overdue),
      "CANCELED" | "CANCELLED" => Ok(InvoiceStatus::Canceled),
      _ => Err(ValueObjectError::InvalidStatus(format!(
        "Unknown invoice status: {}",
        s
      ))),
    }
  }
}

// Payment Method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentMethod {
  Card,
  Cash,
  Transfer,
  Check,
  Other,
}

impl PaymentMethod {
  pub fn as_str(&self) -> &'static str {
    match self {
      PaymentMethod::Card => "CARD",
      PaymentMethod::Cash => "CASH",
      PaymentMethod::Transfer => "TRANSFER",
      PaymentMethod::Check => "CHECK",
      PaymentMethod::Other => "OTHER",
    }
  }
}

impl FromStr for PaymentMethod {
  type Err = ValueObjectError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_uppercase().as_str() {
      "CARD" => Ok(PaymentMethod::Card),
      "CASH" => Ok(PaymentMethod::Cash),
      "TRANSFER" => Ok(PaymentMethod::Transfer),
      "CHECK" => Ok(PaymentMethod::Check),
      "OTHER" => Ok(PaymentMethod::Other),
      _ => Err(ValueObjectError::InvalidPaymentMethod(format!(
        "Unknown payment method: {}",
        s
      ))),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_invoice_status_transitions() {
    assert!(InvoiceStatus::Pending.can_transition_to(InvoiceStatus::Paid));
    assert!(InvoiceStatus::Pending.can_transition_to(InvoiceStatus::Canceled));
    assert!(InvoiceStatus::Overdue.can_transition_to(InvoiceStatus::Canceled));

    assert!(InvoiceStatus::Paid.can_transition_to(InvoiceStatus::Pending));
    assert!(InvoiceStatus::Paid.can_transition_to(InvoiceStatus::Overdue));
    assert!(!InvoiceStatus::Paid.can_transition_to(InvoiceStatus::Canceled));

    assert!(InvoiceStatus::Canceled.can_transition_to(InvoiceStatus::Pending));
    assert!(!InvoiceStatus::Canceled.can_transition_to(InvoiceStatus::Paid));
  }

  #[test]
  fn test_invoice_status_parsing() {
    assert_eq!(InvoiceStatus::from_str("paid").unwrap(), InvoiceStatus::Paid);
    assert_eq!(
      InvoiceStatus::from_str("CANCELLED").unwrap(),
      InvoiceStatus::Canceled
    );
    assert!(InvoiceStatus::from_str("draft").is_err());
    for status in InvoiceStatus::ALL {
      assert_eq!(InvoiceStatus::from_str(status.as_str()).unwrap(), status);
    }
  }

  #[test]
  fn test_invoice_status_serde() {
    assert_eq!(
      serde_json::to_string(&InvoiceStatus::Overdue).unwrap(),
      "\"OVERDUE\""
    );
  }

  #[test]
  fn test_payment_method() {
    assert_eq!(PaymentMethod::from_str("transfer").unwrap(), PaymentMethod::Transfer);
    assert_eq!(PaymentMethod::Check.as_str(), "CHECK");
    assert!(PaymentMethod::from_str("bitcoin").is_err());
  }
}
