use serde::{Deserialize, Serialize};
use std::fmt;
use validator::ValidateEmail;

use crate::domain::value_objects::{ValueObjectError, optional_text, required_text};

// Client Name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientName(String);

impl ClientName {
  pub fn new(value: String) -> Result<Self, ValueObjectError> {
    required_text(value, "Client name", 255).map(Self)
  }

  pub fn value(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Display for ClientName {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// Email
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
  pub fn new(value: impl Into<String>) -> Result<Self, ValueObjectError> {
    let value = value.into();
    let trimmed = value.trim();

    if !trimmed.validate_email() {
      return Err(ValueObjectError::InvalidEmail(value));
    }

    // Normalize to lowercase
    Ok(Self(trimmed.to_lowercase()))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

// Product Name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductName(String);

impl ProductName {
  pub fn new(value: String) -> Result<Self, ValueObjectError> {
    required_text(value, "Product name", 255).map(Self)
  }

  pub fn value(&self) -> &str {
    &self.0
  }
}

// Client Address
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientAddress {
  pub address: Option<String>,
  pub postal_code: Option<String>,
  pub city: Option<String>,
  pub country: Option<String>,
}

impl ClientAddress {
  pub fn new(
    address: Option<String>,
    postal_code: Option<String>,
    city: Option<String>,
    country: Option<String>,
  ) -> Self {
    Self {
      address: optional_text(address),
      postal_code: optional_text(postal_code),
      city: optional_text(city),
      country: optional_text(country),
    }
  }

  pub fn is_empty(&self) -> bool {
    self.address.is_none()
      && self.postal_code.is_none()
      && self.city.is_none()
      && self.country.is_none()
  }

  /// Address block as printed on documents: street, "postal code city", country.
  pub fn format_multiline(&self) -> String {
    let mut lines = Vec::new();
    if let Some(address) = &self.address {
      lines.push(address.clone());
    }
    let city_line: Vec<&str> = [self.postal_code.as_deref(), self.city.as_deref()]
      .into_iter()
      .flatten()
      .collect();
    if !city_line.is_empty() {
      lines.push(city_line.join(" "));
    }
    if let Some(country) = &self.country {
      lines.push(country.clone());
    }
    lines.join("\n")
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_client_name() {
    assert_eq!(ClientName::new(" Acme ".to_string()).unwrap().value(), "Acme");
    assert!(ClientName::new("".to_string()).is_err());
    assert!(ClientName::new("a".repeat(256)).is_err());
  }

  #[test]
  fn test_email() {
    assert_eq!(
      Email::new("Billing@Example.com").unwrap().as_str(),
      "billing@example.com"
    );
    assert!(Email::new("not-an-email").is_err());
    assert!(Email::new("").is_err());
  }

  #[test]
  fn test_address_blank_parts_are_dropped() {
    let address = ClientAddress::new(
      Some("12 rue de la Paix".to_string()),
      Some("75002".to_string()),
      Some("Paris".to_string()),
      Some("  ".to_string()),
    );
    assert_eq!(address.country, None);
    assert_eq!(address.format_multiline(), "12 rue de la Paix\n75002 Paris");
  }

  #[test]
  fn test_empty_address() {
    assert!(ClientAddress::new(None, Some(" ".to_string()), None, None).is_empty());
  }
}
