use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::value_objects::{ClientAddress, ClientName, Email, ProductName};
use crate::domain::value_objects::{Money, TaxRate};

// Client - billed party referenced by invoices and quotes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
  pub id: Uuid,
  pub owner_id: Uuid,
  pub name: ClientName,
  pub email: Email,
  pub phone: Option<String>,
  pub company: Option<String>,
  pub address: ClientAddress,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Client {
  pub fn new(
    owner_id: Uuid,
    name: ClientName,
    email: Email,
    phone: Option<String>,
    company: Option<String>,
    address: ClientAddress,
  ) -> Self {
    let now = Utc::now();
    Self {
      id: Uuid::new_v4(),
      owner_id,
      name,
      email,
      phone,
      company,
      address,
      created_at: now,
      updated_at: now,
    }
  }

  pub fn update(
    &mut self,
    name: ClientName,
    email: Email,
    phone: Option<String>,
    company: Option<String>,
    address: ClientAddress,
  ) {
    self.name = name;
    self.email = email;
    self.phone = phone;
    self.company = company;
    self.address = address;
    self.updated_at = Utc::now();
  }
}

// Product - catalog entry line items are priced from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
  pub id: Uuid,
  pub owner_id: Uuid,
  pub name: ProductName,
  pub description: Option<String>,
  pub unit_price: Money,
  pub default_tax_rate: Option<TaxRate>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Product {
  pub fn new(
    owner_id: Uuid,
    name: ProductName,
    description: Option<String>,
    unit_price: Money,
    default_tax_rate: Option<TaxRate>,
  ) -> Self {
    let now = Utc::now();
    Self {
      id: Uuid::new_v4(),
      owner_id,
      name,
      description,
      unit_price,
      default_tax_rate,
      created_at: now,
      updated_at: now,
    }
  }

  pub fn update(
    &mut self,
    name: ProductName,
    description: Option<String>,
    unit_price: Money,
    default_tax_rate: Option<TaxRate>,
  ) {
    self.name = name;
    self.description = description;
    self.unit_price = unit_price;
    self.default_tax_rate = default_tax_rate;
    self.updated_at = Utc::now();
  }
}
