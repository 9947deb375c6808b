use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::QuoteError;
use super::value_objects::{Discount, QuoteStatus};
use crate::domain::common::{ItemChanges, reconcile_item_ids};
use crate::domain::invoice::entities::checked_line_total;
use crate::domain::invoice::{Invoice, InvoiceError, LineItemDraft};
use crate::domain::value_objects::{Money, Quantity, TaxRate, ValueObjectError};

#[derive(Debug, Clone, PartialEq)]
pub struct QuoteItemDraft {
  pub id: Option<Uuid>,
  pub product_id: Uuid,
  pub quantity: Quantity,
  pub unit_price: Money,
  pub tax_rate: TaxRate,
}

// Quote Line Item - carries its own tax rate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteLineItem {
  pub id: Uuid,
  pub product_id: Uuid,
  pub quantity: Quantity,
  pub unit_price: Money,
  pub tax_rate: TaxRate,
  pub position: i32,
  line_total: Money,
}

impl QuoteLineItem {
  pub fn new(
    id: Uuid,
    product_id: Uuid,
    quantity: Quantity,
    unit_price: Money,
    tax_rate: TaxRate,
    position: i32,
  ) -> Result<Self, ValueObjectError> {
    Ok(Self {
      id,
      product_id,
      quantity,
      unit_price,
      tax_rate,
      position,
      line_total: checked_line_total(quantity, unit_price)?,
    })
  }

  pub fn line_total(&self) -> Money {
    self.line_total
  }

  pub fn tax_amount(&self) -> Money {
    self.tax_rate.apply_to(self.line_total())
  }
}

fn build_line_items(
  existing: &[Uuid],
  drafts: Vec<QuoteItemDraft>,
) -> Result<(Vec<QuoteLineItem>, ItemChanges), QuoteError> {
  if drafts.is_empty() {
    return Err(QuoteError::NoLineItems);
  }

  let submitted: Vec<Option<Uuid>> = drafts.iter().map(|d| d.id).collect();
  let (ids, changes) = reconcile_item_ids(existing, &submitted);

  let items = drafts
    .into_iter()
    .zip(ids)
    .enumerate()
    .map(|(i, (draft, id))| {
      QuoteLineItem::new(
        id,
        draft.product_id,
        draft.quantity,
        draft.unit_price,
        draft.tax_rate,
        (i + 1) as i32,
      )
    })
    .collect::<Result<Vec<_>, _>>()?;

  Ok((items, changes))
}

// Quote Totals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteTotals {
  pub subtotal: Money,
  /// Sum of per-line taxes, each rounded to cents.
  pub taxes: Money,
  pub discount_amount: Money,
  pub total: Money,
}

impl QuoteTotals {
  pub fn calculate(line_items: &[QuoteLineItem], discount: Option<&Discount>) -> Self {
    let subtotal: Money = line_items.iter().map(QuoteLineItem::line_total).sum();
    let taxes: Money = line_items.iter().map(QuoteLineItem::tax_amount).sum();
    let discount_amount = discount.map_or(Money::ZERO, |d| d.amount(subtotal));

    Self {
      subtotal,
      taxes,
      discount_amount,
      total: subtotal + taxes - discount_amount,
    }
  }

  pub fn ensure_in_range(&self) -> Result<(), ValueObjectError> {
    self.subtotal.ensure_in_range()?;
    self.taxes.ensure_in_range()?;
    self.discount_amount.ensure_in_range()?;
    self.total.ensure_in_range()?;
    Ok(())
  }
}

#[derive(Debug, Clone)]
pub struct QuoteRevision {
  pub client_id: Uuid,
  pub valid_until: NaiveDate,
  pub status: QuoteStatus,
  pub discount: Option<Discount>,
  pub notes: Option<String>,
  pub line_items: Vec<QuoteItemDraft>,
}

// Quote
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
  pub id: Uuid,
  pub owner_id: Uuid,
  pub client_id: Uuid,
  pub valid_until: NaiveDate,
  pub status: QuoteStatus,
  pub discount: Option<Discount>,
  pub notes: Option<String>,
  pub line_items: Vec<QuoteLineItem>,
  pub converted_invoice_id: Option<Uuid>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
  pub version: i32,
}

impl Quote {
  pub fn new(
    owner_id: Uuid,
    client_id: Uuid,
    valid_until: NaiveDate,
    discount: Option<Discount>,
    notes: Option<String>,
    line_items: Vec<QuoteItemDraft>,
    now: DateTime<Utc>,
  ) -> Result<Self, QuoteError> {
    let (line_items, _) = build_line_items(&[], line_items)?;
    QuoteTotals::calculate(&line_items, discount.as_ref()).ensure_in_range()?;

    Ok(Self {
      id: Uuid::new_v4(),
      owner_id,
      client_id,
      valid_until,
      status: QuoteStatus::Draft,
      discount,
      notes,
      line_items,
      converted_invoice_id: None,
      created_at: now,
      updated_at: now,
      version: 0,
    })
  }

  pub fn totals(&self) -> QuoteTotals {
    QuoteTotals::calculate(&self.line_items, self.discount.as_ref())
  }

  pub fn total(&self) -> Money {
    self.totals().total
  }

  /// Display flag only; expiry never changes the stored status.
  pub fn is_expired(&self, today: NaiveDate) -> bool {
    matches!(self.status, QuoteStatus::Draft | QuoteStatus::Sent) && today > self.valid_until
  }

  pub fn ensure_mutable(&self) -> Result<(), QuoteError> {
    if self.status.is_terminal() {
      return Err(QuoteError::QuoteConverted(self.id));
    }
    Ok(())
  }

  pub fn revise(&mut self, revision: QuoteRevision, now: DateTime<Utc>) -> Result<ItemChanges, QuoteError> {
    self.ensure_mutable()?;
    if !self.status.can_transition_to(revision.status) {
      return Err(QuoteError::InvalidStatusTransition {
        from: self.status,
        to: revision.status,
      });
    }

    let existing: Vec<Uuid> = self.line_items.iter().map(|i| i.id).collect();
    let (line_items, changes) = build_line_items(&existing, revision.line_items)?;
    QuoteTotals::calculate(&line_items, revision.discount.as_ref()).ensure_in_range()?;

    self.client_id = revision.client_id;
    self.valid_until = revision.valid_until;
    self.status = revision.status;
    self.discount = revision.discount;
    self.notes = revision.notes;
    self.line_items = line_items;
    self.updated_at = now;

    Ok(changes)
  }

  /// The tax rate shared by every line, if there is exactly one.
  pub fn common_tax_rate(&self) -> Option<TaxRate> {
    let first = self.line_items.first()?.tax_rate;
    self
      .line_items
      .iter()
      .all(|item| item.tax_rate == first)
      .then_some(first)
  }

  /// Builds the PENDING invoice this quote converts into.
  /// The quote discount is not carried over: invoices have no discount line.
  pub fn to_invoice(
    &self,
    vat_rate: TaxRate,
    due_date: NaiveDate,
    now: DateTime<Utc>,
  ) -> Result<Invoice, InvoiceError> {
    let drafts = self
      .line_items
      .iter()
      .map(|item| LineItemDraft {
        id: None,
        product_id: item.product_id,
        quantity: item.quantity,
        unit_price: item.unit_price,
      })
      .collect();

    Ok(Invoice::new(self.owner_id, self.client_id, due_date, vat_rate, drafts, now)?.with_source_quote(self.id))
  }

  pub fn mark_converted(&mut self, invoice_id: Uuid, now: DateTime<Utc>) -> Result<(), QuoteError> {
    self.ensure_mutable()?;
    self.status = QuoteStatus::Converted;
    self.converted_invoice_id = Some(invoice_id);
    self.updated_at = now;
    Ok(())
  }

  /// Fresh DRAFT copy; conversion state is not copied.
  pub fn duplicate(&self, valid_until: NaiveDate, now: DateTime<Utc>) -> Quote {
    Quote {
      id: Uuid::new_v4(),
      owner_id: self.owner_id,
      client_id: self.client_id,
      valid_until,
      status: QuoteStatus::Draft,
      discount: self.discount,
      notes: self.notes.clone(),
      line_items: self
        .line_items
        .iter()
        .map(|item| QuoteLineItem {
          id: Uuid::new_v4(),
          ..item.clone()
        })
        .collect(),
      converted_invoice_id: None,
      created_at: now,
      updated_at: now,
      version: 0,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::invoice::InvoiceStatus;
  use rust_decimal::Decimal;
  use rust_decimal_macros::dec;

  fn item(quantity: Decimal, price: Decimal, rate: Decimal) -> QuoteItemDraft {
    QuoteItemDraft {
      id: None,
      product_id: Uuid::new_v4(),
      quantity: Quantity::new(quantity).unwrap(),
      unit_price: Money::positive(price).unwrap(),
      tax_rate: TaxRate::new(rate).unwrap(),
    }
  }

  fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  fn noon(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    date(y, m, d).and_hms_opt(12, 0, 0).unwrap().and_utc()
  }

  fn sample_quote(discount: Option<Discount>) -> Quote {
    Quote::new(
      Uuid::new_v4(),
      Uuid::new_v4(),
      date(2026, 4, 1),
      discount,
      Some("Valid 30 days".to_string()),
      vec![item(dec!(2), dec!(100), dec!(20)), item(dec!(1), dec!(50), dec!(10))],
      noon(2026, 3, 1),
    )
    .unwrap()
  }

  fn revision_of(quote: &Quote, status: QuoteStatus) -> QuoteRevision {
    QuoteRevision {
      client_id: quote.client_id,
      valid_until: quote.valid_until,
      status,
      discount: quote.discount,
      notes: quote.notes.clone(),
      line_items: quote
        .line_items
        .iter()
        .map(|i| QuoteItemDraft {
          id: Some(i.id),
          product_id: i.product_id,
          quantity: i.quantity,
          unit_price: i.unit_price,
          tax_rate: i.tax_rate,
        })
        .collect(),
    }
  }

  #[test]
  fn test_quote_totals_with_percentage_discount() {
    let quote = sample_quote(Some(Discount::percentage(dec!(10)).unwrap()));
    let totals = quote.totals();

    assert_eq!(totals.subtotal.amount(), dec!(250));
    assert_eq!(totals.taxes.amount(), dec!(45));
    assert_eq!(totals.discount_amount.amount(), dec!(25));
    assert_eq!(totals.total.amount(), dec!(270));
    assert_eq!(
      totals.total,
      totals.subtotal + totals.taxes - totals.discount_amount
    );
  }

  #[test]
  fn test_taxes_are_rounded_per_line() {
    let quote = Quote::new(
      Uuid::new_v4(),
      Uuid::new_v4(),
      date(2026, 4, 1),
      None,
      None,
      vec![item(dec!(1), dec!(0.05), dec!(10)), item(dec!(1), dec!(0.05), dec!(10))],
      noon(2026, 3, 1),
    )
    .unwrap();

    // 0.005 rounds to 0.01 on each line
    assert_eq!(quote.totals().taxes.amount(), dec!(0.02));
  }

  #[test]
  fn test_fixed_discount_is_not_clamped() {
    let quote = sample_quote(Some(Discount::fixed(dec!(400)).unwrap()));
    assert_eq!(quote.total().amount(), dec!(-105));
  }

  #[test]
  fn test_revise_follows_status_machine() {
    let mut quote = sample_quote(None);

    quote.revise(revision_of(&quote, QuoteStatus::Sent), noon(2026, 3, 2)).unwrap();
    assert_eq!(quote.status, QuoteStatus::Sent);

    quote.revise(revision_of(&quote, QuoteStatus::Accepted), noon(2026, 3, 2)).unwrap();
    assert_eq!(quote.status, QuoteStatus::Accepted);

    let result = quote.revise(revision_of(&quote, QuoteStatus::Draft), noon(2026, 3, 2));
    assert!(matches!(result, Err(QuoteError::InvalidStatusTransition { .. })));
  }

  #[test]
  fn test_revise_cannot_convert() {
    let mut quote = sample_quote(None);
    let result = quote.revise(revision_of(&quote, QuoteStatus::Converted), noon(2026, 3, 2));
    assert!(matches!(result, Err(QuoteError::InvalidStatusTransition { .. })));
  }

  #[test]
  fn test_converted_quote_is_immutable() {
    let mut quote = sample_quote(None);
    quote.mark_converted(Uuid::new_v4(), noon(2026, 3, 3)).unwrap();
    let before = quote.clone();

    let result = quote.revise(revision_of(&quote, QuoteStatus::Converted), noon(2026, 3, 2));
    assert!(matches!(result, Err(QuoteError::QuoteConverted(_))));
    assert!(matches!(
      quote.mark_converted(Uuid::new_v4(), noon(2026, 3, 3)),
      Err(QuoteError::QuoteConverted(_))
    ));
    assert_eq!(quote, before);
    assert!(quote.status.is_terminal());
  }

  #[test]
  fn test_to_invoice_mirrors_items() {
    let quote = sample_quote(None);
    let invoice = quote.to_invoice(TaxRate::standard(), date(2026, 5, 1), noon(2026, 4, 1)).unwrap();

    assert_eq!(invoice.status, InvoiceStatus::Pending);
    assert_eq!(invoice.client_id, quote.client_id);
    assert_eq!(invoice.owner_id, quote.owner_id);
    assert_eq!(invoice.source_quote_id, Some(quote.id));
    assert_eq!(invoice.line_items.len(), quote.line_items.len());
    for (inv, q) in invoice.line_items.iter().zip(&quote.line_items) {
      assert_eq!(inv.product_id, q.product_id);
      assert_eq!(inv.quantity, q.quantity);
      assert_eq!(inv.unit_price, q.unit_price);
    }
    assert_eq!(invoice.totals().total_ht, quote.totals().subtotal);
    assert_eq!(invoice.created_at, noon(2026, 4, 1));
  }

  #[test]
  fn test_to_invoice_drops_discount() {
    let quote = sample_quote(Some(Discount::fixed(dec!(30)).unwrap()));
    let invoice = quote.to_invoice(TaxRate::new(dec!(20)).unwrap(), date(2026, 5, 1), noon(2026, 4, 1)).unwrap();

    // 250 + 20% VAT, the 30 discount is gone
    assert_eq!(quote.total().amount(), dec!(265));
    assert_eq!(invoice.total().amount(), dec!(300));
  }

  #[test]
  fn test_zero_and_oversized_lines_are_rejected() {
    let zero = Quote::new(
      Uuid::new_v4(),
      Uuid::new_v4(),
      date(2026, 4, 1),
      None,
      None,
      vec![item(dec!(0.0001), dec!(0.01), dec!(20))],
      noon(2026, 3, 1),
    );
    assert!(matches!(zero, Err(QuoteError::Validation(ValueObjectError::InvalidAmount(_)))));

    let oversized = Quote::new(
      Uuid::new_v4(),
      Uuid::new_v4(),
      date(2026, 4, 1),
      None,
      None,
      vec![item(dec!(999999999999999), dec!(1000000000000000), dec!(20))],
      noon(2026, 3, 1),
    );
    assert_eq!(
      oversized.unwrap_err().kind(),
      crate::domain::common::ErrorKind::Validation
    );
  }

  #[test]
  fn test_common_tax_rate() {
    let mixed = sample_quote(None);
    assert_eq!(mixed.common_tax_rate(), None);

    let uniform = Quote::new(
      Uuid::new_v4(),
      Uuid::new_v4(),
      date(2026, 4, 1),
      None,
      None,
      vec![item(dec!(1), dec!(10), dec!(5.5)), item(dec!(3), dec!(2), dec!(5.5))],
      noon(2026, 3, 1),
    )
    .unwrap();
    assert_eq!(uniform.common_tax_rate(), Some(TaxRate::new(dec!(5.5)).unwrap()));
  }

  #[test]
  fn test_is_expired() {
    let mut quote = sample_quote(None);
    assert!(!quote.is_expired(date(2026, 4, 1)));
    assert!(quote.is_expired(date(2026, 4, 2)));

    quote.status = QuoteStatus::Accepted;
    assert!(!quote.is_expired(date(2026, 4, 2)));
  }

  #[test]
  fn test_duplicate_resets_conversion() {
    let mut quote = sample_quote(Some(Discount::fixed(dec!(5)).unwrap()));
    quote.mark_converted(Uuid::new_v4(), noon(2026, 3, 3)).unwrap();

    let copy = quote.duplicate(date(2026, 6, 1), noon(2026, 5, 1));
    assert_eq!(copy.status, QuoteStatus::Draft);
    assert_eq!(copy.converted_invoice_id, None);
    assert_eq!(copy.valid_until, date(2026, 6, 1));
    assert_eq!(copy.created_at, noon(2026, 5, 1));
    assert_eq!(copy.totals(), quote.totals());
    assert!(copy.line_items.iter().zip(&quote.line_items).all(|(a, b)| a.id != b.id));
  }
}
