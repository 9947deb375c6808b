use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::InvoiceError;
use super::value_objects::{InvoiceStatus, PaymentMethod};
use crate::domain::common::{ItemChanges, reconcile_item_ids};
use crate::domain::value_objects::{Money, Quantity, TaxRate, ValueObjectError};

/// A line item as submitted by the caller, before ids are reconciled.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItemDraft {
  pub id: Option<Uuid>,
  pub product_id: Uuid,
  pub quantity: Quantity,
  pub unit_price: Money,
}

// Invoice Line Item
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceLineItem {
  pub id: Uuid,
  pub product_id: Uuid,
  pub quantity: Quantity,
  pub unit_price: Money,
  pub position: i32,
  line_total: Money,
}

/// `quantity * unit_price` rounded to cents; must be non-zero and storable.
pub(crate) fn checked_line_total(quantity: Quantity, unit_price: Money) -> Result<Money, ValueObjectError> {
  let total = unit_price.multiply(quantity.value())?;
  if total.is_zero() {
    return Err(ValueObjectError::InvalidAmount(format!(
      "Line total of {} x {} rounds to zero",
      quantity.value(),
      unit_price
    )));
  }
  Ok(total)
}

impl InvoiceLineItem {
  pub fn new(
    id: Uuid,
    product_id: Uuid,
    quantity: Quantity,
    unit_price: Money,
    position: i32,
  ) -> Result<Self, ValueObjectError> {
    Ok(Self {
      id,
      product_id,
      quantity,
      unit_price,
      position,
      line_total: checked_line_total(quantity, unit_price)?,
    })
  }

  pub fn line_total(&self) -> Money {
    self.line_total
  }

  /// Draft copy without the id, for duplication and conversion.
  pub fn to_draft(&self) -> LineItemDraft {
    LineItemDraft {
      id: None,
      product_id: self.product_id,
      quantity: self.quantity,
      unit_price: self.unit_price,
    }
  }
}

fn build_line_items(
  existing: &[Uuid],
  drafts: Vec<LineItemDraft>,
) -> Result<(Vec<InvoiceLineItem>, ItemChanges), InvoiceError> {
  if drafts.is_empty() {
    return Err(InvoiceError::NoLineItems);
  }

  let submitted: Vec<Option<Uuid>> = drafts.iter().map(|d| d.id).collect();
  let (ids, changes) = reconcile_item_ids(existing, &submitted);

  let items = drafts
    .into_iter()
    .zip(ids)
    .enumerate()
    .map(|(i, (draft, id))| {
      InvoiceLineItem::new(id, draft.product_id, draft.quantity, draft.unit_price, (i + 1) as i32)
    })
    .collect::<Result<Vec<_>, _>>()?;

  Ok((items, changes))
}

// Invoice Totals - derived from the items and the document VAT rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceTotals {
  pub total_ht: Money,
  pub vat_amount: Money,
  pub total: Money,
}

impl InvoiceTotals {
  pub fn calculate(line_items: &[InvoiceLineItem], vat_rate: TaxRate) -> Self {
    let total_ht: Money = line_items.iter().map(InvoiceLineItem::line_total).sum();
    let vat_amount = vat_rate.apply_to(total_ht);

    Self {
      total_ht,
      vat_amount,
      total: total_ht + vat_amount,
    }
  }

  pub fn ensure_in_range(&self) -> Result<(), ValueObjectError> {
    self.total_ht.ensure_in_range()?;
    self.vat_amount.ensure_in_range()?;
    self.total.ensure_in_range()?;
    Ok(())
  }
}

// Payment - immutable ledger entry; only ever created or deleted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
  pub id: Uuid,
  pub invoice_id: Uuid,
  pub owner_id: Uuid,
  pub amount: Money,
  pub method: PaymentMethod,
  pub note: Option<String>,
  pub paid_at: DateTime<Utc>,
  pub created_at: DateTime<Utc>,
}

impl Payment {
  pub fn new(
    invoice_id: Uuid,
    owner_id: Uuid,
    amount: Money,
    method: PaymentMethod,
    paid_at: DateTime<Utc>,
    note: Option<String>,
    recorded_at: DateTime<Utc>,
  ) -> Result<Self, ValueObjectError> {
    if amount.amount() <= rust_decimal::Decimal::ZERO {
      return Err(ValueObjectError::InvalidAmount(
        "Payment amount must be greater than zero".to_string(),
      ));
    }

    Ok(Self {
      id: Uuid::new_v4(),
      invoice_id,
      owner_id,
      amount,
      method,
      note,
      paid_at,
      created_at: recorded_at,
    })
  }
}

/// Paid/remaining figures derived from the current payment set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LedgerSummary {
  pub paid_amount: Money,
  pub remaining_amount: Money,
  pub is_paid: bool,
}

/// Requested state of an invoice for an update.
#[derive(Debug, Clone)]
pub struct InvoiceRevision {
  pub client_id: Uuid,
  pub due_date: NaiveDate,
  pub status: InvoiceStatus,
  pub vat_rate: TaxRate,
  pub line_items: Vec<LineItemDraft>,
}

fn open_status(due_date: NaiveDate, today: NaiveDate) -> InvoiceStatus {
  if today > due_date {
    InvoiceStatus::Overdue
  } else {
    InvoiceStatus::Pending
  }
}

// Invoice - aggregate of header, line items and payment ledger
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Invoice {
  pub id: Uuid,
  pub owner_id: Uuid,
  pub client_id: Uuid,
  pub source_quote_id: Option<Uuid>,
  pub due_date: NaiveDate,
  pub status: InvoiceStatus,
  pub vat_rate: TaxRate,
  pub line_items: Vec<InvoiceLineItem>,
  pub payments: Vec<Payment>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
  /// Optimistic concurrency token, bumped by every persisted write.
  pub version: i32,
}

impl Invoice {
  pub fn new(
    owner_id: Uuid,
    client_id: Uuid,
    due_date: NaiveDate,
    vat_rate: TaxRate,
    line_items: Vec<LineItemDraft>,
    now: DateTime<Utc>,
  ) -> Result<Self, InvoiceError> {
    let (line_items, _) = build_line_items(&[], line_items)?;
    InvoiceTotals::calculate(&line_items, vat_rate).ensure_in_range()?;

    Ok(Self {
      id: Uuid::new_v4(),
      owner_id,
      client_id,
      source_quote_id: None,
      due_date,
      status: InvoiceStatus::Pending,
      vat_rate,
      line_items,
      payments: Vec::new(),
      created_at: now,
      updated_at: now,
      version: 0,
    })
  }

  pub fn with_source_quote(mut self, quote_id: Uuid) -> Self {
    self.source_quote_id = Some(quote_id);
    self
  }

  pub fn totals(&self) -> InvoiceTotals {
    InvoiceTotals::calculate(&self.line_items, self.vat_rate)
  }

  pub fn total(&self) -> Money {
    self.totals().total
  }

  pub fn paid_amount(&self) -> Money {
    self.payments.iter().map(|p| p.amount).sum()
  }

  pub fn remaining_amount(&self) -> Money {
    self.total() - self.paid_amount()
  }

  pub fn is_paid(&self) -> bool {
    self.paid_amount() >= self.total()
  }

  pub fn ledger(&self) -> LedgerSummary {
    let total = self.total();
    let paid_amount = self.paid_amount();
    LedgerSummary {
      paid_amount,
      remaining_amount: total - paid_amount,
      is_paid: paid_amount >= total,
    }
  }

  /// Status as seen on `today`: open invoices past their due date read as OVERDUE.
  pub fn effective_status(&self, today: NaiveDate) -> InvoiceStatus {
    if self.status.is_open() {
      open_status(self.due_date, today)
    } else {
      self.status
    }
  }

  /// Applies an update. Nothing is modified when an error is returned.
  pub fn revise(
    &mut self,
    revision: InvoiceRevision,
    now: DateTime<Utc>,
  ) -> Result<ItemChanges, InvoiceError> {
    if self.is_paid() && revision.status != InvoiceStatus::Paid {
      return Err(InvoiceError::PaidInvoiceLocked);
    }
    if !self.status.can_transition_to(revision.status) {
      return Err(InvoiceError::InvalidStatusTransition {
        from: self.status,
        to: revision.status,
      });
    }

    let existing: Vec<Uuid> = self.line_items.iter().map(|i| i.id).collect();
    let (line_items, changes) = build_line_items(&existing, revision.line_items)?;
    let totals = InvoiceTotals::calculate(&line_items, revision.vat_rate);
    totals.ensure_in_range()?;
    let paid = self.paid_amount();
    let covered = paid >= totals.total;

    let status = match revision.status {
      InvoiceStatus::Paid if !covered => {
        return Err(InvoiceError::NotFullyPaid {
          remaining: totals.total - paid,
        });
      }
      InvoiceStatus::Paid => InvoiceStatus::Paid,
      InvoiceStatus::Canceled => InvoiceStatus::Canceled,
      InvoiceStatus::Pending | InvoiceStatus::Overdue if covered => InvoiceStatus::Paid,
      InvoiceStatus::Pending | InvoiceStatus::Overdue => {
        open_status(revision.due_date, now.date_naive())
      }
    };

    self.client_id = revision.client_id;
    self.due_date = revision.due_date;
    self.vat_rate = revision.vat_rate;
    self.line_items = line_items;
    self.status = status;
    self.updated_at = now;

    Ok(changes)
  }

  /// Appends a payment if it fits in the remaining balance; a payment that
  /// settles the balance moves the invoice to PAID.
  pub fn record_payment(&mut self, payment: Payment) -> Result<(), InvoiceError> {
    if self.status == InvoiceStatus::Canceled {
      return Err(InvoiceError::InvoiceCanceled);
    }

    let remaining = self.remaining_amount();
    if payment.amount > remaining {
      return Err(InvoiceError::PaymentExceedsBalance {
        amount: payment.amount,
        remaining,
      });
    }

    self.updated_at = payment.created_at;
    self.payments.push(payment);
    if self.is_paid() {
      self.status = InvoiceStatus::Paid;
    }
    Ok(())
  }

  /// Removes a payment; a PAID invoice that is no longer covered reopens as
  /// PENDING, or OVERDUE when its due date has passed.
  pub fn remove_payment(&mut self, payment_id: Uuid, now: DateTime<Utc>) -> Result<Payment, InvoiceError> {
    let index = self
      .payments
      .iter()
      .position(|p| p.id == payment_id)
      .ok_or(InvoiceError::PaymentNotFound(payment_id))?;

    let payment = self.payments.remove(index);
    if self.status == InvoiceStatus::Paid && !self.is_paid() {
      self.status = open_status(self.due_date, now.date_naive());
    }
    self.updated_at = now;
    Ok(payment)
  }

  pub fn ensure_deletable(&self) -> Result<(), InvoiceError> {
    if !self.payments.is_empty() {
      return Err(InvoiceError::HasPayments(self.payments.len()));
    }
    Ok(())
  }

  /// Fresh PENDING copy with the same client, items and rate; payments are not copied.
  pub fn duplicate(&self, due_date: NaiveDate, now: DateTime<Utc>) -> Invoice {
    Invoice {
      id: Uuid::new_v4(),
      owner_id: self.owner_id,
      client_id: self.client_id,
      source_quote_id: None,
      due_date,
      status: InvoiceStatus::Pending,
      vat_rate: self.vat_rate,
      line_items: self
        .line_items
        .iter()
        .map(|item| InvoiceLineItem {
          id: Uuid::new_v4(),
          ..item.clone()
        })
        .collect(),
      payments: Vec::new(),
      created_at: now,
      updated_at: now,
      version: 0,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rust_decimal_macros::dec;

  fn draft(quantity: rust_decimal::Decimal, price: rust_decimal::Decimal) -> LineItemDraft {
    LineItemDraft {
      id: None,
      product_id: Uuid::new_v4(),
      quantity: Quantity::new(quantity).unwrap(),
      unit_price: Money::positive(price).unwrap(),
    }
  }

  fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  fn noon(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    date(y, m, d).and_hms_opt(12, 0, 0).unwrap().and_utc()
  }

  fn sample_invoice(due_date: NaiveDate) -> Invoice {
    Invoice::new(
      Uuid::new_v4(),
      Uuid::new_v4(),
      due_date,
      TaxRate::new(dec!(20)).unwrap(),
      vec![draft(dec!(2), dec!(50)), draft(dec!(1), dec!(100))],
      noon(2026, 1, 15),
    )
    .unwrap()
  }

  fn payment(invoice: &Invoice, amount: rust_decimal::Decimal) -> Payment {
    Payment::new(
      invoice.id,
      invoice.owner_id,
      Money::positive(amount).unwrap(),
      PaymentMethod::Transfer,
      noon(2026, 1, 20),
      None,
      noon(2026, 1, 20),
    )
    .unwrap()
  }

  #[test]
  fn test_invoice_totals() {
    let invoice = sample_invoice(date(2026, 3, 1));
    let totals = invoice.totals();

    assert_eq!(totals.total_ht.amount(), dec!(200));
    assert_eq!(totals.vat_amount.amount(), dec!(40));
    assert_eq!(totals.total.amount(), dec!(240));
    assert_eq!(totals.total, totals.total_ht + totals.vat_amount);
  }

  #[test]
  fn test_totals_stay_consistent_with_fractional_vat() {
    let invoice = Invoice::new(
      Uuid::new_v4(),
      Uuid::new_v4(),
      date(2026, 3, 1),
      TaxRate::new(dec!(5.5)).unwrap(),
      vec![draft(dec!(3), dec!(0.10)), draft(dec!(1.5), dec!(19.99))],
      noon(2026, 1, 15),
    )
    .unwrap();
    let totals = invoice.totals();

    // 0.30 + 29.985 -> 0.30 + 29.99
    assert_eq!(totals.total_ht.amount(), dec!(30.29));
    assert_eq!(totals.vat_amount.amount(), dec!(1.67));
    assert_eq!(totals.total, totals.total_ht + totals.vat_amount);
  }

  #[test]
  fn test_new_invoice_requires_items() {
    let result = Invoice::new(
      Uuid::new_v4(),
      Uuid::new_v4(),
      date(2026, 3, 1),
      TaxRate::standard(),
      vec![],
      noon(2026, 1, 15),
    );
    assert!(matches!(result, Err(InvoiceError::NoLineItems)));
  }

  #[test]
  fn test_line_total_rounding_to_zero_is_rejected() {
    let result = Invoice::new(
      Uuid::new_v4(),
      Uuid::new_v4(),
      date(2026, 3, 1),
      TaxRate::standard(),
      vec![draft(dec!(0.0001), dec!(0.01))],
      noon(2026, 1, 15),
    );

    let err = result.unwrap_err();
    assert!(matches!(err, InvoiceError::Validation(ValueObjectError::InvalidAmount(_))));
    assert_eq!(err.kind(), crate::domain::common::ErrorKind::Validation);
  }

  #[test]
  fn test_oversized_line_is_rejected() {
    let result = Invoice::new(
      Uuid::new_v4(),
      Uuid::new_v4(),
      date(2026, 3, 1),
      TaxRate::standard(),
      vec![draft(dec!(999999999999999), dec!(1000000000000000))],
      noon(2026, 1, 15),
    );
    assert_eq!(result.unwrap_err().kind(), crate::domain::common::ErrorKind::Validation);

    // Each line fits, the document total does not
    let result = Invoice::new(
      Uuid::new_v4(),
      Uuid::new_v4(),
      date(2026, 3, 1),
      TaxRate::standard(),
      vec![draft(dec!(9), dec!(10000000000000000))],
      noon(2026, 1, 15),
    );
    assert!(matches!(result, Err(InvoiceError::Validation(ValueObjectError::InvalidAmount(_)))));
  }

  #[test]
  fn test_revise_rejects_zero_line_without_change() {
    let mut invoice = sample_invoice(date(2026, 3, 1));
    let before = invoice.clone();

    let result = invoice.revise(
      InvoiceRevision {
        client_id: invoice.client_id,
        due_date: invoice.due_date,
        status: InvoiceStatus::Pending,
        vat_rate: invoice.vat_rate,
        line_items: vec![draft(dec!(0.0001), dec!(0.01))],
      },
      noon(2026, 2, 1),
    );

    assert!(matches!(result, Err(InvoiceError::Validation(_))));
    assert_eq!(invoice, before);
  }

  #[test]
  fn test_timestamps_come_from_the_caller() {
    let mut invoice = sample_invoice(date(2026, 3, 1));
    assert_eq!(invoice.created_at, noon(2026, 1, 15));
    assert_eq!(invoice.updated_at, noon(2026, 1, 15));

    invoice.record_payment(payment(&invoice, dec!(10))).unwrap();
    assert_eq!(invoice.updated_at, noon(2026, 1, 20));
  }

  #[test]
  fn test_new_invoice_positions_items() {
    let invoice = sample_invoice(date(2026, 3, 1));
    assert_eq!(invoice.status, InvoiceStatus::Pending);
    let positions: Vec<i32> = invoice.line_items.iter().map(|i| i.position).collect();
    assert_eq!(positions, vec![1, 2]);
  }

  #[test]
  fn test_full_payment_marks_paid_and_deletion_reopens_overdue() {
    let mut invoice = sample_invoice(date(2026, 1, 1));
    let p = payment(&invoice, dec!(240));
    let payment_id = p.id;

    invoice.record_payment(p).unwrap();
    assert_eq!(invoice.status, InvoiceStatus::Paid);
    assert!(invoice.remaining_amount().is_zero());

    invoice.remove_payment(payment_id, noon(2026, 2, 1)).unwrap();
    assert_eq!(invoice.status, InvoiceStatus::Overdue);
    assert_eq!(invoice.remaining_amount().amount(), dec!(240));
  }

  #[test]
  fn test_payment_deletion_before_due_date_reopens_pending() {
    let mut invoice = sample_invoice(date(2026, 6, 1));
    let p = payment(&invoice, dec!(240));
    let payment_id = p.id;
    invoice.record_payment(p).unwrap();

    invoice.remove_payment(payment_id, noon(2026, 5, 1)).unwrap();
    assert_eq!(invoice.status, InvoiceStatus::Pending);
  }

  #[test]
  fn test_partial_payment_keeps_pending() {
    let mut invoice = sample_invoice(date(2026, 6, 1));
    invoice.record_payment(payment(&invoice, dec!(100))).unwrap();

    assert_eq!(invoice.status, InvoiceStatus::Pending);
    assert_eq!(invoice.ledger().paid_amount.amount(), dec!(100));
    assert_eq!(invoice.ledger().remaining_amount.amount(), dec!(140));
    assert!(!invoice.ledger().is_paid);
  }

  #[test]
  fn test_overpayment_is_rejected_without_change() {
    let mut invoice = sample_invoice(date(2026, 6, 1));
    invoice.record_payment(payment(&invoice, dec!(200))).unwrap();
    let before = invoice.clone();

    let result = invoice.record_payment(payment(&invoice, dec!(40.01)));
    assert!(matches!(result, Err(InvoiceError::PaymentExceedsBalance { .. })));
    assert_eq!(invoice, before);
  }

  #[test]
  fn test_canceled_invoice_rejects_payments() {
    let mut invoice = sample_invoice(date(2026, 6, 1));
    invoice.status = InvoiceStatus::Canceled;

    let result = invoice.record_payment(payment(&invoice, dec!(10)));
    assert!(matches!(result, Err(InvoiceError::InvoiceCanceled)));
  }

  #[test]
  fn test_zero_payment_is_invalid() {
    let result = Payment::new(
      Uuid::new_v4(),
      Uuid::new_v4(),
      Money::ZERO,
      PaymentMethod::Cash,
      noon(2026, 1, 20),
      None,
      noon(2026, 1, 20),
    );
    assert!(result.is_err());
  }

  #[test]
  fn test_effective_status_is_time_based() {
    let invoice = sample_invoice(date(2026, 3, 1));
    assert_eq!(invoice.effective_status(date(2026, 3, 1)), InvoiceStatus::Pending);
    assert_eq!(invoice.effective_status(date(2026, 3, 2)), InvoiceStatus::Overdue);

    let mut canceled = invoice.clone();
    canceled.status = InvoiceStatus::Canceled;
    assert_eq!(canceled.effective_status(date(2026, 3, 2)), InvoiceStatus::Canceled);
  }

  #[test]
  fn test_revise_reconciles_items_and_recomputes_totals() {
    let mut invoice = sample_invoice(date(2026, 3, 1));
    let kept = invoice.line_items[0].clone();
    let removed = invoice.line_items[1].id;

    let changes = invoice
      .revise(
        InvoiceRevision {
          client_id: invoice.client_id,
          due_date: date(2026, 4, 1),
          status: InvoiceStatus::Pending,
          vat_rate: TaxRate::new(dec!(10)).unwrap(),
          line_items: vec![
            LineItemDraft {
              id: Some(kept.id),
              product_id: kept.product_id,
              quantity: Quantity::new(dec!(3)).unwrap(),
              unit_price: kept.unit_price,
            },
            LineItemDraft {
              id: Some(Uuid::new_v4()),
              ..draft(dec!(1), dec!(25))
            },
          ],
        },
        noon(2026, 3, 1),
      )
      .unwrap();

    assert_eq!(changes.updated, vec![kept.id]);
    assert_eq!(changes.removed, vec![removed]);
    assert_eq!(changes.created.len(), 1);
    assert_eq!(invoice.line_items[0].id, kept.id);

    let totals = invoice.totals();
    assert_eq!(totals.total_ht.amount(), dec!(175));
    assert_eq!(totals.vat_amount.amount(), dec!(17.5));
    assert_eq!(totals.total.amount(), dec!(192.5));
  }

  #[test]
  fn test_revise_paid_invoice_requires_paid_status() {
    let mut invoice = sample_invoice(date(2026, 3, 1));
    invoice.record_payment(payment(&invoice, dec!(240))).unwrap();
    let before = invoice.clone();

    let result = invoice.revise(
      InvoiceRevision {
        client_id: invoice.client_id,
        due_date: invoice.due_date,
        status: InvoiceStatus::Pending,
        vat_rate: invoice.vat_rate,
        line_items: invoice.line_items.iter().map(|i| i.to_draft()).collect(),
      },
      noon(2026, 2, 1),
    );

    assert!(matches!(result, Err(InvoiceError::PaidInvoiceLocked)));
    assert_eq!(invoice, before);
  }

  #[test]
  fn test_revise_cannot_mark_unpaid_invoice_paid() {
    let mut invoice = sample_invoice(date(2026, 3, 1));

    let result = invoice.revise(
      InvoiceRevision {
        client_id: invoice.client_id,
        due_date: invoice.due_date,
        status: InvoiceStatus::Paid,
        vat_rate: invoice.vat_rate,
        line_items: invoice.line_items.iter().map(|i| i.to_draft()).collect(),
      },
      noon(2026, 2, 1),
    );

    match result {
      Err(InvoiceError::NotFullyPaid { remaining }) => assert_eq!(remaining.amount(), dec!(240)),
      other => panic!("expected NotFullyPaid, got {:?}", other),
    }
  }

  #[test]
  fn test_revise_cancel_and_reopen() {
    let mut invoice = sample_invoice(date(2026, 3, 1));
    let items: Vec<LineItemDraft> = invoice.line_items.iter().map(|i| i.to_draft()).collect();
    let revision = |status| InvoiceRevision {
      client_id: invoice.client_id,
      due_date: invoice.due_date,
      status,
      vat_rate: invoice.vat_rate,
      line_items: items.clone(),
    };
    let cancel = revision(InvoiceStatus::Canceled);
    let reopen = revision(InvoiceStatus::Pending);

    invoice.revise(cancel, noon(2026, 2, 1)).unwrap();
    assert_eq!(invoice.status, InvoiceStatus::Canceled);

    invoice.revise(reopen, noon(2026, 2, 1)).unwrap();
    assert_eq!(invoice.status, InvoiceStatus::Pending);
  }

  #[test]
  fn test_delete_guard() {
    let mut invoice = sample_invoice(date(2026, 3, 1));
    assert!(invoice.ensure_deletable().is_ok());

    invoice.record_payment(payment(&invoice, dec!(10))).unwrap();
    assert!(matches!(invoice.ensure_deletable(), Err(InvoiceError::HasPayments(1))));
  }

  #[test]
  fn test_duplicate() {
    let mut invoice = sample_invoice(date(2026, 3, 1));
    invoice.record_payment(payment(&invoice, dec!(240))).unwrap();

    let copy = invoice.duplicate(date(2026, 4, 1), noon(2026, 3, 2));

    assert_ne!(copy.id, invoice.id);
    assert_eq!(copy.status, InvoiceStatus::Pending);
    assert_eq!(copy.due_date, date(2026, 4, 1));
    assert!(copy.payments.is_empty());
    assert_eq!(copy.created_at, noon(2026, 3, 2));
    assert_eq!(copy.vat_rate, invoice.vat_rate);
    assert_eq!(copy.totals(), invoice.totals());
    for (a, b) in copy.line_items.iter().zip(&invoice.line_items) {
      assert_ne!(a.id, b.id);
      assert_eq!(a.product_id, b.product_id);
      assert_eq!(a.quantity, b.quantity);
      assert_eq!(a.unit_price, b.unit_price);
    }
  }
}
