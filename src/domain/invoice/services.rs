use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::catalog::ports::{ClientRepository, ProductRepository};
use crate::domain::common::{Clock, OwnerContext};
use crate::domain::value_objects::{Money, Quantity, TaxRate};

use super::entities::{Invoice, InvoiceRevision, LineItemDraft, Payment};
use super::errors::InvoiceError;
use super::ports::InvoiceRepository;
use super::value_objects::{InvoiceStatus, PaymentMethod};

/// Billing defaults taken from configuration.
#[derive(Debug, Clone, Copy)]
pub struct BillingSettings {
  pub default_vat_rate: TaxRate,
  pub payment_terms_days: u32,
}

impl BillingSettings {
  pub fn due_date_from(&self, today: NaiveDate) -> NaiveDate {
    today
      .checked_add_days(Days::new(u64::from(self.payment_terms_days)))
      .unwrap_or(NaiveDate::MAX)
  }
}

impl Default for BillingSettings {
  fn default() -> Self {
    Self {
      default_vat_rate: TaxRate::standard(),
      payment_terms_days: 30,
    }
  }
}

/// A requested line item. `unit_price` falls back to the product's price.
#[derive(Debug, Clone)]
pub struct InvoiceItemInput {
  pub id: Option<Uuid>,
  pub product_id: Uuid,
  pub quantity: Quantity,
  pub unit_price: Option<Money>,
}

/// Invoice creation data
pub struct InvoiceData {
  pub client_id: Uuid,
  pub due_date: NaiveDate,
  pub vat_rate: Option<TaxRate>,
  pub line_items: Vec<InvoiceItemInput>,
}

/// Invoice update data. The whole item list is submitted.
pub struct InvoiceUpdateData {
  pub client_id: Uuid,
  pub due_date: NaiveDate,
  pub status: InvoiceStatus,
  pub vat_rate: Option<TaxRate>,
  pub line_items: Vec<InvoiceItemInput>,
}

pub struct PaymentData {
  pub amount: Money,
  pub method: PaymentMethod,
  pub paid_at: Option<DateTime<Utc>>,
  pub note: Option<String>,
}

/// Headline figures over all invoices of an owner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
  pub invoice_count: usize,
  pub pending_count: usize,
  pub paid_count: usize,
  pub overdue_count: usize,
  pub canceled_count: usize,
  /// Sum of totals, canceled invoices excluded.
  pub total_invoiced: Money,
  pub total_collected: Money,
  /// Remaining balance of open invoices.
  pub outstanding: Money,
  pub overdue_amount: Money,
}

pub struct InvoiceService {
  invoice_repo: Arc<dyn InvoiceRepository>,
  client_repo: Arc<dyn ClientRepository>,
  product_repo: Arc<dyn ProductRepository>,
  clock: Arc<dyn Clock>,
  settings: BillingSettings,
}

impl InvoiceService {
  pub fn new(
    invoice_repo: Arc<dyn InvoiceRepository>,
    client_repo: Arc<dyn ClientRepository>,
    product_repo: Arc<dyn ProductRepository>,
    clock: Arc<dyn Clock>,
    settings: BillingSettings,
  ) -> Self {
    Self {
      invoice_repo,
      client_repo,
      product_repo,
      clock,
      settings,
    }
  }

  pub fn today(&self) -> NaiveDate {
    self.clock.today()
  }

  pub async fn create_invoice(
    &self,
    ctx: OwnerContext,
    data: InvoiceData,
  ) -> Result<Invoice, InvoiceError> {
    self.ensure_client(ctx, data.client_id).await?;
    let drafts = self.resolve_items(ctx, data.line_items).await?;

    let invoice = Invoice::new(
      ctx.owner_id,
      data.client_id,
      data.due_date,
      data.vat_rate.unwrap_or(self.settings.default_vat_rate),
      drafts,
      self.clock.now(),
    )?;

    let invoice = self.invoice_repo.create(&invoice).await?;
    tracing::info!(
      invoice_id = %invoice.id,
      owner_id = %ctx.owner_id,
      total = %invoice.total(),
      "invoice created"
    );
    Ok(invoice)
  }

  pub async fn update_invoice(
    &self,
    ctx: OwnerContext,
    invoice_id: Uuid,
    data: InvoiceUpdateData,
  ) -> Result<Invoice, InvoiceError> {
    let mut invoice = self.get_invoice(ctx, invoice_id).await?;

    self.ensure_client(ctx, data.client_id).await?;
    let line_items = self.resolve_items(ctx, data.line_items).await?;

    let changes = invoice
      .revise(
        InvoiceRevision {
          client_id: data.client_id,
          due_date: data.due_date,
          status: data.status,
          vat_rate: data.vat_rate.unwrap_or(invoice.vat_rate),
          line_items,
        },
        self.clock.now(),
      )
      .inspect_err(|e| tracing::warn!(invoice_id = %invoice_id, error = %e, "invoice update refused"))?;

    let invoice = self.invoice_repo.update(&invoice).await?;
    tracing::info!(
      invoice_id = %invoice.id,
      status = %invoice.status,
      created = changes.created.len(),
      updated = changes.updated.len(),
      removed = changes.removed.len(),
      "invoice updated"
    );
    Ok(invoice)
  }

  pub async fn delete_invoice(&self, ctx: OwnerContext, invoice_id: Uuid) -> Result<(), InvoiceError> {
    let invoice = self.get_invoice(ctx, invoice_id).await?;

    invoice
      .ensure_deletable()
      .inspect_err(|e| tracing::warn!(invoice_id = %invoice_id, error = %e, "invoice delete refused"))?;

    self.invoice_repo.delete(&invoice).await?;
    tracing::info!(invoice_id = %invoice_id, owner_id = %ctx.owner_id, "invoice deleted");
    Ok(())
  }

  pub async fn duplicate_invoice(
    &self,
    ctx: OwnerContext,
    invoice_id: Uuid,
  ) -> Result<Invoice, InvoiceError> {
    let source = self.get_invoice(ctx, invoice_id).await?;
    let now = self.clock.now();
    let copy = source.duplicate(self.settings.due_date_from(now.date_naive()), now);

    let copy = self.invoice_repo.create(&copy).await?;
    tracing::info!(invoice_id = %copy.id, source_id = %source.id, "invoice duplicated");
    Ok(copy)
  }

  pub async fn get_invoice(&self, ctx: OwnerContext, invoice_id: Uuid) -> Result<Invoice, InvoiceError> {
    self
      .invoice_repo
      .find_by_id(ctx.owner_id, invoice_id)
      .await?
      .ok_or(InvoiceError::InvoiceNotFound(invoice_id))
  }

  /// Lists invoices, filtering on the effective (date-aware) status.
  pub async fn list_invoices(
    &self,
    ctx: OwnerContext,
    status: Option<InvoiceStatus>,
    client_id: Option<Uuid>,
  ) -> Result<Vec<Invoice>, InvoiceError> {
    let today = self.today();
    let invoices = self.invoice_repo.list(ctx.owner_id, client_id).await?;

    Ok(
      invoices
        .into_iter()
        .filter(|invoice| status.is_none_or(|s| invoice.effective_status(today) == s))
        .collect(),
    )
  }

  // Payment operations
  pub async fn record_payment(
    &self,
    ctx: OwnerContext,
    invoice_id: Uuid,
    data: PaymentData,
  ) -> Result<(Invoice, Payment), InvoiceError> {
    let mut invoice = self.get_invoice(ctx, invoice_id).await?;
    let now = self.clock.now();

    let payment = Payment::new(
      invoice.id,
      ctx.owner_id,
      data.amount,
      data.method,
      data.paid_at.unwrap_or(now),
      crate::domain::value_objects::optional_text(data.note),
      now,
    )?;

    invoice
      .record_payment(payment.clone())
      .inspect_err(|e| tracing::warn!(invoice_id = %invoice_id, error = %e, "payment refused"))?;

    let invoice = self.invoice_repo.add_payment(&invoice, &payment).await?;
    tracing::info!(
      invoice_id = %invoice.id,
      payment_id = %payment.id,
      amount = %payment.amount,
      status = %invoice.status,
      "payment recorded"
    );
    Ok((invoice, payment))
  }

  pub async fn delete_payment(&self, ctx: OwnerContext, payment_id: Uuid) -> Result<Invoice, InvoiceError> {
    let invoice_id = self
      .invoice_repo
      .find_invoice_id_by_payment(ctx.owner_id, payment_id)
      .await?
      .ok_or(InvoiceError::PaymentNotFound(payment_id))?;
    let mut invoice = self.get_invoice(ctx, invoice_id).await?;

    let removed = invoice.remove_payment(payment_id, self.clock.now())?;

    let invoice = self.invoice_repo.remove_payment(&invoice, removed.id).await?;
    tracing::info!(
      invoice_id = %invoice.id,
      payment_id = %payment_id,
      status = %invoice.status,
      "payment deleted"
    );
    Ok(invoice)
  }

  pub async fn list_payments(
    &self,
    ctx: OwnerContext,
    invoice_id: Uuid,
  ) -> Result<Vec<Payment>, InvoiceError> {
    let invoice = self.get_invoice(ctx, invoice_id).await?;
    let mut payments = invoice.payments;
    payments.sort_by_key(|p| (p.paid_at, p.created_at));
    Ok(payments)
  }

  pub async fn summarize(&self, ctx: OwnerContext) -> Result<DashboardSummary, InvoiceError> {
    let today = self.today();
    let invoices = self.invoice_repo.list(ctx.owner_id, None).await?;

    let mut summary = DashboardSummary {
      invoice_count: invoices.len(),
      ..Default::default()
    };

    for invoice in &invoices {
      let ledger = invoice.ledger();
      summary.total_collected += ledger.paid_amount;

      match invoice.effective_status(today) {
        InvoiceStatus::Canceled => {
          summary.canceled_count += 1;
          continue;
        }
        InvoiceStatus::Paid => summary.paid_count += 1,
        InvoiceStatus::Pending => {
          summary.pending_count += 1;
          summary.outstanding += ledger.remaining_amount;
        }
        InvoiceStatus::Overdue => {
          summary.overdue_count += 1;
          summary.outstanding += ledger.remaining_amount;
          summary.overdue_amount += ledger.remaining_amount;
        }
      }
      summary.total_invoiced += invoice.total();
    }

    Ok(summary)
  }

  // Helpers
  async fn ensure_client(&self, ctx: OwnerContext, client_id: Uuid) -> Result<(), InvoiceError> {
    self
      .client_repo
      .find_by_id(ctx.owner_id, client_id)
      .await?
      .map(|_| ())
      .ok_or(InvoiceError::ClientNotFound(client_id))
  }

  async fn resolve_items(
    &self,
    ctx: OwnerContext,
    items: Vec<InvoiceItemInput>,
  ) -> Result<Vec<LineItemDraft>, InvoiceError> {
    if items.is_empty() {
      return Err(InvoiceError::NoLineItems);
    }

    let mut drafts = Vec::with_capacity(items.len());
    for item in items {
      let product = self
        .product_repo
        .find_by_id(ctx.owner_id, item.product_id)
        .await?
        .ok_or(InvoiceError::ProductNotFound(item.product_id))?;

      drafts.push(LineItemDraft {
        id: item.id,
        product_id: product.id,
        quantity: item.quantity,
        unit_price: item.unit_price.unwrap_or(product.unit_price),
      });
    }
    Ok(drafts)
  }
}
