//! In-memory implementation of every repository port, used by service and
//! HTTP tests. Version checks and owner scoping behave like the Postgres
//! repositories.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

use crate::domain::catalog::{
  CatalogError, CatalogService, Client, ClientAddress, ClientData, ClientName, ClientRepository,
  Email, Product, ProductData, ProductName, ProductRepository,
};
use crate::domain::common::{Clock, OwnerContext};
use crate::domain::invoice::{
  BillingSettings, Invoice, InvoiceError, InvoiceRepository, InvoiceService, Payment,
};
use crate::domain::quote::{Quote, QuoteError, QuoteRepository, QuoteService};
use crate::domain::template::{
  Template, TemplateError, TemplateKind, TemplateRepository, TemplateService,
};
use crate::domain::value_objects::{Money, TaxRate};

#[derive(Default)]
struct State {
  clients: HashMap<Uuid, Client>,
  products: HashMap<Uuid, Product>,
  invoices: HashMap<Uuid, Invoice>,
  quotes: HashMap<Uuid, Quote>,
  templates: HashMap<Uuid, Template>,
}

#[derive(Default)]
pub struct InMemoryStore {
  state: Mutex<State>,
}

impl InMemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  fn lock(&self) -> MutexGuard<'_, State> {
    self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
  }
}

fn owned<T>(map: &HashMap<Uuid, T>, id: Uuid, owner_id: Uuid, owner: impl Fn(&T) -> Uuid) -> Option<&T> {
  map.get(&id).filter(|entry| owner(entry) == owner_id)
}

#[async_trait]
impl ClientRepository for InMemoryStore {
  async fn create(&self, client: Client) -> Result<Client, CatalogError> {
    self.lock().clients.insert(client.id, client.clone());
    Ok(client)
  }

  async fn update(&self, client: Client) -> Result<Client, CatalogError> {
    let mut state = self.lock();
    if owned(&state.clients, client.id, client.owner_id, |c| c.owner_id).is_none() {
      return Err(CatalogError::ClientNotFound(client.id));
    }
    state.clients.insert(client.id, client.clone());
    Ok(client)
  }

  async fn find_by_id(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Client>, CatalogError> {
    Ok(owned(&self.lock().clients, id, owner_id, |c| c.owner_id).cloned())
  }

  async fn list(&self, owner_id: Uuid) -> Result<Vec<Client>, CatalogError> {
    let mut clients: Vec<Client> = self
      .lock()
      .clients
      .values()
      .filter(|c| c.owner_id == owner_id)
      .cloned()
      .collect();
    clients.sort_by(|a, b| a.name.value().cmp(b.name.value()));
    Ok(clients)
  }

  async fn is_referenced(&self, owner_id: Uuid, id: Uuid) -> Result<bool, CatalogError> {
    let state = self.lock();
    Ok(
      state
        .invoices
        .values()
        .any(|i| i.owner_id == owner_id && i.client_id == id)
        || state
          .quotes
          .values()
          .any(|q| q.owner_id == owner_id && q.client_id == id),
    )
  }

  async fn delete(&self, owner_id: Uuid, id: Uuid) -> Result<bool, CatalogError> {
    let mut state = self.lock();
    if owned(&state.clients, id, owner_id, |c| c.owner_id).is_none() {
      return Ok(false);
    }
    Ok(state.clients.remove(&id).is_some())
  }
}

#[async_trait]
impl ProductRepository for InMemoryStore {
  async fn create(&self, product: Product) -> Result<Product, CatalogError> {
    self.lock().products.insert(product.id, product.clone());
    Ok(product)
  }

  async fn update(&self, product: Product) -> Result<Product, CatalogError> {
    let mut state = self.lock();
    if owned(&state.products, product.id, product.owner_id, |p| p.owner_id).is_none() {
      return Err(CatalogError::ProductNotFound(product.id));
    }
    state.products.insert(product.id, product.clone());
    Ok(product)
  }

  async fn find_by_id(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Product>, CatalogError> {
    Ok(owned(&self.lock().products, id, owner_id, |p| p.owner_id).cloned())
  }

  async fn list(&self, owner_id: Uuid) -> Result<Vec<Product>, CatalogError> {
    let mut products: Vec<Product> = self
      .lock()
      .products
      .values()
      .filter(|p| p.owner_id == owner_id)
      .cloned()
      .collect();
    products.sort_by(|a, b| a.name.value().cmp(b.name.value()));
    Ok(products)
  }

  async fn is_referenced(&self, owner_id: Uuid, id: Uuid) -> Result<bool, CatalogError> {
    let state = self.lock();
    let on_invoice = state
      .invoices
      .values()
      .filter(|i| i.owner_id == owner_id)
      .any(|i| i.line_items.iter().any(|item| item.product_id == id));
    let on_quote = state
      .quotes
      .values()
      .filter(|q| q.owner_id == owner_id)
      .any(|q| q.line_items.iter().any(|item| item.product_id == id));
    Ok(on_invoice || on_quote)
  }

  async fn delete(&self, owner_id: Uuid, id: Uuid) -> Result<bool, CatalogError> {
    let mut state = self.lock();
    if owned(&state.products, id, owner_id, |p| p.owner_id).is_none() {
      return Ok(false);
    }
    Ok(state.products.remove(&id).is_some())
  }
}

/// Stores `invoice` with a bumped version if the stored version matches.
fn write_invoice(state: &mut State, invoice: &Invoice) -> Result<Invoice, InvoiceError> {
  match owned(&state.invoices, invoice.id, invoice.owner_id, |i| i.owner_id) {
    Some(stored) if stored.version == invoice.version => {}
    _ => return Err(InvoiceError::ConcurrentModification(invoice.id)),
  }
  let mut stored = invoice.clone();
  stored.version += 1;
  state.invoices.insert(stored.id, stored.clone());
  Ok(stored)
}

#[async_trait]
impl InvoiceRepository for InMemoryStore {
  async fn create(&self, invoice: &Invoice) -> Result<Invoice, InvoiceError> {
    self.lock().invoices.insert(invoice.id, invoice.clone());
    Ok(invoice.clone())
  }

  async fn update(&self, invoice: &Invoice) -> Result<Invoice, InvoiceError> {
    write_invoice(&mut self.lock(), invoice)
  }

  async fn delete(&self, invoice: &Invoice) -> Result<(), InvoiceError> {
    let mut state = self.lock();
    match state.invoices.get(&invoice.id) {
      Some(stored) if stored.version == invoice.version && stored.payments.is_empty() => {
        state.invoices.remove(&invoice.id);
        Ok(())
      }
      _ => Err(InvoiceError::ConcurrentModification(invoice.id)),
    }
  }

  async fn find_by_id(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Invoice>, InvoiceError> {
    Ok(owned(&self.lock().invoices, id, owner_id, |i| i.owner_id).cloned())
  }

  async fn list(&self, owner_id: Uuid, client_id: Option<Uuid>) -> Result<Vec<Invoice>, InvoiceError> {
    let mut invoices: Vec<Invoice> = self
      .lock()
      .invoices
      .values()
      .filter(|i| i.owner_id == owner_id && client_id.is_none_or(|c| i.client_id == c))
      .cloned()
      .collect();
    invoices.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(invoices)
  }

  async fn add_payment(&self, invoice: &Invoice, _payment: &Payment) -> Result<Invoice, InvoiceError> {
    write_invoice(&mut self.lock(), invoice)
  }

  async fn remove_payment(&self, invoice: &Invoice, payment_id: Uuid) -> Result<Invoice, InvoiceError> {
    let mut state = self.lock();
    let present = state
      .invoices
      .get(&invoice.id)
      .is_some_and(|stored| stored.payments.iter().any(|p| p.id == payment_id));
    if !present {
      return Err(InvoiceError::PaymentNotFound(payment_id));
    }
    write_invoice(&mut state, invoice)
  }

  async fn find_invoice_id_by_payment(
    &self,
    owner_id: Uuid,
    payment_id: Uuid,
  ) -> Result<Option<Uuid>, InvoiceError> {
    Ok(
      self
        .lock()
        .invoices
        .values()
        .filter(|i| i.owner_id == owner_id)
        .find(|i| i.payments.iter().any(|p| p.id == payment_id))
        .map(|i| i.id),
    )
  }
}

fn write_quote(state: &mut State, quote: &Quote) -> Result<Quote, QuoteError> {
  match owned(&state.quotes, quote.id, quote.owner_id, |q| q.owner_id) {
    Some(stored) if stored.version == quote.version => {}
    _ => return Err(QuoteError::ConcurrentModification(quote.id)),
  }
  let mut stored = quote.clone();
  stored.version += 1;
  state.quotes.insert(stored.id, stored.clone());
  Ok(stored)
}

#[async_trait]
impl QuoteRepository for InMemoryStore {
  async fn create(&self, quote: &Quote) -> Result<Quote, QuoteError> {
    self.lock().quotes.insert(quote.id, quote.clone());
    Ok(quote.clone())
  }

  async fn update(&self, quote: &Quote) -> Result<Quote, QuoteError> {
    write_quote(&mut self.lock(), quote)
  }

  async fn delete(&self, quote: &Quote) -> Result<(), QuoteError> {
    let mut state = self.lock();
    match state.quotes.get(&quote.id) {
      Some(stored) if stored.version == quote.version => {
        state.quotes.remove(&quote.id);
        Ok(())
      }
      _ => Err(QuoteError::ConcurrentModification(quote.id)),
    }
  }

  async fn find_by_id(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Quote>, QuoteError> {
    Ok(owned(&self.lock().quotes, id, owner_id, |q| q.owner_id).cloned())
  }

  async fn list(&self, owner_id: Uuid, client_id: Option<Uuid>) -> Result<Vec<Quote>, QuoteError> {
    let mut quotes: Vec<Quote> = self
      .lock()
      .quotes
      .values()
      .filter(|q| q.owner_id == owner_id && client_id.is_none_or(|c| q.client_id == c))
      .cloned()
      .collect();
    quotes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(quotes)
  }

  async fn convert(&self, quote: &Quote, invoice: &Invoice) -> Result<(Quote, Invoice), QuoteError> {
    let mut state = self.lock();
    let quote = write_quote(&mut state, quote)?;
    state.invoices.insert(invoice.id, invoice.clone());
    Ok((quote, invoice.clone()))
  }
}

fn clear_defaults(state: &mut State, owner_id: Uuid, kind: TemplateKind, except: Uuid) {
  for template in state.templates.values_mut() {
    if template.owner_id == owner_id && template.kind == kind && template.id != except {
      template.is_default = false;
    }
  }
}

#[async_trait]
impl TemplateRepository for InMemoryStore {
  async fn create(&self, template: Template) -> Result<Template, TemplateError> {
    let mut state = self.lock();
    if template.is_default {
      clear_defaults(&mut state, template.owner_id, template.kind, template.id);
    }
    state.templates.insert(template.id, template.clone());
    Ok(template)
  }

  async fn update(&self, template: Template) -> Result<Template, TemplateError> {
    let mut state = self.lock();
    if owned(&state.templates, template.id, template.owner_id, |t| t.owner_id).is_none() {
      return Err(TemplateError::TemplateNotFound(template.id));
    }
    state.templates.insert(template.id, template.clone());
    Ok(template)
  }

  async fn delete(&self, owner_id: Uuid, id: Uuid) -> Result<bool, TemplateError> {
    let mut state = self.lock();
    if owned(&state.templates, id, owner_id, |t| t.owner_id).is_none() {
      return Ok(false);
    }
    Ok(state.templates.remove(&id).is_some())
  }

  async fn find_by_id(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Template>, TemplateError> {
    Ok(owned(&self.lock().templates, id, owner_id, |t| t.owner_id).cloned())
  }

  async fn list(&self, owner_id: Uuid, kind: Option<TemplateKind>) -> Result<Vec<Template>, TemplateError> {
    let mut templates: Vec<Template> = self
      .lock()
      .templates
      .values()
      .filter(|t| t.owner_id == owner_id && kind.is_none_or(|k| t.kind == k))
      .cloned()
      .collect();
    templates.sort_by(|a, b| {
      b.is_default
        .cmp(&a.is_default)
        .then_with(|| a.name.value().cmp(b.name.value()))
    });
    Ok(templates)
  }

  async fn set_default(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Template>, TemplateError> {
    let mut state = self.lock();
    let Some(kind) = owned(&state.templates, id, owner_id, |t| t.owner_id).map(|t| t.kind) else {
      return Ok(None);
    };
    clear_defaults(&mut state, owner_id, kind, id);
    Ok(state.templates.get_mut(&id).map(|template| {
      template.is_default = true;
      template.clone()
    }))
  }

  async fn find_default(&self, owner_id: Uuid, kind: TemplateKind) -> Result<Option<Template>, TemplateError> {
    Ok(
      self
        .lock()
        .templates
        .values()
        .find(|t| t.owner_id == owner_id && t.kind == kind && t.is_default)
        .cloned(),
    )
  }
}

/// Clock pinned to noon UTC of a chosen day.
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
  pub fn on(day: NaiveDate) -> Self {
    Self(day.and_hms_opt(12, 0, 0).unwrap().and_utc())
  }
}

impl Clock for FixedClock {
  fn now(&self) -> DateTime<Utc> {
    self.0
  }
}

/// Services wired to one store, plus helpers to seed the catalog.
pub struct Fixture {
  pub store: Arc<InMemoryStore>,
  pub owner: OwnerContext,
  pub today: NaiveDate,
  pub catalog: Arc<CatalogService>,
  pub invoices: Arc<InvoiceService>,
  pub quotes: Arc<QuoteService>,
  pub templates: Arc<TemplateService>,
}

impl Fixture {
  pub fn on(today: NaiveDate) -> Self {
    let store = Arc::new(InMemoryStore::new());
    let clock: Arc<dyn Clock> = Arc::new(FixedClock::on(today));
    let settings = BillingSettings::default();

    Self {
      owner: OwnerContext::new(Uuid::new_v4()),
      today,
      catalog: Arc::new(CatalogService::new(store.clone(), store.clone())),
      invoices: Arc::new(InvoiceService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        clock.clone(),
        settings,
      )),
      quotes: Arc::new(QuoteService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        clock,
        settings,
      )),
      templates: Arc::new(TemplateService::new(store.clone())),
      store,
    }
  }

  /// The instant the fixture's clock reports.
  pub fn now(&self) -> DateTime<Utc> {
    FixedClock::on(self.today).0
  }

  pub fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
  }

  pub async fn client(&self, name: &str) -> Client {
    self
      .catalog
      .create_client(
        self.owner,
        ClientData {
          name: ClientName::new(name.to_string()).unwrap(),
          email: Email::new(format!("{}@example.com", name.to_lowercase().replace(' ', "."))).unwrap(),
          phone: None,
          company: None,
          address: ClientAddress::new(None, None, None, None),
        },
      )
      .await
      .unwrap()
  }

  pub async fn product(&self, name: &str, unit_price: Decimal, tax_rate: Option<Decimal>) -> Product {
    self
      .catalog
      .create_product(
        self.owner,
        ProductData {
          name: ProductName::new(name.to_string()).unwrap(),
          description: None,
          unit_price: Money::new(unit_price).unwrap(),
          default_tax_rate: tax_rate.map(|r| TaxRate::new(r).unwrap()),
        },
      )
      .await
      .unwrap()
  }
}
