use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::domain::catalog::{
  CatalogError, Client, ClientAddress, ClientName, Email, ports::ClientRepository,
};

#[derive(Debug, FromRow)]
struct ClientRow {
  id: Uuid,
  owner_id: Uuid,
  name: String,
  email: String,
  phone: Option<String>,
  company: Option<String>,
  address: Option<String>,
  postal_code: Option<String>,
  city: Option<String>,
  country: Option<String>,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl TryFrom<ClientRow> for Client {
  type Error = CatalogError;

  fn try_from(row: ClientRow) -> Result<Self, Self::Error> {
    Ok(Client {
      id: row.id,
      owner_id: row.owner_id,
      name: ClientName::new(row.name)?,
      email: Email::new(row.email)?,
      phone: row.phone,
      company: row.company,
      address: ClientAddress::new(row.address, row.postal_code, row.city, row.country),
      created_at: row.created_at,
      updated_at: row.updated_at,
    })
  }
}

const CLIENT_COLUMNS: &str = "id, owner_id, name, email, phone, company, address, postal_code, \
                              city, country, created_at, updated_at";

pub struct PostgresClientRepository {
  pool: PgPool,
}

impl PostgresClientRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl ClientRepository for PostgresClientRepository {
  async fn create(&self, client: Client) -> Result<Client, CatalogError> {
    let row = sqlx::query_as::<_, ClientRow>(&format!(
      r#"
            INSERT INTO clients (
                id, owner_id, name, email, phone, company, address, postal_code,
                city, country, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {CLIENT_COLUMNS}
            "#
    ))
    .bind(client.id)
    .bind(client.owner_id)
    .bind(client.name.value())
    .bind(client.email.as_str())
    .bind(&client.phone)
    .bind(&client.company)
    .bind(&client.address.address)
    .bind(&client.address.postal_code)
    .bind(&client.address.city)
    .bind(&client.address.country)
    .bind(client.created_at)
    .bind(client.updated_at)
    .fetch_one(&self.pool)
    .await?;

    row.try_into()
  }

  async fn update(&self, client: Client) -> Result<Client, CatalogError> {
    let row = sqlx::query_as::<_, ClientRow>(&format!(
      r#"
            UPDATE clients
            SET name = $3, email = $4, phone = $5, company = $6, address = $7,
                postal_code = $8, city = $9, country = $10, updated_at = $11
            WHERE id = $1 AND owner_id = $2
            RETURNING {CLIENT_COLUMNS}
            "#
    ))
    .bind(client.id)
    .bind(client.owner_id)
    .bind(client.name.value())
    .bind(client.email.as_str())
    .bind(&client.phone)
    .bind(&client.company)
    .bind(&client.address.address)
    .bind(&client.address.postal_code)
    .bind(&client.address.city)
    .bind(&client.address.country)
    .bind(client.updated_at)
    .fetch_optional(&self.pool)
    .await?
    .ok_or(CatalogError::ClientNotFound(client.id))?;

    row.try_into()
  }

  async fn find_by_id(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Client>, CatalogError> {
    let row = sqlx::query_as::<_, ClientRow>(&format!(
      "SELECT {CLIENT_COLUMNS} FROM clients WHERE id = $1 AND owner_id = $2"
    ))
    .bind(id)
    .bind(owner_id)
    .fetch_optional(&self.pool)
    .await?;

    row.map(|r| r.try_into()).transpose()
  }

  async fn list(&self, owner_id: Uuid) -> Result<Vec<Client>, CatalogError> {
    let rows = sqlx::query_as::<_, ClientRow>(&format!(
      "SELECT {CLIENT_COLUMNS} FROM clients WHERE owner_id = $1 ORDER BY name ASC"
    ))
    .bind(owner_id)
    .fetch_all(&self.pool)
    .await?;

    rows.into_iter().map(|r| r.try_into()).collect()
  }

  async fn is_referenced(&self, owner_id: Uuid, id: Uuid) -> Result<bool, CatalogError> {
    let referenced: bool = sqlx::query_scalar(
      r#"
            SELECT EXISTS (SELECT 1 FROM invoices WHERE client_id = $1 AND owner_id = $2)
                OR EXISTS (SELECT 1 FROM quotes WHERE client_id = $1 AND owner_id = $2)
            "#,
    )
    .bind(id)
    .bind(owner_id)
    .fetch_one(&self.pool)
    .await?;

    Ok(referenced)
  }

  async fn delete(&self, owner_id: Uuid, id: Uuid) -> Result<bool, CatalogError> {
    let result = sqlx::query("DELETE FROM clients WHERE id = $1 AND owner_id = $2")
      .bind(id)
      .bind(owner_id)
      .execute(&self.pool)
      .await
      .map_err(|e| {
        // invoices/quotes created after the reference check
        if let sqlx::Error::Database(db_err) = &e {
          if db_err.code().as_deref() == Some("23503") {
            return CatalogError::ClientInUse(id);
          }
        }
        CatalogError::Database(e)
      })?;

    Ok(result.rows_affected() > 0)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::infrastructure::persistence::postgres::test_support::setup_test_db;

  fn sample_client(owner_id: Uuid, name: &str) -> Client {
    Client::new(
      owner_id,
      ClientName::new(name.to_string()).unwrap(),
      Email::new("billing@acme.test").unwrap(),
      Some("+33 1 23 45 67 89".to_string()),
      None,
      ClientAddress::new(
        Some("1 rue de la Paix".to_string()),
        Some("75002".to_string()),
        Some("Paris".to_string()),
        Some("France".to_string()),
      ),
    )
  }

  #[tokio::test]
  #[ignore = "requires Docker"]
  async fn test_create_and_find_client() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresClientRepository::new(pool);
    let owner_id = Uuid::new_v4();

    let created = repo.create(sample_client(owner_id, "Acme")).await.unwrap();
    let found = repo.find_by_id(owner_id, created.id).await.unwrap().unwrap();

    assert_eq!(found.name.value(), "Acme");
    assert_eq!(found.address.city.as_deref(), Some("Paris"));
  }

  #[tokio::test]
  #[ignore = "requires Docker"]
  async fn test_other_owner_sees_nothing() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresClientRepository::new(pool);
    let owner_id = Uuid::new_v4();
    let stranger = Uuid::new_v4();

    let created = repo.create(sample_client(owner_id, "Acme")).await.unwrap();

    assert!(repo.find_by_id(stranger, created.id).await.unwrap().is_none());
    assert!(repo.list(stranger).await.unwrap().is_empty());
    assert!(!repo.delete(stranger, created.id).await.unwrap());
  }

  #[tokio::test]
  #[ignore = "requires Docker"]
  async fn test_update_and_delete_client() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresClientRepository::new(pool);
    let owner_id = Uuid::new_v4();

    let mut client = repo.create(sample_client(owner_id, "Acme")).await.unwrap();
    client.update(
      ClientName::new("Acme Corp".to_string()).unwrap(),
      Email::new("ap@acme.test").unwrap(),
      None,
      Some("Acme Holdings".to_string()),
      ClientAddress::default(),
    );
    let updated = repo.update(client).await.unwrap();
    assert_eq!(updated.name.value(), "Acme Corp");
    assert!(updated.address.is_empty());

    assert!(!repo.is_referenced(owner_id, updated.id).await.unwrap());
    assert!(repo.delete(owner_id, updated.id).await.unwrap());
    assert!(repo.find_by_id(owner_id, updated.id).await.unwrap().is_none());
  }
}
