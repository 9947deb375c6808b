use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection, PgPool};
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::template::{
  Template, TemplateContent, TemplateError, TemplateKind, TemplateName, ports::TemplateRepository,
};

#[derive(Debug, FromRow)]
struct TemplateRow {
  id: Uuid,
  owner_id: Uuid,
  name: String,
  description: Option<String>,
  kind: String,
  is_default: bool,
  content: serde_json::Value,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl TryFrom<TemplateRow> for Template {
  type Error = TemplateError;

  fn try_from(row: TemplateRow) -> Result<Self, Self::Error> {
    Ok(Template {
      id: row.id,
      owner_id: row.owner_id,
      name: TemplateName::new(row.name)?,
      description: row.description,
      kind: TemplateKind::from_str(&row.kind)?,
      is_default: row.is_default,
      content: TemplateContent::from_json(row.content)?,
      created_at: row.created_at,
      updated_at: row.updated_at,
    })
  }
}

const TEMPLATE_COLUMNS: &str =
  "id, owner_id, name, description, kind, is_default, content, created_at, updated_at";

/// Serializes default switches for one owner and kind until the transaction ends.
/// Row locks alone miss the case where no default row exists yet.
async fn lock_defaults(
  conn: &mut PgConnection,
  owner_id: Uuid,
  kind: TemplateKind,
) -> Result<(), sqlx::Error> {
  sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
    .bind(format!("templates:{owner_id}:{}", kind.as_str()))
    .execute(&mut *conn)
    .await?;
  Ok(())
}

fn map_default_conflict(err: sqlx::Error, kind: TemplateKind) -> TemplateError {
  if let sqlx::Error::Database(db_err) = &err {
    if db_err.is_unique_violation() {
      return TemplateError::DefaultConflict(kind);
    }
  }
  TemplateError::Database(err)
}

async fn clear_defaults(
  conn: &mut PgConnection,
  owner_id: Uuid,
  kind: TemplateKind,
  except: Uuid,
) -> Result<(), sqlx::Error> {
  sqlx::query(
    r#"
        UPDATE templates
        SET is_default = FALSE, updated_at = NOW()
        WHERE owner_id = $1 AND kind = $2 AND is_default AND id <> $3
        "#,
  )
  .bind(owner_id)
  .bind(kind.as_str())
  .bind(except)
  .execute(&mut *conn)
  .await?;
  Ok(())
}

pub struct PostgresTemplateRepository {
  pool: PgPool,
}

impl PostgresTemplateRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl TemplateRepository for PostgresTemplateRepository {
  async fn create(&self, template: Template) -> Result<Template, TemplateError> {
    let mut tx = self.pool.begin().await?;

    if template.is_default {
      lock_defaults(&mut *tx, template.owner_id, template.kind).await?;
      clear_defaults(&mut *tx, template.owner_id, template.kind, template.id).await?;
    }

    let row = sqlx::query_as::<_, TemplateRow>(&format!(
      r#"
            INSERT INTO templates (
                id, owner_id, name, description, kind, is_default, content, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {TEMPLATE_COLUMNS}
            "#
    ))
    .bind(template.id)
    .bind(template.owner_id)
    .bind(template.name.value())
    .bind(&template.description)
    .bind(template.kind.as_str())
    .bind(template.is_default)
    .bind(template.content.to_json())
    .bind(template.created_at)
    .bind(template.updated_at)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| map_default_conflict(e, template.kind))?;

    tx.commit().await?;
    row.try_into()
  }

  async fn update(&self, template: Template) -> Result<Template, TemplateError> {
    let mut tx = self.pool.begin().await?;

    if template.is_default {
      lock_defaults(&mut *tx, template.owner_id, template.kind).await?;
      clear_defaults(&mut *tx, template.owner_id, template.kind, template.id).await?;
    }

    let row = sqlx::query_as::<_, TemplateRow>(&format!(
      r#"
            UPDATE templates
            SET name = $3, description = $4, kind = $5, is_default = $6, content = $7,
                updated_at = $8
            WHERE id = $1 AND owner_id = $2
            RETURNING {TEMPLATE_COLUMNS}
            "#
    ))
    .bind(template.id)
    .bind(template.owner_id)
    .bind(template.name.value())
    .bind(&template.description)
    .bind(template.kind.as_str())
    .bind(template.is_default)
    .bind(template.content.to_json())
    .bind(template.updated_at)
    .fetch_optional(&mut *tx)
    .await
    .map_err(|e| map_default_conflict(e, template.kind))?
    .ok_or(TemplateError::TemplateNotFound(template.id))?;

    tx.commit().await?;
    row.try_into()
  }

  async fn delete(&self, owner_id: Uuid, id: Uuid) -> Result<bool, TemplateError> {
    let result = sqlx::query("DELETE FROM templates WHERE id = $1 AND owner_id = $2")
      .bind(id)
      .bind(owner_id)
      .execute(&self.pool)
      .await?;

    Ok(result.rows_affected() > 0)
  }

  async fn find_by_id(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Template>, TemplateError> {
    let row = sqlx::query_as::<_, TemplateRow>(&format!(
      "SELECT {TEMPLATE_COLUMNS} FROM templates WHERE id = $1 AND owner_id = $2"
    ))
    .bind(id)
    .bind(owner_id)
    .fetch_optional(&self.pool)
    .await?;

    row.map(|r| r.try_into()).transpose()
  }

  async fn list(
    &self,
    owner_id: Uuid,
    kind: Option<TemplateKind>,
  ) -> Result<Vec<Template>, TemplateError> {
    let rows = sqlx::query_as::<_, TemplateRow>(&format!(
      r#"
            SELECT {TEMPLATE_COLUMNS}
            FROM templates
            WHERE owner_id = $1 AND ($2::varchar IS NULL OR kind = $2)
            ORDER BY is_default DESC, name ASC
            "#
    ))
    .bind(owner_id)
    .bind(kind.map(|k| k.as_str()))
    .fetch_all(&self.pool)
    .await?;

    rows.into_iter().map(|r| r.try_into()).collect()
  }

  async fn set_default(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Template>, TemplateError> {
    let mut tx = self.pool.begin().await?;

    let kind: Option<String> = sqlx::query_scalar(
      "SELECT kind FROM templates WHERE id = $1 AND owner_id = $2 FOR UPDATE",
    )
    .bind(id)
    .bind(owner_id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(kind) = kind else {
      return Ok(None);
    };
    let kind = TemplateKind::from_str(&kind)?;

    lock_defaults(&mut *tx, owner_id, kind).await?;
    clear_defaults(&mut *tx, owner_id, kind, id).await?;

    let row = sqlx::query_as::<_, TemplateRow>(&format!(
      r#"
            UPDATE templates
            SET is_default = TRUE, updated_at = NOW()
            WHERE id = $1 AND owner_id = $2
            RETURNING {TEMPLATE_COLUMNS}
            "#
    ))
    .bind(id)
    .bind(owner_id)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| map_default_conflict(e, kind))?;

    tx.commit().await?;
    row.try_into().map(Some)
  }

  async fn find_default(
    &self,
    owner_id: Uuid,
    kind: TemplateKind,
  ) -> Result<Option<Template>, TemplateError> {
    let row = sqlx::query_as::<_, TemplateRow>(&format!(
      "SELECT {TEMPLATE_COLUMNS} FROM templates WHERE owner_id = $1 AND kind = $2 AND is_default"
    ))
    .bind(owner_id)
    .bind(kind.as_str())
    .fetch_optional(&self.pool)
    .await?;

    row.map(|r| r.try_into()).transpose()
  }
}
