use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::content::TemplateContent;
use crate::domain::value_objects::{ValueObjectError, required_text};

/// Document kind a template applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TemplateKind {
  Invoice,
  Quote,
  Both,
}

impl TemplateKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      TemplateKind::Invoice => "INVOICE",
      TemplateKind::Quote => "QUOTE",
      TemplateKind::Both => "BOTH",
    }
  }
}

impl fmt::Display for TemplateKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for TemplateKind {
  type Err = ValueObjectError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_uppercase().as_str() {
      "INVOICE" => Ok(TemplateKind::Invoice),
      "QUOTE" => Ok(TemplateKind::Quote),
      "BOTH" => Ok(TemplateKind::Both),
      _ => Err(ValueObjectError::InvalidStatus(format!(
        "Unknown template type: {}",
        s
      ))),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateName(String);

impl TemplateName {
  pub fn new(name: String) -> Result<Self, ValueObjectError> {
    required_text(name, "Template name", 255).map(Self)
  }

  pub fn value(&self) -> &str {
    &self.0
  }
}

// Template - printable layout handed to the external renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
  pub id: Uuid,
  pub owner_id: Uuid,
  pub name: TemplateName,
  pub description: Option<String>,
  pub kind: TemplateKind,
  pub is_default: bool,
  pub content: TemplateContent,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Template {
  pub fn new(
    owner_id: Uuid,
    name: TemplateName,
    description: Option<String>,
    kind: TemplateKind,
    is_default: bool,
    content: TemplateContent,
  ) -> Self {
    let now = Utc::now();
    Self {
      id: Uuid::new_v4(),
      owner_id,
      name,
      description,
      kind,
      is_default,
      content,
      created_at: now,
      updated_at: now,
    }
  }

  /// Default status is managed separately through `set_default`.
  pub fn update(
    &mut self,
    name: TemplateName,
    description: Option<String>,
    kind: TemplateKind,
    content: TemplateContent,
  ) {
    // A default moving to another kind would collide with that kind's default
    if kind != self.kind {
      self.is_default = false;
    }
    self.name = name;
    self.description = description;
    self.kind = kind;
    self.content = content;
    self.updated_at = Utc::now();
  }
}
