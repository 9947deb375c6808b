use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::ValueObjectError;

lazy_static! {
  static ref HEX_COLOR: Regex =
    Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("hex color pattern compiles");
}

/// Maximum number of elements on one template.
pub const MAX_ELEMENTS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
  #[default]
  Left,
  Center,
  Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
  #[default]
  Normal,
  Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemColumn {
  Description,
  Quantity,
  UnitPrice,
  TaxRate,
  Total,
}

/// Type-specific payload of an element, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementKind {
  Text {
    content: String,
  },
  Line {
    thickness: f64,
  },
  Company {
    #[serde(default = "default_true")]
    show_logo: bool,
    #[serde(default = "default_true")]
    show_address: bool,
    #[serde(default = "default_true")]
    show_contact: bool,
  },
  Client {
    #[serde(default)]
    label: Option<String>,
    #[serde(default = "default_true")]
    show_address: bool,
    #[serde(default = "default_true")]
    show_email: bool,
    #[serde(default)]
    show_phone: bool,
  },
  Items {
    columns: Vec<ItemColumn>,
    #[serde(default = "default_true")]
    show_totals: bool,
  },
  Footer {
    content: String,
  },
  Image {
    src: String,
  },
}

fn default_true() -> bool {
  true
}

/// One positioned element of a printable layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateElement {
  pub id: String,
  pub x: f64,
  pub y: f64,
  pub width: f64,
  pub height: f64,
  #[serde(default)]
  pub rotation: f64,
  #[serde(default)]
  pub z_index: i32,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub color: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub font_size: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub font_family: Option<String>,
  #[serde(default)]
  pub font_weight: FontWeight,
  #[serde(default)]
  pub text_align: TextAlign,
  #[serde(flatten)]
  pub kind: ElementKind,
}

impl TemplateElement {
  pub fn validate(&self) -> Result<(), ValueObjectError> {
    let invalid = |msg: String| ValueObjectError::InvalidTemplateContent(format!("element '{}': {}", self.id, msg));

    if self.id.trim().is_empty() {
      return Err(ValueObjectError::InvalidTemplateContent(
        "element id cannot be empty".to_string(),
      ));
    }
    for (name, value) in [
      ("x", self.x),
      ("y", self.y),
      ("width", self.width),
      ("height", self.height),
      ("rotation", self.rotation),
    ] {
      if !value.is_finite() {
        return Err(invalid(format!("{} must be a finite number", name)));
      }
    }
    if self.width <= 0.0 || self.height <= 0.0 {
      return Err(invalid("width and height must be positive".to_string()));
    }
    if let Some(color) = &self.color {
      if !HEX_COLOR.is_match(color) {
        return Err(invalid(format!("'{}' is not a hex color", color)));
      }
    }
    if let Some(size) = self.font_size {
      if !(size.is_finite() && size > 0.0) {
        return Err(invalid("font size must be positive".to_string()));
      }
    }

    match &self.kind {
      ElementKind::Line { thickness } if !(thickness.is_finite() && *thickness > 0.0) => {
        Err(invalid("line thickness must be positive".to_string()))
      }
      ElementKind::Items { columns, .. } if columns.is_empty() => {
        Err(invalid("items element needs at least one column".to_string()))
      }
      ElementKind::Image { src } if src.trim().is_empty() => {
        Err(invalid("image source cannot be empty".to_string()))
      }
      _ => Ok(()),
    }
  }
}

/// Validated template layout, stored as a JSON array of elements.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateContent(Vec<TemplateElement>);

impl TemplateContent {
  pub fn new(elements: Vec<TemplateElement>) -> Result<Self, ValueObjectError> {
    if elements.len() > MAX_ELEMENTS {
      return Err(ValueObjectError::InvalidTemplateContent(format!(
        "a template cannot have more than {} elements",
        MAX_ELEMENTS
      )));
    }

    let mut seen = std::collections::HashSet::new();
    for element in &elements {
      element.validate()?;
      if !seen.insert(element.id.as_str()) {
        return Err(ValueObjectError::InvalidTemplateContent(format!(
          "duplicate element id '{}'",
          element.id
        )));
      }
    }
    Ok(Self(elements))
  }

  /// Parses and validates stored or submitted JSON.
  pub fn from_json(value: serde_json::Value) -> Result<Self, ValueObjectError> {
    let elements: Vec<TemplateElement> = serde_json::from_value(value)
      .map_err(|e| ValueObjectError::InvalidTemplateContent(e.to_string()))?;
    Self::new(elements)
  }

  pub fn to_json(&self) -> serde_json::Value {
    serde_json::to_value(&self.0).unwrap_or(serde_json::Value::Array(Vec::new()))
  }

  pub fn elements(&self) -> &[TemplateElement] {
    &self.0
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}
