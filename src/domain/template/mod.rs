pub mod content;
pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;

pub use content::{ElementKind, FontWeight, ItemColumn, TemplateContent, TemplateElement, TextAlign};
pub use entities::{Template, TemplateKind, TemplateName};
pub use errors::TemplateError;
pub use ports::TemplateRepository;
pub use services::{TemplateData, TemplateService};
