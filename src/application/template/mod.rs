pub mod create_template;
pub mod delete_template;
pub mod get_default_template;
pub mod get_template;
pub mod list_templates;
pub mod set_default_template;
pub mod update_template;

pub use create_template::{CreateTemplateCommand, CreateTemplateUseCase, TemplateFields};
pub use delete_template::{DeleteTemplateCommand, DeleteTemplateUseCase};
pub use get_default_template::{GetDefaultTemplateCommand, GetDefaultTemplateUseCase};
pub use get_template::{GetTemplateCommand, GetTemplateUseCase, TemplateDto};
pub use list_templates::{ListTemplatesCommand, ListTemplatesResponse, ListTemplatesUseCase};
pub use set_default_template::{SetDefaultTemplateCommand, SetDefaultTemplateUseCase};
pub use update_template::{UpdateTemplateCommand, UpdateTemplateUseCase};
