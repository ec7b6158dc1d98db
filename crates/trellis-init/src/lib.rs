//! The `init` command for Trellis CLI
//!
//! Scaffolds a project from a template package:
//! - Fetches the template catalogue from the Trellis API
//! - Guards non-empty working directories behind confirmations
//! - Collects project details interactively
//! - Installs the chosen template into the shared template store and copies
//!   its `template/` directory into the working directory

pub mod catalogue;
pub mod command;
pub mod project;
pub mod prompt;

pub use catalogue::{TemplateCatalogue, TemplateInfo};
pub use command::InitCommand;
pub use project::{is_dir_empty, validate_project_name, validate_version, ProjectInfo, ProjectType};
pub use prompt::{DialoguerPrompter, Prompter};
