//! The init command

use async_trait::async_trait;
use console::style;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};
use trellis_command::{Command, CommandArgs};
use trellis_core::{CliConfig, Error, Result};
use trellis_package::{
    Installer, ManagedPackage, ManagedPackageOptions, RegistryInstaller, VersionResolver,
    VersionSource,
};

use crate::catalogue::{TemplateCatalogue, TemplateInfo};
use crate::project::{
    empty_dir, is_dir_empty, validate_project_name, validate_version, ProjectInfo, ProjectType,
    DEFAULT_PROJECT_VERSION,
};
use crate::prompt::Prompter;

/// Directory inside a template package copied into the project
pub const TEMPLATE_DIR: &str = "template";

/// Scaffolds a project from a catalogue template
pub struct InitCommand {
    config: CliConfig,
    cwd: PathBuf,
    project_name: Option<String>,
    force: bool,
    prompter: Box<dyn Prompter>,
    catalogue: TemplateCatalogue,
    templates: Vec<TemplateInfo>,
    resolver: Arc<dyn VersionSource>,
    installer: Arc<dyn Installer>,
}

impl InitCommand {
    /// Init command working in the process's current directory
    pub fn new(config: CliConfig, prompter: Box<dyn Prompter>) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        let resolver = VersionResolver::new(&config)?;
        let installer = RegistryInstaller::new(resolver.clone());
        let catalogue = TemplateCatalogue::new(&config)?;

        Ok(Self {
            config,
            cwd,
            project_name: None,
            force: false,
            prompter,
            catalogue,
            templates: Vec::new(),
            resolver: Arc::new(resolver),
            installer: Arc::new(installer),
        })
    }

    /// Scaffold into `cwd` instead of the current directory
    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = cwd.into();
        self
    }

    pub fn project_name(&self) -> Option<&str> {
        self.project_name.as_deref()
    }

    pub fn force(&self) -> bool {
        self.force
    }

    /// Check the working directory and collect the project details
    ///
    /// Returns `None` for component scaffolds, which have no template yet.
    pub async fn prepare(&mut self) -> Result<Option<ProjectInfo>> {
        self.templates = self.catalogue.fetch().await?;
        debug!("{} templates available", self.templates.len());

        if !is_dir_empty(&self.cwd)? {
            let mut force = self.force;
            if !force {
                force = self.prompter.confirm(
                    "The current directory is not empty. Create the project anyway?",
                    false,
                )?;
            }

            if force {
                let confirmed = self.prompter.confirm(
                    "This removes every file in the current directory. Continue?",
                    false,
                )?;
                if confirmed {
                    info!("Emptying {}", self.cwd.display());
                    empty_dir(&self.cwd)?;
                }
            }
        }

        self.project_info()
    }

    fn project_info(&mut self) -> Result<Option<ProjectInfo>> {
        let types: Vec<String> = ProjectType::ALL
            .iter()
            .map(|t| t.label().to_string())
            .collect();
        let choice = self.prompter.select("Select a type", &types, 0)?;
        let project_type = *ProjectType::ALL
            .get(choice)
            .ok_or_else(|| Error::prompt(format!("no project type at index {}", choice)))?;
        debug!("Create type: {:?}", project_type);

        if project_type == ProjectType::Component {
            return Ok(None);
        }

        if self.templates.is_empty() {
            return Err(Error::template_not_found("no project templates are published"));
        }
        let names: Vec<String> = self.templates.iter().map(|t| t.name.clone()).collect();
        let choice = self.prompter.select("Select a project template", &names, 0)?;
        let template_key = self
            .templates
            .get(choice)
            .map(|t| t.key.clone())
            .ok_or_else(|| Error::prompt(format!("no project template at index {}", choice)))?;

        let project_name = self.prompter.input(
            "Project name",
            self.project_name.as_deref(),
            &|value| {
                if validate_project_name(value) {
                    Ok(())
                } else {
                    Err("Project name is not valid".to_string())
                }
            },
        )?;

        let description = self.prompter.input("Description", None, &|_| Ok(()))?;

        let raw_version = self.prompter.input(
            "Version",
            Some(DEFAULT_PROJECT_VERSION),
            &|value| match validate_version(value) {
                Some(_) => Ok(()),
                None => Err("Version is not valid semver".to_string()),
            },
        )?;
        let version = validate_version(&raw_version).unwrap_or(raw_version);

        Ok(Some(ProjectInfo {
            project_type,
            template_key,
            project_name,
            description,
            version,
        }))
    }

    /// Install (or update) the template package in the template store
    pub async fn download_template(&self, info: &ProjectInfo) -> Result<ManagedPackage> {
        let template = TemplateCatalogue::find(&self.templates, &info.template_key)?;

        let mut package = ManagedPackage::new(
            ManagedPackageOptions {
                target_path: self.config.templates_dir(),
                store_dir: Some(self.config.template_store_dir()),
                package_name: template.package_name.clone(),
                package_version: template.version.clone(),
            },
            self.resolver.clone(),
            self.installer.clone(),
        )?;

        if package.exists().await? {
            package.update().await?;
        } else {
            package.install().await?;
        }

        Ok(package)
    }

    /// Copy the template files into the working directory
    pub fn install_template(&self, package: &ManagedPackage) -> Result<usize> {
        debug!("Template cache: {}", package.package_dir().display());
        debug!("Current path: {}", self.cwd.display());
        std::fs::create_dir_all(&self.cwd)?;
        package.copy_to(TEMPLATE_DIR, &self.cwd)
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }
}

#[async_trait]
impl Command for InitCommand {
    fn name(&self) -> &str {
        "init"
    }

    async fn init(&mut self, args: &CommandArgs) -> Result<()> {
        self.project_name = args.positional(0).map(str::to_string);
        self.force = args.options.flag("force");
        debug!(
            "projectName: {:?}, force: {}",
            self.project_name, self.force
        );
        Ok(())
    }

    async fn exec(&mut self) -> Result<()> {
        let Some(info) = self.prepare().await? else {
            println!("{} Nothing to scaffold for components yet", style("ℹ").blue().bold());
            return Ok(());
        };

        println!("{}", serde_json::to_string_pretty(&info)?);

        let package = self.download_template(&info).await?;
        let copied = self.install_template(&package)?;

        println!(
            "{} Created {} from {}@{} ({} files)",
            style("✓").green().bold(),
            info.project_name,
            package.package_name(),
            package.package_version(),
            copied
        );
        Ok(())
    }
}
