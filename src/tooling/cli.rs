//! CLI Tooling
//!
//! Workspace-scoped commands: run the project API, inspect and delete stored
//! projects, and print the effective configuration.

use crate::api::{DeleteRequest, ListRequest, LoadRequest, ProjectApi};
use crate::config::{ConfigLoader, PlaygroundConfig};
use crate::error::{ApiError, StorageError};
use crate::logging::LoggingConfig;
use crate::session::LoadedProject;
use crate::store::SledProjectStore;
use crate::tree::node;
use crate::tree::FileTree;
use crate::types::ProjectSummary;
use clap::{Parser, Subcommand};
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Playground - project persistence API for the live code playground
#[derive(Parser)]
#[command(name = "playground")]
#[command(about = "Project persistence API and tooling for the live code playground")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Shorthand for --log-level debug
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Logging settings from config with command-line overrides applied.
    pub fn logging_config(&self, base: &LoggingConfig) -> LoggingConfig {
        let mut config = base.clone();
        if self.verbose {
            config.level = "debug".to_string();
        }
        if let Some(level) = &self.log_level {
            config.level = level.clone();
        }
        if let Some(format) = &self.log_format {
            config.format = format.clone();
        }
        if let Some(output) = &self.log_output {
            config.output = output.clone();
        }
        if let Some(file) = &self.log_file {
            config.file = Some(file.clone());
        }
        config
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the project API until interrupted
    Serve {
        /// Listen host (overrides config)
        #[arg(long)]
        host: Option<String>,
        /// Listen port (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Inspect and manage stored projects
    Project {
        #[command(subcommand)]
        command: ProjectCommands,
    },
    /// Configuration commands
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ProjectCommands {
    /// List a user's projects, most recent first
    List {
        /// User id (defaults to session.user_id)
        #[arg(long)]
        user: Option<String>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show a project's file tree and dependencies
    Show {
        /// Project id
        id: String,
        /// User id (defaults to session.user_id)
        #[arg(long)]
        user: Option<String>,
    },
    /// Delete a project
    Delete {
        /// Project id
        id: String,
        /// User id (defaults to session.user_id)
        #[arg(long)]
        user: Option<String>,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration as TOML
    Show,
}

/// CLI context: resolved configuration plus a lazily opened project store.
pub struct CliContext {
    workspace_root: PathBuf,
    config: PlaygroundConfig,
    api: parking_lot::Mutex<Option<Arc<ProjectApi>>>,
}

impl CliContext {
    /// Create a new CLI context
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = if let Some(cfg_path) = &config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&workspace_root)?
        };
        Ok(Self::with_config(workspace_root, config))
    }

    pub fn with_config(workspace_root: PathBuf, config: PlaygroundConfig) -> Self {
        Self {
            workspace_root,
            config,
            api: parking_lot::Mutex::new(None),
        }
    }

    pub fn config(&self) -> &PlaygroundConfig {
        &self.config
    }

    /// Open the sled store on first use.
    pub fn api(&self) -> Result<Arc<ProjectApi>, ApiError> {
        let mut slot = self.api.lock();
        if let Some(api) = slot.as_ref() {
            return Ok(Arc::clone(api));
        }
        let store_path = self.config.storage.resolve_path(&self.workspace_root)?;
        let store = SledProjectStore::open(&store_path).map_err(|e| {
            ApiError::StorageError(StorageError::IoError(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("Failed to open project store at {}: {}", store_path.display(), e),
            )))
        })?;
        info!(path = %store_path.display(), "project store opened");
        let api = Arc::new(
            ProjectApi::new(Arc::new(store))
                .with_assets_bucket(self.config.storage.assets_bucket.clone()),
        );
        *slot = Some(Arc::clone(&api));
        Ok(api)
    }

    /// Execute a CLI command
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Serve { host, port } => self.handle_serve(host.clone(), *port),
            Commands::Project { command } => match command {
                ProjectCommands::List { user, format } => {
                    self.handle_project_list(self.user(user), format)
                }
                ProjectCommands::Show { id, user } => self.handle_project_show(id, self.user(user)),
                ProjectCommands::Delete { id, user, yes } => {
                    self.handle_project_delete(id, self.user(user), *yes)
                }
            },
            Commands::Config { command } => match command {
                ConfigCommands::Show => ConfigLoader::to_toml(&self.config)
                    .map_err(|e| ApiError::ConfigError(format!("Failed to render config: {}", e))),
            },
        }
    }

    fn user<'a>(&'a self, user: &'a Option<String>) -> &'a str {
        user.as_deref().unwrap_or(&self.config.session.user_id)
    }

    fn handle_serve(&self, host: Option<String>, port: Option<u16>) -> Result<String, ApiError> {
        let mut server = self.config.server.clone();
        if let Some(host) = host {
            server.host = host;
        }
        if let Some(port) = port {
            server.port = port;
        }
        let addr = server.socket_addr()?;
        let api = self.api()?;

        let rt = tokio::runtime::Runtime::new()
            .map_err(|e| ApiError::Internal(format!("Failed to create runtime: {}", e)))?;
        rt.block_on(async move {
            let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
                ApiError::ConfigError(format!("Failed to bind {}: {}", addr, e))
            })?;
            crate::server::serve(listener, api, async {
                let _ = tokio::signal::ctrl_c().await;
                info!("shutdown requested");
            })
            .await
            .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))
        })?;
        Ok("Server stopped".to_string())
    }

    fn handle_project_list(&self, user: &str, format: &str) -> Result<String, ApiError> {
        let projects = self.api()?.list(ListRequest {
            user_id: Some(user.to_string()),
        })?;
        match format {
            "json" => serde_json::to_string_pretty(&projects)
                .map_err(|e| ApiError::Internal(format!("Failed to encode projects: {}", e))),
            "text" => Ok(format_project_table(user, &projects)),
            other => Err(ApiError::ValidationError(format!(
                "Invalid format: {} (must be 'text' or 'json')",
                other
            ))),
        }
    }

    fn handle_project_show(&self, project_id: &str, user: &str) -> Result<String, ApiError> {
        let response = self.api()?.load(LoadRequest {
            project_id: Some(project_id.to_string()),
            user_id: Some(user.to_string()),
        })?;
        let project = LoadedProject::try_from(response)
            .map_err(|e| ApiError::Internal(format!("Stored project is malformed: {}", e)))?;
        Ok(format_project(&project))
    }

    fn handle_project_delete(
        &self,
        project_id: &str,
        user: &str,
        yes: bool,
    ) -> Result<String, ApiError> {
        if !yes {
            use dialoguer::Confirm;
            let confirmed = Confirm::new()
                .with_prompt(format!("Delete project '{}' for user '{}'?", project_id, user))
                .interact()
                .map_err(|e| ApiError::ConfigError(format!("Failed to get user input: {}", e)))?;

            if !confirmed {
                return Ok("Deletion cancelled".to_string());
            }
        }

        let response = self.api()?.delete(DeleteRequest {
            project_id: Some(project_id.to_string()),
            user_id: Some(user.to_string()),
        })?;
        Ok(format!("{}", response.message.green()))
    }
}

fn format_project_table(user: &str, projects: &[ProjectSummary]) -> String {
    if projects.is_empty() {
        return format!("No projects saved for user '{}'.", user);
    }
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Project", "Updated At"]);
    for project in projects {
        table.add_row(vec![
            project.project_id.clone(),
            project.updated_at.to_rfc3339(),
        ]);
    }
    table.to_string()
}

fn format_project(project: &LoadedProject) -> String {
    let tree = FileTree::new(project.files.clone());
    let nodes = tree.project();

    let mut out = String::new();
    out.push_str(&format!("{}\n", project.project_id.bold().underline()));
    out.push_str(&format!("  Updated: {}\n", project.updated_at.to_rfc3339()));
    out.push_str(&format!(
        "  Files: {} ({} shown)\n\n",
        tree.len(),
        node::count_files(&nodes)
    ));
    out.push_str(&node::render(&nodes));

    let deps = project.config.dependencies();
    out.push('\n');
    if deps.is_empty() {
        out.push_str("No dependencies\n");
    } else {
        out.push_str(&format!("{}\n", "Dependencies".bold()));
        for (name, version) in deps {
            out.push_str(&format!("  {} {}\n", name, version.dimmed()));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::SaveRequest;
    use crate::config::StorageConfig;
    use serde_json::json;

    fn context(temp: &tempfile::TempDir) -> CliContext {
        let config = PlaygroundConfig {
            storage: StorageConfig {
                path: Some(temp.path().join("store")),
                assets_bucket: None,
            },
            ..PlaygroundConfig::default()
        };
        CliContext::with_config(temp.path().to_path_buf(), config)
    }

    fn seed(ctx: &CliContext, user: &str, project: &str) {
        ctx.api()
            .unwrap()
            .save(SaveRequest {
                project_id: Some(project.to_string()),
                user_id: Some(user.to_string()),
                files: Some(json!({
                    "/App.js": {"code": "app"},
                    "/src/util.js": {"code": "util"},
                    "/secret.js": {"code": "s", "hidden": true}
                })),
                config: Some(json!({"dependenciesJson": "{\"axios\": \"latest\"}"})),
            })
            .unwrap();
    }

    #[test]
    fn test_project_list_json() {
        let temp = tempfile::tempdir().unwrap();
        let ctx = context(&temp);
        seed(&ctx, "local-user", "p1");

        let output = ctx
            .execute(&Commands::Project {
                command: ProjectCommands::List {
                    user: None,
                    format: "json".to_string(),
                },
            })
            .unwrap();
        let parsed: Vec<ProjectSummary> = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].project_id, "p1");
    }

    #[test]
    fn test_project_list_empty_text() {
        let temp = tempfile::tempdir().unwrap();
        let ctx = context(&temp);
        let output = ctx
            .execute(&Commands::Project {
                command: ProjectCommands::List {
                    user: Some("nobody".to_string()),
                    format: "text".to_string(),
                },
            })
            .unwrap();
        assert_eq!(output, "No projects saved for user 'nobody'.");
    }

    #[test]
    fn test_project_show_renders_tree_and_dependencies() {
        let temp = tempfile::tempdir().unwrap();
        let ctx = context(&temp);
        seed(&ctx, "u1", "p1");

        let output = ctx
            .execute(&Commands::Project {
                command: ProjectCommands::Show {
                    id: "p1".to_string(),
                    user: Some("u1".to_string()),
                },
            })
            .unwrap();
        assert!(output.contains("src/"));
        assert!(output.contains("util.js"));
        assert!(!output.contains("secret.js"));
        assert!(output.contains("axios"));
    }

    #[test]
    fn test_project_delete_with_yes() {
        let temp = tempfile::tempdir().unwrap();
        let ctx = context(&temp);
        seed(&ctx, "u1", "p1");

        let delete = Commands::Project {
            command: ProjectCommands::Delete {
                id: "p1".to_string(),
                user: Some("u1".to_string()),
                yes: true,
            },
        };
        let output = ctx.execute(&delete).unwrap();
        assert!(output.contains("Project deleted successfully."));
        assert!(matches!(ctx.execute(&delete), Err(ApiError::NotFound(_))));
    }

    #[test]
    fn test_config_show() {
        let temp = tempfile::tempdir().unwrap();
        let ctx = context(&temp);
        let output = ctx
            .execute(&Commands::Config {
                command: ConfigCommands::Show,
            })
            .unwrap();
        assert!(output.contains("[session]"));
        assert!(output.contains("autosave_interval_ms = 5000"));
    }

    #[test]
    fn test_logging_overrides() {
        let cli = Cli::parse_from(["playground", "--verbose", "--log-format", "json", "config", "show"]);
        let logging = cli.logging_config(&LoggingConfig::default());
        assert_eq!(logging.level, "debug");
        assert_eq!(logging.format, "json");
        assert_eq!(logging.output, "stderr");
    }
}
