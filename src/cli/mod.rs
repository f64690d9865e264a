mod commands;
pub mod error;
pub mod output;

use std::net::IpAddr;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

#[derive(Parser)]
#[command(name = "taskport")]
#[command(author, version, about = "MCP adapter for the Taskdeck project-management API", long_about = None)]
pub struct Cli {
    /// Override the backend API URL (default: TASKPORT_API_URL or http://localhost:3000)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP transport
    Serve {
        /// Listen port (default: TASKPORT_PORT or 3333)
        #[arg(long)]
        port: Option<u16>,
        /// Listen host (default: TASKPORT_HOST or 127.0.0.1)
        #[arg(long)]
        host: Option<IpAddr>,
    },
    /// Run the stdio transport
    Stdio,
    /// Task commands
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },
    /// Project commands
    Project {
        #[command(subcommand)]
        command: ProjectCommands,
    },
    /// Document commands
    Document {
        #[command(subcommand)]
        command: DocumentCommands,
    },
}

#[derive(Subcommand)]
enum TaskCommands {
    /// List tasks in a project
    List {
        /// Filter by status; 'all' lists every status
        #[arg(long)]
        status: Option<String>,
        /// Project ID (default: the configured project)
        #[arg(long)]
        project_id: Option<String>,
        /// Output format (table or json)
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Show one task as JSON
    Get {
        /// Task ID
        id: String,
    },
    /// Create a task
    Create {
        /// Task title
        title: String,
        #[arg(long)]
        description: Option<String>,
        /// Priority (low, medium, high, urgent)
        #[arg(long)]
        priority: Option<String>,
        #[arg(long)]
        project_id: Option<String>,
    },
    /// Mark a task as done
    Complete {
        /// Task ID
        id: String,
    },
}

#[derive(Subcommand)]
enum ProjectCommands {
    /// List projects
    List {
        /// Output format (table or json)
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Show one project as JSON
    Get {
        /// Project ID ('default' or omitted for the configured project)
        id: Option<String>,
    },
}

#[derive(Subcommand)]
enum DocumentCommands {
    /// List documents in a project
    List {
        #[arg(long)]
        project_id: Option<String>,
        /// Output format (table or json)
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Show one document as JSON
    Get {
        /// Document ID
        id: String,
    },
}

fn init_tracing(config: &Config) {
    let default_filter = config
        .log_filter
        .clone()
        .unwrap_or_else(|| "taskport=info".to_string());

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// CLI entry point; exit code 1 on any handled failure.
pub async fn run() -> miette::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url.trim_end_matches('/').to_string();
    }

    init_tracing(&config);

    match cli.command {
        Commands::Serve { port, host } => {
            commands::serve::run_http(config, port, host).await?;
        }
        Commands::Stdio => {
            commands::serve::run_stdio(config).await?;
        }
        Commands::Task { command } => {
            let backend = crate::backend::HttpBackend::from_config(&config)
                .map_err(error::CliError::from)?;
            let output = match command {
                TaskCommands::List {
                    status,
                    project_id,
                    format,
                } => {
                    commands::task::list(
                        &backend,
                        &config.default_project,
                        status.as_deref(),
                        project_id.as_deref(),
                        &format,
                    )
                    .await?
                }
                TaskCommands::Get { id } => commands::task::get(&backend, &id).await?,
                TaskCommands::Create {
                    title,
                    description,
                    priority,
                    project_id,
                } => {
                    commands::task::create(
                        &backend,
                        &config.default_project,
                        &title,
                        description.as_deref(),
                        priority.as_deref(),
                        project_id.as_deref(),
                    )
                    .await?
                }
                TaskCommands::Complete { id } => commands::task::complete(&backend, &id).await?,
            };
            println!("{output}");
        }
        Commands::Project { command } => {
            let backend = crate::backend::HttpBackend::from_config(&config)
                .map_err(error::CliError::from)?;
            let output = match command {
                ProjectCommands::List { format } => {
                    commands::project::list(&backend, &format).await?
                }
                ProjectCommands::Get { id } => {
                    commands::project::get(&backend, &config.default_project, id.as_deref()).await?
                }
            };
            println!("{output}");
        }
        Commands::Document { command } => {
            let backend = crate::backend::HttpBackend::from_config(&config)
                .map_err(error::CliError::from)?;
            let output = match command {
                DocumentCommands::List { project_id, format } => {
                    commands::document::list(
                        &backend,
                        &config.default_project,
                        project_id.as_deref(),
                        &format,
                    )
                    .await?
                }
                DocumentCommands::Get { id } => commands::document::get(&backend, &id).await?,
            };
            println!("{output}");
        }
    }

    Ok(())
}
