mod app;
mod domain;
mod repo;
mod server;
mod usecase;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use app::App;
use repo::TodoRepository;
use repo::json_file::JsonFileTodoRepo;
use repo::memory::InMemoryTodoRepo;
use usecase::validation::FieldPolicy;

const DEFAULT_DATA_FILE: &str = "todos.json";

#[derive(Parser, Debug)]
#[command(author, version, about = "Small REST todo service with file-backed state", long_about = None)]
struct Args {
    /// Address to bind
    #[arg(long, env = "TODO_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// Path to the JSON state file (default: todos.json beside the executable)
    #[arg(long, env = "TODO_DATA_FILE")]
    data_file: Option<PathBuf>,

    /// Keep todos in memory only; nothing survives a restart
    #[arg(long, default_value_t = false)]
    memory: bool,

    /// Start with demo tasks (implies --memory)
    #[arg(long, default_value_t = false)]
    demo: bool,

    /// Reject create/update bodies missing title or description
    #[arg(long, default_value_t = false)]
    strict: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,todo_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let repo: Box<dyn TodoRepository> = if args.demo {
        tracing::warn!("demo mode: todos are not persisted");
        Box::new(InMemoryTodoRepo::with_seed(seed_todos()))
    } else if args.memory {
        tracing::warn!("memory mode: todos are not persisted");
        Box::new(InMemoryTodoRepo::default())
    } else {
        let path = match args.data_file.clone() {
            Some(path) => path,
            None => default_data_file()?,
        };
        let repo = JsonFileTodoRepo::open(&path)
            .with_context(|| format!("failed to load todo store from {}", path.display()))?;
        Box::new(repo)
    };

    let policy = if args.strict {
        FieldPolicy::Strict
    } else {
        FieldPolicy::Permissive
    };

    let listener = tokio::net::TcpListener::bind((args.host.as_str(), args.port))
        .await
        .with_context(|| format!("failed to bind {}:{}", args.host, args.port))?;
    let addr = listener.local_addr().context("failed to read bound address")?;
    tracing::info!(%addr, ?policy, "todo server listening");

    axum::serve(listener, server::router(App::new(repo, policy)))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("todo server stopped");
    Ok(())
}

fn seed_todos() -> Vec<(&'static str, &'static str)> {
    vec![
        ("Buy groceries", "I should buy groceries"),
        ("Write documentation", "Describe the REST endpoints"),
        ("Draft release notes", "Summarize what changed"),
    ]
}

fn default_data_file() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("failed to resolve executable path")?;
    let dir = exe
        .parent()
        .context("executable path has no parent directory")?;
    Ok(dir.join(DEFAULT_DATA_FILE))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
