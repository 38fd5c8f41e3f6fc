use agentmesh_a2a::{CallOptions, RetryPolicy, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT_MS};
use agentmesh_gateway::{RegistryGateway, DEFAULT_BASE_URL};
use agentmesh_mcp::{McpServer, Router};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "agentmesh", about = "AgentMesh — MCP bridge to the mesh agent registry")]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "agentmesh.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the MCP protocol on stdio (the default)
    Serve,
    /// Inspect the tool catalog
    Tools {
        #[command(subcommand)]
        action: ToolsAction,
    },
}

#[derive(Subcommand)]
enum ToolsAction {
    /// List catalog entries
    List,
}

#[derive(Deserialize, Default)]
struct MeshConfig {
    #[serde(default)]
    registry: RegistryConfig,
    #[serde(default)]
    call: CallConfig,
    /// This process's own agent id, forwarded with orchestrated calls.
    #[serde(default)]
    user_agent_id: Option<String>,
}

#[derive(Deserialize)]
struct RegistryConfig {
    #[serde(default = "default_base_url")]
    base_url: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

#[derive(Deserialize)]
struct CallConfig {
    #[serde(default = "default_timeout_ms")]
    timeout_ms: u64,
    #[serde(default = "default_max_retries")]
    max_retries: u32,
    #[serde(default = "default_backoff_base_ms")]
    backoff_base_ms: u64,
    #[serde(default = "default_backoff_max_ms")]
    backoff_max_ms: u64,
}

impl Default for CallConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            max_retries: default_max_retries(),
            backoff_base_ms: default_backoff_base_ms(),
            backoff_max_ms: default_backoff_max_ms(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}
fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}
fn default_backoff_base_ms() -> u64 {
    1_000
}
fn default_backoff_max_ms() -> u64 {
    10_000
}

/// Loads the config file; a missing file means defaults, so the server runs
/// with zero configuration.
async fn load_config(path: &Path) -> anyhow::Result<MeshConfig> {
    match tokio::fs::read_to_string(path).await {
        Ok(raw) => toml::from_str(&raw)
            .map_err(|e| anyhow::anyhow!("failed to parse {}: {}", path.display(), e)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(MeshConfig::default()),
        Err(e) => Err(anyhow::anyhow!("failed to read {}: {}", path.display(), e)),
    }
}

fn build_router(config: &MeshConfig) -> Router {
    let gateway = Arc::new(RegistryGateway::new(config.registry.base_url.clone()));
    let policy = RetryPolicy {
        backoff_base_ms: config.call.backoff_base_ms,
        backoff_max_ms: config.call.backoff_max_ms,
    };
    let defaults = CallOptions {
        timeout_ms: config.call.timeout_ms,
        max_retries: config.call.max_retries,
        user_agent_id: config.user_agent_id.clone(),
    };
    Router::new(gateway, policy, defaults)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries the protocol stream, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli.config).await?;
    let router = build_router(&config);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            info!(registry = %config.registry.base_url, "starting MCP bridge");
            McpServer::new(router).run().await?;
        }
        Commands::Tools {
            action: ToolsAction::List,
        } => {
            for descriptor in router.catalog().descriptors() {
                println!("{:<18} {}", descriptor.name, descriptor.description);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config: MeshConfig = toml::from_str("").unwrap();
        assert_eq!(config.registry.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.call.timeout_ms, 30_000);
        assert_eq!(config.call.max_retries, 1);
        assert_eq!(config.call.backoff_base_ms, 1_000);
        assert_eq!(config.call.backoff_max_ms, 10_000);
        assert!(config.user_agent_id.is_none());
    }

    #[test]
    fn partial_config_overrides_selected_fields() {
        let config: MeshConfig = toml::from_str(
            r#"
            user_agent_id = "bridge-7"

            [registry]
            base_url = "http://localhost:9100/mcp"

            [call]
            timeout_ms = 5000
            "#,
        )
        .unwrap();
        assert_eq!(config.registry.base_url, "http://localhost:9100/mcp");
        assert_eq!(config.call.timeout_ms, 5_000);
        assert_eq!(config.call.max_retries, 1); // still the default
        assert_eq!(config.user_agent_id.as_deref(), Some("bridge-7"));
    }
}
