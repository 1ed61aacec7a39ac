//! `thinwiki serve` command implementation.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use tw_archive::{ArchiveFetcher, FetcherConfig, RepositoryArchive};
use tw_config::{CliSettings, Config};
use tw_pages::{PageCache, PageCacheConfig};
use tw_server::{ServerConfig, run_server};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover thinwiki.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Repository to serve as `owner/name` (overrides config).
    #[arg(short, long, env = "GITHUB_REPO")]
    repository: Option<String>,

    /// Branch to serve (overrides config).
    #[arg(short, long, env = "GITHUB_REPO_BRANCH")]
    branch: Option<String>,

    /// Shared secret for the reload endpoint (overrides config).
    #[arg(long, env = "RELOAD_TOKEN", hide_env_values = true)]
    reload_token: Option<String>,

    /// Host to bind to (overrides config).
    #[arg(long, env = "HOST")]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Enable verbose output (reload timing and request logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid, the initial load fails
    /// or the server fails to start.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            host: self.host,
            port: self.port,
            repository: self.repository,
            branch: self.branch,
            reload_token: self.reload_token,
        };

        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        config.validate_serve()?;

        let repository = config.require_repository()?.to_owned();
        let reload_token = config.require_reload_token()?.to_owned();

        output.info(&format!(
            "Repository: {repository} @ {}",
            config.repository.branch
        ));

        let cache = Arc::new(build_cache(&config, repository));

        // Serve nothing until the first snapshot is in
        let initial = Arc::clone(&cache);
        let stats = tokio::task::spawn_blocking(move || initial.reload())
            .await
            .map_err(|e| CliError::Server(e.to_string()))??;
        output.success(&format!(
            "Loaded {} pages in {:.1}s",
            stats.pages,
            stats.elapsed.as_secs_f64()
        ));

        output.info(&format!(
            "Starting server on {}:{}",
            config.server.host, config.server.port
        ));

        let server_config = ServerConfig {
            host: config.server.host.clone(),
            port: config.server.port,
            reload_token,
        };
        run_server(server_config, cache)
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }
}

/// Build the page cache for the configured repository.
fn build_cache(config: &Config, repository: String) -> PageCache {
    let fetcher = ArchiveFetcher::new(FetcherConfig {
        archive_url: config.repository.archive_url.clone(),
        default_branch: config.repository.branch.clone(),
        user_agent: config.repository.user_agent.clone(),
        timeout: Duration::from_secs(config.repository.timeout_secs),
    });
    let source = Arc::new(RepositoryArchive::new(fetcher, repository, None));

    PageCache::new(
        source,
        PageCacheConfig {
            max_entry_bytes: config.repository.max_entry_bytes,
        },
    )
}
