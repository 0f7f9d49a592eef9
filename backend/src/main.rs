//! Backend entry-point: loads settings, prepares persistence and serves the
//! REST API.

mod server;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{AnalysisConfig, ServerConfig, create_server};
use virusdecode::config::AppSettings;
use virusdecode::inbound::http::health::HealthState;
use virusdecode::inbound::http::session_config::fingerprint::key_fingerprint;
use virusdecode::inbound::http::session_config::{BuildMode, session_settings};
use virusdecode::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use virusdecode::outbound::script::ScriptConfig;

fn init_tracing() {
    if let Err(error) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(%error, "tracing init failed");
    }
}

async fn connect_database(database_url: &str) -> Result<DbPool> {
    let applied = run_pending_migrations(database_url)
        .await
        .wrap_err("failed to apply database migrations")?;
    info!(applied, "database migrations up to date");
    DbPool::new(PoolConfig::new(database_url))
        .await
        .wrap_err("failed to build database pool")
}

#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let settings = AppSettings::load().wrap_err("failed to load settings")?;
    let bind_addr = settings.bind_addr().wrap_err("invalid bind address")?;

    let session = session_settings(&settings.session_toggles(), BuildMode::from_debug_assertions())
        .wrap_err("invalid session configuration")?;
    info!(fingerprint = %key_fingerprint(&session.key), "session key loaded");

    let script = ScriptConfig::new(settings.interpreter(), settings.script_path())
        .with_timeout(settings.script_timeout());
    if !script.script_path().is_file() {
        warn!(
            script = %script.script_path().display(),
            "analysis script not found; analysis requests will fail"
        );
    }
    let analysis = AnalysisConfig::new(
        script,
        settings.workspace_root(),
        settings.keep_workspaces(),
    );

    let mut config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        bind_addr,
        analysis,
    );
    if let Some(database_url) = settings.database_url.as_deref() {
        config = config.with_db_pool(connect_database(database_url).await?);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config).wrap_err("failed to start server")?;
    info!(%bind_addr, "listening");

    let result = server.await;
    health_state.mark_draining();
    result.wrap_err("server terminated with an error")
}
