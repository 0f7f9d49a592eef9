//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::{AnalysisConfig, ServerConfig};

use state_builders::build_http_state;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite, time::Duration};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use virusdecode::Trace;
#[cfg(debug_assertions)]
use virusdecode::doc::ApiDoc;
use virusdecode::inbound::http::health::{HealthState, live, ready};
use virusdecode::inbound::http::input_seq::{alignment, reference_metadata};
use virusdecode::inbound::http::state::HttpState;
use virusdecode::inbound::http::users::{current_user, login, logout, signup};
use virusdecode::inbound::http::validation::json_config;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

/// Uploaded FASTA files can exceed actix's 256 KiB default.
const MAX_SUBMISSION_BYTES: usize = 16 * 1024 * 1024;
const SESSION_TTL_HOURS: i64 = 2;

/// Cookie policy for the `/user` scope.
#[derive(Clone)]
struct SessionCookie {
    key: Key,
    secure: bool,
    same_site: SameSite,
}

impl SessionCookie {
    fn middleware(&self) -> SessionMiddleware<CookieSessionStore> {
        SessionMiddleware::builder(CookieSessionStore::default(), self.key.clone())
            .cookie_name("session".into())
            .cookie_path("/".into())
            .cookie_secure(self.secure)
            .cookie_http_only(true)
            .cookie_content_security(CookieContentSecurity::Private)
            .cookie_same_site(self.same_site)
            .session_lifecycle(
                PersistentSession::default().session_ttl(Duration::hours(SESSION_TTL_HOURS)),
            )
            .build()
    }
}

fn account_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(signup)
        .service(login)
        .service(current_user)
        .service(logout);
}

fn analysis_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::PayloadConfig::new(MAX_SUBMISSION_BYTES))
        .service(reference_metadata)
        .service(alignment);
}

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    session: SessionMiddleware<CookieSessionStore>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(json_config().limit(MAX_SUBMISSION_BYTES))
        .wrap(Trace)
        .service(
            web::scope("/user")
                .wrap(session)
                .configure(account_routes),
        )
        .service(web::scope("/inputSeq").configure(analysis_routes))
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct the HTTP server and mark it ready once bound.
///
/// # Errors
/// Propagates [`std::io::Error`] when the workspace root cannot be opened or
/// the socket cannot be bound.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = web::Data::new(build_http_state(&config)?);
    let cookie = SessionCookie {
        key: config.key,
        secure: config.cookie_secure,
        same_site: config.same_site,
    };
    let app_health = health_state.clone();

    let server = HttpServer::new(move || {
        build_app(app_health.clone(), http_state.clone(), cookie.middleware())
    })
    .bind(config.bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
