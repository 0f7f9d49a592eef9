//! Shared wiring for HTTP integration tests.
//!
//! Builds the real services over an in-memory account store, a temporary
//! workspace root and the stub analysis script.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, test, web};
use serde_json::Value;

use virusdecode::Trace;
use virusdecode::domain::ports::{SubmissionStore, UserRepository};
use virusdecode::domain::{HashCost, SequenceAnalysisService, UserAccountService};
use virusdecode::inbound::http::input_seq::{alignment, reference_metadata};
use virusdecode::inbound::http::state::HttpState;
use virusdecode::inbound::http::users::{current_user, login, logout, signup};
use virusdecode::inbound::http::validation::json_config;
use virusdecode::outbound::memory::InMemoryUserRepository;
use virusdecode::outbound::script::{ScriptAnalysisProvider, ScriptConfig, ScriptRunner};
use virusdecode::outbound::workspace::CapStdSubmissionStore;
use virusdecode::test_support::analysis_script::{STUB_INTERPRETER, StubScript};

/// Real adapters around a stub script.
pub struct Harness {
    pub script: StubScript,
    pub accounts: Arc<InMemoryUserRepository>,
    pub store: Arc<CapStdSubmissionStore>,
}

impl Harness {
    pub fn new() -> Self {
        let script = StubScript::write().expect("write stub script");
        let store = Arc::new(
            CapStdSubmissionStore::open(script.scratch_dir()).expect("open workspace root"),
        );
        Self {
            script,
            accounts: Arc::new(InMemoryUserRepository::new()),
            store,
        }
    }

    pub fn state(&self) -> HttpState {
        self.state_over(self.accounts.clone())
    }

    /// Same wiring, with accounts kept in `repository` instead.
    pub fn state_over(&self, repository: Arc<dyn UserRepository>) -> HttpState {
        let store: Arc<dyn SubmissionStore> = self.store.clone();
        let runner = ScriptRunner::new(ScriptConfig::new(STUB_INTERPRETER, self.script.path()));
        let provider = ScriptAnalysisProvider::new(runner, Arc::clone(&store));
        let analysis = SequenceAnalysisService::new(store, Arc::new(provider));
        let accounts = UserAccountService::with_hash_cost(repository, HashCost::MINIMAL);
        HttpState::new(Arc::new(accounts), Arc::new(analysis))
    }
}

/// The full route table over `state`.
pub fn build_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build();
    App::new()
        .app_data(web::Data::new(state))
        .app_data(json_config())
        .wrap(Trace)
        .service(
            web::scope("/user")
                .wrap(session)
                .service(signup)
                .service(login)
                .service(current_user)
                .service(logout),
        )
        .service(
            web::scope("/inputSeq")
                .service(reference_metadata)
                .service(alignment),
        )
}

/// Status and decoded JSON body (`Null` when empty).
pub async fn status_and_json(response: ServiceResponse) -> (u16, Value) {
    let status = response.status().as_u16();
    let bytes = test::read_body(response).await;
    if bytes.is_empty() {
        return (status, Value::Null);
    }
    (status, serde_json::from_slice(&bytes).expect("JSON body"))
}
