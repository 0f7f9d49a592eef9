//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;

use crate::domain::ports::{MockSequenceAnalysis, MockUserAccounts};
use crate::domain::{HashCost, LoginId, PasswordHash, PersonName, User, UserId};

use super::state::HttpState;

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Names the cookie `session` and disables the `Secure` flag for local
///   HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// State wired with the given doubles.
pub fn state_with(accounts: MockUserAccounts, analysis: MockSequenceAnalysis) -> HttpState {
    HttpState::new(Arc::new(accounts), Arc::new(analysis))
}

/// A stored account with a cheap password hash.
pub fn sample_user(login_id: &str) -> User {
    User::new(
        UserId::random(),
        LoginId::new(login_id).expect("valid login id"),
        PersonName::new("Rosalind", "first name").expect("valid name"),
        PersonName::new("Franklin", "last name").expect("valid name"),
        PasswordHash::derive("photo-51", HashCost::MINIMAL).expect("hash derives"),
    )
}
