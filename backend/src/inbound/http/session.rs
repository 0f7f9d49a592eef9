//! Signed-in account state carried in the session cookie.
//!
//! Handlers see [`AccountSession`], never the raw Actix session. The cookie
//! holds the account id and its login id; the id is authoritative and the
//! login id only labels log events.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Error, User, UserId};

const ACCOUNT_ID_KEY: &str = "account_id";
const LOGIN_ID_KEY: &str = "login_id";

/// Account recorded by a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedIn {
    pub user_id: UserId,
    pub login_id: Option<String>,
}

/// Session extractor exposing sign-in, lookup and sign-out.
#[derive(Clone)]
pub struct AccountSession(Session);

impl AccountSession {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Record `user` as signed in, rotating the session id first.
    pub fn sign_in(&self, user: &User) -> Result<(), Error> {
        self.0.renew();
        self.store(ACCOUNT_ID_KEY, user.id().to_string())?;
        self.store(LOGIN_ID_KEY, user.login_id().to_string())
    }

    fn store(&self, key: &str, value: String) -> Result<(), Error> {
        self.0
            .insert(key, value)
            .map_err(|err| Error::internal(format!("failed to write session: {err}")))
    }

    fn load(&self, key: &str) -> Result<Option<String>, Error> {
        self.0
            .get::<String>(key)
            .map_err(|err| Error::internal(format!("failed to read session: {err}")))
    }

    /// The signed-in account, if any.
    ///
    /// A cookie whose account id is not a UUID counts as signed out.
    pub fn signed_in(&self) -> Result<Option<SignedIn>, Error> {
        let Some(raw) = self.load(ACCOUNT_ID_KEY)? else {
            return Ok(None);
        };
        let user_id = match UserId::new(raw) {
            Ok(id) => id,
            Err(err) => {
                warn!(error = %err, "discarding session with malformed account id");
                return Ok(None);
            }
        };
        Ok(Some(SignedIn {
            user_id,
            login_id: self.load(LOGIN_ID_KEY)?,
        }))
    }

    /// The signed-in account, or `401 Unauthorized`.
    pub fn require_signed_in(&self) -> Result<SignedIn, Error> {
        self.signed_in()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Forget the account; the client receives an expired cookie.
    pub fn sign_out(&self) {
        self.0.purge();
    }
}

impl FromRequest for AccountSession {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let session = Session::from_request(req, payload);
        Box::pin(async move { session.await.map(Self::new) })
    }
}
