//! Permission gate consulted by every route.

use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use folio_error::{FolioResult, LibraryError, LibraryErrorKind};

/// Header carrying the acting user id.
pub const USER_HEADER: &str = "x-folio-user";

/// What a request wants to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Action {
    /// List or fetch
    #[display("read")]
    Read,
    /// Upload or create
    #[display("create")]
    Create,
    /// Edit, rename or move
    #[display("update")]
    Update,
    /// Remove
    #[display("delete")]
    Delete,
}

/// The caller of an authorized request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Principal {
    /// User id recorded in audit fields
    pub user: Option<i32>,
}

/// Decides whether a request may perform an action.
pub trait Authorizer: Send + Sync {
    /// Authorize `action`, returning the acting principal or `Forbidden`.
    fn authorize(&self, action: Action, headers: &HeaderMap) -> FolioResult<Principal>;
}

/// Bearer token check with an optional read-only mode.
///
/// Without a token every request is allowed.
#[derive(Debug, Clone, Default)]
pub struct TokenAuthorizer {
    token: Option<String>,
    read_only: bool,
}

impl TokenAuthorizer {
    /// Create a gate.
    pub fn new(token: Option<String>, read_only: bool) -> Self {
        Self { token, read_only }
    }
}

fn forbidden(action: Action, reason: &str) -> LibraryError {
    LibraryError::new(LibraryErrorKind::Forbidden(format!("{}: {}", action, reason)))
}

fn user_from(headers: &HeaderMap) -> Option<i32> {
    headers
        .get(USER_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
}

impl Authorizer for TokenAuthorizer {
    fn authorize(&self, action: Action, headers: &HeaderMap) -> FolioResult<Principal> {
        if let Some(expected) = &self.token {
            let presented = headers
                .get(AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.strip_prefix("Bearer "));
            if presented != Some(expected.as_str()) {
                return Err(forbidden(action, "missing or invalid bearer token").into());
            }
        }
        if self.read_only && action != Action::Read {
            return Err(forbidden(action, "library is read-only").into());
        }
        Ok(Principal {
            user: user_from(headers),
        })
    }
}
