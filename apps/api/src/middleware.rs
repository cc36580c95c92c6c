use axum::extract::{Request, State};
use axum::http::{HeaderMap, header};
use axum::middleware::Next;
use axum::response::Response;
use custodian_core::UserIdentity;
use subtle::ConstantTimeEq;

use crate::state::AppState;


pub const ACTOR_ID_HEADER: &str = "x-custodian-actor-id";
pub const ACTOR_EMAIL_HEADER: &str = "x-custodian-actor-email";
pub const ACTOR_NAME_HEADER: &str = "x-custodian-actor-name";

/// Verified caller attached to protected requests, if any.
#[derive(Debug, Clone, Default)]
pub struct CallerIdentity(pub Option<UserIdentity>);

/// Resolves the caller from the bearer secret and actor headers.
///
/// Requests are never rejected here; handlers decide what an absent caller means.
pub async fn resolve_caller_identity(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let identity = caller_identity_from_headers(request.headers(), &state.shared_secret);
    request.extensions_mut().insert(CallerIdentity(identity));
    next.run(request).await
}

fn caller_identity_from_headers(headers: &HeaderMap, shared_secret: &str) -> Option<UserIdentity> {
    let token = headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")?;
    let token_matches: bool = token.trim().as_bytes().ct_eq(shared_secret.as_bytes()).into();
    if shared_secret.is_empty() || !token_matches {
        return None;
    }

    let subject = header_value(headers, ACTOR_ID_HEADER)?;
    Some(UserIdentity::new(
        subject,
        header_value(headers, ACTOR_NAME_HEADER),
        header_value(headers, ACTOR_EMAIL_HEADER),
    ))
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)?
        .to_str()
        .ok()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}
