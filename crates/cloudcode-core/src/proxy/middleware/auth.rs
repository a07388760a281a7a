use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use subtle::ConstantTimeEq;

pub const ADMIN_KEY_HEADER: &str = "x-admin-key";

/// Operator key guarding `/admin/*`. `None` locks the admin surface.
#[derive(Clone, Default)]
pub struct AdminKey(pub Option<Arc<str>>);

impl AdminKey {
    pub fn new(key: Option<&str>) -> Self {
        Self(key.map(str::trim).filter(|k| !k.is_empty()).map(Arc::from))
    }
}

pub async fn admin_auth_middleware(
    State(key): State<AdminKey>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(expected) = key.0.as_deref() else {
        tracing::error!("Admin request rejected: no admin key configured");
        return Err(StatusCode::UNAUTHORIZED);
    };

    let presented = request
        .headers()
        .get(ADMIN_KEY_HEADER)
        .and_then(|h| h.to_str().ok())
        .or_else(|| {
            request
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.strip_prefix("Bearer "))
        });

    if presented.is_some_and(|k| constant_time_compare(k.trim(), expected)) {
        Ok(next.run(request).await)
    } else {
        tracing::warn!(path = %request.uri().path(), "Admin request rejected: bad key");
        Err(StatusCode::UNAUTHORIZED)
    }
}

fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("abc", "abc"));
        assert!(!constant_time_compare("abc", "abd"));
        assert!(!constant_time_compare("ab", "abc"));
    }

    #[test]
    fn test_blank_admin_key_locks_surface() {
        assert!(AdminKey::new(Some("  ")).0.is_none());
        assert!(AdminKey::new(None).0.is_none());
        assert_eq!(AdminKey::new(Some("k")).0.as_deref(), Some("k"));
    }
}
