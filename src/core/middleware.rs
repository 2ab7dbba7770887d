use http::Extensions;
use reqwest::{header, Request, Response};
use reqwest_middleware::{Middleware, Next};
use std::sync::{Arc, RwLock};

/// Shared holder for the signed-in user's ID token.
///
/// The auth service writes it on sign-up/sign-in and clears it on sign-out;
/// the Firestore and Storage clients read it through [`TokenMiddleware`].
#[derive(Clone, Default)]
pub struct TokenStore {
    inner: Arc<RwLock<Option<String>>>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, token: String) {
        *self.inner.write().unwrap() = Some(token);
    }

    pub fn clear(&self) {
        *self.inner.write().unwrap() = None;
    }

    pub fn get(&self) -> Option<String> {
        self.inner.read().unwrap().clone()
    }

    pub fn is_signed_in(&self) -> bool {
        self.inner.read().unwrap().is_some()
    }
}

/// Attaches `Authorization: Bearer <id token>` to outgoing requests.
///
/// Requests made while signed out go through without the header; the backend
/// decides what anonymous access is allowed via its security rules.
pub struct TokenMiddleware {
    store: TokenStore,
}

impl TokenMiddleware {
    pub fn new(store: TokenStore) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl Middleware for TokenMiddleware {
    async fn handle(
        &self,
        mut req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> reqwest_middleware::Result<Response> {
        if let Some(token) = self.store.get() {
            let value = header::HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| {
                    reqwest_middleware::Error::Middleware(anyhow::anyhow!(
                        "invalid token header: {}",
                        e
                    ))
                })?;
            req.headers_mut().insert(header::AUTHORIZATION, value);
        }

        next.run(req, extensions).await
    }
}
