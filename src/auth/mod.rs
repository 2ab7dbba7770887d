//! Auth service.
//!
//! Email/password sign-up and sign-in against the Identity Toolkit API, plus
//! profile document read/update in the `users` collection. Backend error
//! codes are translated into user-facing messages; the raw code never
//! reaches the caller.

pub mod models;


use self::models::{AuthResponse, ProfileUpdate, Role, SignInRequest, SignUpRequest, UserProfile};
use crate::core::middleware::TokenStore;
use crate::core::{translate_auth_code, ApiErrorResponse};
use crate::session::{Session, SessionEvent};
use crate::store::{DocumentStore, StoreError};
use chrono::Utc;
use reqwest::{header, Client};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use thiserror::Error;

const IDENTITY_TOOLKIT_API: &str = "https://identitytoolkit.googleapis.com/v1";

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("middleware error: {0}")]
    Middleware(#[from] reqwest_middleware::Error),
    /// A translated, user-facing credential or account problem.
    #[error("{0}")]
    Credentials(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("profile store error: {0}")]
    Store(#[from] StoreError),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub struct AuthService {
    http: ClientWithMiddleware,
    store: DocumentStore,
    tokens: TokenStore,
    session: Session,
    api_key: String,
    base_url: String,
}

impl AuthService {
    pub fn new(
        api_key: String,
        store: DocumentStore,
        tokens: TokenStore,
        session: Session,
    ) -> Self {
        Self {
            http: ClientBuilder::new(Client::new()).build(),
            store,
            tokens,
            session,
            api_key,
            base_url: IDENTITY_TOOLKIT_API.to_string(),
        }
    }

    /// As `new`, with the Identity Toolkit base URL overridden for tests.
    pub fn with_base_url(
        api_key: String,
        base_url: String,
        store: DocumentStore,
        tokens: TokenStore,
        session: Session,
    ) -> Self {
        Self {
            http: ClientBuilder::new(Client::new()).build(),
            store,
            tokens,
            session,
            api_key,
            base_url,
        }
    }

    /// Creates an account and its profile document.
    ///
    /// The profile is written with role `user`, no permissions, and both
    /// timestamps set to now. The signed-in token is stored so follow-up
    /// Firestore calls act as the new user.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<UserProfile, AuthError> {
        validate_email(email)?;
        validate_password(password)?;
        if display_name.trim().is_empty() {
            return Err(AuthError::InvalidInput("display name is required".into()));
        }

        let request = SignUpRequest {
            email: email.to_string(),
            password: password.to_string(),
            display_name: Some(display_name.to_string()),
            return_secure_token: true,
        };

        let account = self.call_accounts("signUp", &request).await?;
        self.tokens.set(account.id_token.clone());

        let now = Utc::now().to_rfc3339();
        let profile = UserProfile {
            uid: account.local_id.clone(),
            email: email.to_string(),
            display_name: display_name.to_string(),
            phone: None,
            bio: None,
            photo_url: None,
            role: Role::User,
            permissions: vec![],
            created_at: now.clone(),
            last_login_at: now,
        };

        self.store
            .doc(&format!("users/{}", profile.uid))
            .set(&profile)
            .await?;

        tracing::info!(uid = %profile.uid, "account created");
        self.session.apply(SessionEvent::SignedIn(profile.clone()));
        Ok(profile)
    }

    /// Signs in with email/password and returns the user's profile.
    ///
    /// Updates `lastLoginAt` on the profile document; a failed timestamp
    /// update is logged but does not fail the sign-in. A missing profile
    /// document is recreated from the account record.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<UserProfile, AuthError> {
        validate_email(email)?;
        if password.is_empty() {
            return Err(AuthError::InvalidInput("password is required".into()));
        }

        let request = SignInRequest {
            email: email.to_string(),
            password: password.to_string(),
            return_secure_token: true,
        };

        let account = self.call_accounts("signInWithPassword", &request).await?;
        self.tokens.set(account.id_token.clone());

        let now = Utc::now().to_rfc3339();
        let doc = self.store.doc(&format!("users/{}", account.local_id));

        let profile = match doc.get::<UserProfile>().await? {
            Some(mut profile) => {
                if let Err(e) = doc
                    .update(
                        &serde_json::json!({ "lastLoginAt": now }),
                        &["lastLoginAt"],
                    )
                    .await
                {
                    tracing::warn!(uid = %profile.uid, "failed to update last login: {}", e);
                }
                profile.last_login_at = now;
                profile
            }
            None => {
                // Account exists but the profile document was never written;
                // recreate it rather than failing the sign-in.
                let profile = UserProfile {
                    uid: account.local_id.clone(),
                    email: account.email.clone().unwrap_or_else(|| email.to_string()),
                    display_name: account.display_name.clone().unwrap_or_default(),
                    phone: None,
                    bio: None,
                    photo_url: None,
                    role: Role::User,
                    permissions: vec![],
                    created_at: now.clone(),
                    last_login_at: now,
                };
                doc.set(&profile).await?;
                tracing::info!(uid = %profile.uid, "recreated missing profile document");
                profile
            }
        };

        self.session.apply(SessionEvent::SignedIn(profile.clone()));
        Ok(profile)
    }

    /// Clears the session and the stored token. No network call.
    pub fn sign_out(&self) {
        self.tokens.clear();
        self.session.apply(SessionEvent::SignedOut);
        tracing::debug!("signed out");
    }

    pub async fn get_profile(&self, uid: &str) -> Result<Option<UserProfile>, AuthError> {
        Ok(self.store.doc(&format!("users/{}", uid)).get().await?)
    }

    /// Patches the set fields of the profile and refreshes the session copy.
    pub async fn update_profile(
        &self,
        uid: &str,
        update: ProfileUpdate,
    ) -> Result<UserProfile, AuthError> {
        let mask = update.field_mask();
        if mask.is_empty() {
            return Err(AuthError::InvalidInput("no profile fields to update".into()));
        }

        let doc = self.store.doc(&format!("users/{}", uid));
        doc.update(&update, &mask).await?;

        let profile = doc
            .get::<UserProfile>()
            .await?
            .ok_or_else(|| AuthError::Store(StoreError::Api("profile not found".into())))?;

        self.session
            .apply(SessionEvent::ProfileUpdated(profile.clone()));
        Ok(profile)
    }

    async fn call_accounts<T: serde::Serialize>(
        &self,
        action: &str,
        request: &T,
    ) -> Result<AuthResponse, AuthError> {
        let url = format!("{}/accounts:{}", self.base_url, action);

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .header(header::CONTENT_TYPE, "application/json")
            .body(serde_json::to_vec(request)?)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = match response.json::<ApiErrorResponse>().await {
                Ok(err) => {
                    let code = err.error.message;
                    translate_auth_code(&code)
                        .map(str::to_string)
                        .unwrap_or_else(|| {
                            tracing::warn!(%code, "unrecognized auth error code");
                            "Authentication failed. Please try again.".to_string()
                        })
                }
                Err(_) => {
                    tracing::warn!(%status, "auth request failed without an error body");
                    "Authentication failed. Please try again.".to_string()
                }
            };
            return Err(AuthError::Credentials(message));
        }

        Ok(response.json().await?)
    }
}

fn validate_email(email: &str) -> Result<(), AuthError> {
    if email.trim().is_empty() || !email.contains('@') {
        return Err(AuthError::InvalidInput("a valid email is required".into()));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < 6 {
        return Err(AuthError::InvalidInput(
            "password must be at least 6 characters".into(),
        ));
    }
    Ok(())
}
