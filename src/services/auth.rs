//! Auth gateway
//!
//! Email/password accounts with Argon2id hashes, JWT access/refresh pairs,
//! and authorize-URL construction for the hosted OAuth providers.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use moka::sync::Cache;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use url::Url;

use crate::api::jwt::JwtService;
use crate::config::StaticConfig;
use crate::errors::{BiolinkerError, Result};
use crate::storage::models::{Account, AuthProvider};
use crate::storage::traits::AccountStore;
use crate::utils::password::{hash_password, verify_password};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Debug, Deserialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub user_id: String,
}

#[derive(Clone)]
pub struct AuthGateway {
    accounts: Arc<dyn AccountStore>,
    jwt: &'static JwtService,
    /// 已注销的 refresh token jti
    revoked: Cache<String, ()>,
    min_password_length: usize,
    oauth_authorize_url: String,
    site_url: String,
}

impl AuthGateway {
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        jwt: &'static JwtService,
        config: &StaticConfig,
    ) -> Self {
        let revoked = Cache::builder()
            .time_to_live(Duration::from_secs(jwt.refresh_token_days() * 86_400))
            .max_capacity(100_000)
            .build();

        Self {
            accounts,
            jwt,
            revoked,
            min_password_length: config.auth.min_password_length,
            oauth_authorize_url: config.auth.oauth_authorize_url.clone(),
            site_url: config.server.site_url.clone(),
        }
    }

    pub async fn sign_up(&self, req: SignUpRequest) -> Result<AuthTokens> {
        let email = normalize_email(&req.email)?;
        if req.password.chars().count() < self.min_password_length {
            return Err(BiolinkerError::validation(format!(
                "Password must be at least {} characters",
                self.min_password_length
            )));
        }
        if req.password != req.confirm_password {
            return Err(BiolinkerError::validation("Passwords do not match"));
        }

        if self.accounts.find_account_by_email(&email).await?.is_some() {
            return Err(BiolinkerError::conflict(
                "An account with this email already exists",
            ));
        }

        let account = Account {
            id: uuid::Uuid::new_v4().to_string(),
            email,
            password_hash: Some(hash_password(&req.password)?),
            provider: AuthProvider::Email,
            created_at: Utc::now(),
        };
        let user_id = account.id.clone();
        self.accounts.insert_account(account).await?;

        info!("New account signed up: {}", user_id);
        self.issue(&user_id)
    }

    pub async fn sign_in(&self, req: SignInRequest) -> Result<AuthTokens> {
        let email = req.email.trim().to_lowercase();
        let Some(account) = self.accounts.find_account_by_email(&email).await? else {
            return Err(BiolinkerError::unauthorized(INVALID_CREDENTIALS));
        };

        let Some(hash) = account.password_hash.as_deref() else {
            // OAuth 账号没有密码
            return Err(BiolinkerError::unauthorized(INVALID_CREDENTIALS));
        };

        if !verify_password(&req.password, hash)? {
            warn!("Failed sign-in for account {}", account.id);
            return Err(BiolinkerError::unauthorized(INVALID_CREDENTIALS));
        }

        self.issue(&account.id)
    }

    /// 轮换 refresh token：旧 token 作废，签发新的一对
    pub async fn refresh(&self, refresh_token: &str) -> Result<AuthTokens> {
        let claims = self
            .jwt
            .validate_refresh_token(refresh_token)
            .map_err(|_| BiolinkerError::unauthorized("Invalid refresh token"))?;

        // 先占用 jti 再 await，并发的同一 token 只有一个能通过
        if !self.revoked.entry(claims.jti).or_insert(()).is_fresh() {
            return Err(BiolinkerError::unauthorized("Refresh token has been revoked"));
        }
        if self.accounts.find_account(&claims.sub).await?.is_none() {
            return Err(BiolinkerError::unauthorized("Account no longer exists"));
        }

        self.issue(&claims.sub)
    }

    /// 注销 refresh token；无效 token 直接忽略
    pub fn sign_out(&self, refresh_token: Option<&str>) {
        if let Some(claims) = refresh_token.and_then(|t| self.jwt.validate_refresh_token(t).ok()) {
            self.revoked.insert(claims.jti, ());
        }
    }

    /// `{authorize}?provider=..&redirect_to={site}/dashboard`
    pub fn oauth_authorize_url(&self, provider: &str) -> Result<String> {
        let provider = AuthProvider::from_str(provider)
            .ok()
            .filter(|p| *p != AuthProvider::Email)
            .ok_or_else(|| {
                BiolinkerError::validation(format!("Unsupported OAuth provider: {}", provider))
            })?;

        let redirect_to = format!("{}/dashboard", self.site_url.trim_end_matches('/'));
        let url = Url::parse_with_params(
            &self.oauth_authorize_url,
            &[("provider", provider.as_ref()), ("redirect_to", redirect_to.as_str())],
        )
        .map_err(|e| BiolinkerError::internal(format!("Invalid oauth_authorize_url: {}", e)))?;

        Ok(url.into())
    }

    fn issue(&self, user_id: &str) -> Result<AuthTokens> {
        let access_token = self
            .jwt
            .generate_access_token(user_id)
            .map_err(|e| BiolinkerError::internal(format!("Token generation failed: {}", e)))?;
        let refresh_token = self
            .jwt
            .generate_refresh_token(user_id)
            .map_err(|e| BiolinkerError::internal(format!("Token generation failed: {}", e)))?;

        Ok(AuthTokens {
            access_token,
            refresh_token,
            user_id: user_id.to_string(),
        })
    }
}

fn normalize_email(raw: &str) -> Result<String> {
    let email = raw.trim().to_lowercase();
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        });

    if valid && !email.contains(char::is_whitespace) {
        Ok(email)
    } else {
        Err(BiolinkerError::validation("Please enter a valid email address"))
    }
}
