use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

static JWT_SERVICE: OnceLock<JwtService> = OnceLock::new();

/// Process-wide JwtService, built from `[auth]` on first use.
pub fn get_jwt_service() -> &'static JwtService {
    JWT_SERVICE.get_or_init(JwtService::from_config)
}

const ACCESS: &str = "access";
const REFRESH: &str = "refresh";

/// Token claims; `sub` is the account id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
    pub token_type: String,
}

pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_minutes: u64,
    refresh_token_days: u64,
}

impl JwtService {
    pub fn new(secret: &str, access_token_minutes: u64, refresh_token_days: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_minutes,
            refresh_token_days,
        }
    }

    pub fn from_config() -> Self {
        let config = crate::config::get_config();
        let auth = &config.auth;

        // 未配置时生成随机密钥，重启后已签发的 token 全部失效
        let secret = if auth.jwt_secret.is_empty() {
            tracing::warn!("auth.jwt_secret not configured, generating a random secret");
            crate::utils::generate_random_string(48)
        } else {
            auth.jwt_secret.clone()
        };

        Self::new(&secret, auth.access_token_minutes, auth.refresh_token_days)
    }

    pub fn refresh_token_days(&self) -> u64 {
        self.refresh_token_days
    }

    pub fn generate_access_token(&self, user_id: &str) -> Result<String, jsonwebtoken::errors::Error> {
        self.generate(user_id, ACCESS, Duration::minutes(self.access_token_minutes as i64))
    }

    pub fn generate_refresh_token(&self, user_id: &str) -> Result<String, jsonwebtoken::errors::Error> {
        self.generate(user_id, REFRESH, Duration::days(self.refresh_token_days as i64))
    }

    pub fn validate_access_token(
        &self,
        token: &str,
    ) -> Result<TokenClaims, jsonwebtoken::errors::Error> {
        self.validate(token, ACCESS)
    }

    pub fn validate_refresh_token(
        &self,
        token: &str,
    ) -> Result<TokenClaims, jsonwebtoken::errors::Error> {
        self.validate(token, REFRESH)
    }

    fn generate(
        &self,
        user_id: &str,
        token_type: &str,
        ttl: Duration,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = TokenClaims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
            token_type: token_type.to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
    }

    fn validate(
        &self,
        token: &str,
        expected_type: &str,
    ) -> Result<TokenClaims, jsonwebtoken::errors::Error> {
        let token_data = decode::<TokenClaims>(token, &self.decoding_key, &Validation::default())?;

        if token_data.claims.token_type != expected_type {
            return Err(jsonwebtoken::errors::Error::from(
                jsonwebtoken::errors::ErrorKind::InvalidToken,
            ));
        }

        Ok(token_data.claims)
    }
}
