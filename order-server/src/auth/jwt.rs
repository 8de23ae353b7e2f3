//! JWT 令牌服务
//!
//! 处理 JWT 令牌的生成、验证和解析。

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 会话角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// 餐馆管理员（仅限本馆）
    Admin,
    /// 平台超级管理员
    Super,
    /// 厨房显示屏会话
    Kitchen,
}

/// JWT 配置
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// JWT 密钥 (应至少 32 字节)
    pub secret: String,
    /// 令牌过期时间 (分钟)
    pub expiration_minutes: i64,
    /// 令牌签发者
    pub issuer: String,
    /// 令牌受众
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        let secret = match std::env::var("JWT_SECRET") {
            Ok(secret) if secret.len() >= 32 => secret,
            Ok(_) => {
                tracing::warn!("JWT_SECRET is shorter than 32 characters, generating a random key");
                generate_secret()
            }
            Err(_) => {
                tracing::warn!("JWT_SECRET not set, generating a random key for this process");
                generate_secret()
            }
        };
        Self {
            secret,
            expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1440),
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "order-server".to_string()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "order-clients".to_string()),
        }
    }
}

/// 生成随机密钥（进程重启后旧令牌全部失效，仅用于未配置密钥的场合）
fn generate_secret() -> String {
    use rand::Rng;
    const CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();
    (0..64)
        .map(|_| CHARS[rng.gen_range(0..CHARS.len())] as char)
        .collect()
}

/// 存储在令牌中的 JWT Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// 主体：餐馆 id，超级管理员为 "super"
    pub sub: String,
    /// 会话角色
    pub role: Role,
    /// 过期时间戳
    pub exp: i64,
    /// 签发时间戳
    pub iat: i64,
    /// 签发者
    pub iss: String,
    /// 受众
    pub aud: String,
}

/// JWT 错误
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("无效令牌: {0}")]
    InvalidToken(String),

    #[error("令牌已过期")]
    ExpiredToken,

    #[error("无效签名")]
    InvalidSignature,

    #[error("令牌生成失败: {0}")]
    GenerationFailed(String),
}

/// JWT 令牌服务
#[derive(Debug, Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new() -> Self {
        Self::with_config(JwtConfig::default())
    }

    pub fn with_config(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// 生成会话令牌
    pub fn generate_token(&self, subject: &str, role: Role) -> Result<String, JwtError> {
        let now = Utc::now();
        let expiration = now + Duration::minutes(self.config.expiration_minutes);
        let claims = Claims {
            sub: subject.to_string(),
            role,
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// 验证并解码令牌
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                _ => JwtError::InvalidToken(e.to_string()),
            }
        })?;
        Ok(token_data.claims)
    }

    /// 从 Authorization 头提取令牌
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }
}

impl Default for JwtService {
    fn default() -> Self {
        Self::new()
    }
}

/// 当前用户上下文 (从 JWT Claims 解析)
///
/// 由认证中间件注入请求扩展。
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub role: Role,
    /// admin / kitchen 会话绑定的餐馆；超级管理员为 None
    pub restaurant_id: Option<String>,
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        let restaurant_id = match claims.role {
            Role::Super => None,
            _ => Some(claims.sub),
        };
        Self {
            role: claims.role,
            restaurant_id,
        }
    }
}

impl CurrentUser {
    pub fn is_super(&self) -> bool {
        self.role == Role::Super
    }

    /// 是否可管理指定餐馆（超级管理员或该馆的管理员）
    pub fn can_manage(&self, restaurant_id: &str) -> bool {
        match self.role {
            Role::Super => true,
            Role::Admin => self.restaurant_id.as_deref() == Some(restaurant_id),
            Role::Kitchen => false,
        }
    }

    /// 是否可访问指定餐馆的厨房显示屏
    pub fn can_view_kitchen(&self, restaurant_id: &str) -> bool {
        match self.role {
            Role::Super => true,
            Role::Admin | Role::Kitchen => self.restaurant_id.as_deref() == Some(restaurant_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::with_config(JwtConfig {
            secret: "test-secret-test-secret-test-secret!".into(),
            expiration_minutes: 60,
            issuer: "order-server".into(),
            audience: "order-clients".into(),
        })
    }

    #[test]
    fn token_round_trip() {
        let svc = service();
        let token = svc.generate_token("r1", Role::Admin).unwrap();
        let claims = svc.validate_token(&token).unwrap();
        assert_eq!(claims.sub, "r1");
        assert_eq!(claims.role, Role::Admin);
    }

    #[test]
    fn scope_rules() {
        let admin = CurrentUser {
            role: Role::Admin,
            restaurant_id: Some("r1".into()),
        };
        assert!(admin.can_manage("r1"));
        assert!(!admin.can_manage("r2"));
        assert!(admin.can_view_kitchen("r1"));

        let sup = CurrentUser {
            role: Role::Super,
            restaurant_id: None,
        };
        assert!(sup.can_manage("anything"));

        let kitchen = CurrentUser {
            role: Role::Kitchen,
            restaurant_id: Some("r1".into()),
        };
        assert!(!kitchen.can_manage("r1"));
        assert!(kitchen.can_view_kitchen("r1"));
    }

    #[test]
    fn bad_token_is_rejected() {
        let svc = service();
        assert!(svc.validate_token("not-a-token").is_err());
    }
}
