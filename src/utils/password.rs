//! 密码哈希工具模块
//!
//! 使用 Argon2id 算法进行密码哈希和验证

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::errors::BiolinkerError;

/// 对密码进行 Argon2id 哈希
pub fn hash_password(password: &str) -> Result<String, BiolinkerError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| BiolinkerError::internal(format!("Password hash error: {}", e)))
}

/// 验证密码是否匹配哈希；哈希本身无法解析时返回错误
pub fn verify_password(password: &str, hash: &str) -> Result<bool, BiolinkerError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| BiolinkerError::internal(format!("Password verify error: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
