use std::collections::HashMap;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use argon2::password_hash::{SaltString, rand_core::OsRng};
use cookie::{Cookie, SameSite};

use crate::{
    config::AuthConfig,
    domain::Role,
    error::{AppError, Result},
};

pub mod session;

pub use session::{Claims, SessionTokens};

pub const SESSION_COOKIE: &str = "session";

/// Verifies role passcodes and issues signed session tokens.
///
/// Only Argon2 hashes of the staff passcodes are held; the passcodes
/// themselves are handed out by `lectern-admin issue-passcode`.
pub struct AuthService {
    tokens: SessionTokens,
    passcode_hashes: HashMap<Role, String>,
    session_duration_hours: i64,
}

impl AuthService {
    pub fn new(config: &AuthConfig) -> Self {
        let mut passcode_hashes = HashMap::new();
        if let Some(hash) = &config.professor_passcode_hash {
            passcode_hashes.insert(Role::Professor, hash.clone());
        }
        if let Some(hash) = &config.class_rep_passcode_hash {
            passcode_hashes.insert(Role::ClassRepresentative, hash.clone());
        }

        for role in [Role::Professor, Role::ClassRepresentative] {
            if !passcode_hashes.contains_key(&role) {
                tracing::warn!("No passcode configured for {}; that role cannot log in", role.as_str());
            }
        }

        Self {
            tokens: SessionTokens::new(config.session_secret.as_bytes()),
            passcode_hashes,
            session_duration_hours: config.session_duration_hours,
        }
    }

    pub fn verify_passcode(passcode: &str, hash: &str) -> Result<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AppError::Internal(format!("Invalid passcode hash: {}", e)))?;

        let argon2 = Argon2::default();

        Ok(argon2.verify_password(passcode.as_bytes(), &parsed_hash).is_ok())
    }

    pub fn hash_passcode(passcode: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        let passcode_hash = argon2
            .hash_password(passcode.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Passcode hashing failed: {}", e)))?;

        Ok(passcode_hash.to_string())
    }

    /// A fresh random passcode, e.g. `prof-3f9a1c0d7e2b`.
    pub fn generate_passcode(role: Role) -> String {
        use rand::RngCore;
        let mut bytes = [0u8; 6];
        rand::thread_rng().fill_bytes(&mut bytes);
        let prefix = match role {
            Role::Professor => "prof",
            Role::ClassRepresentative => "cr",
            Role::Student => "student",
        };
        format!("{}-{}", prefix, hex::encode(bytes))
    }

    /// Check the passcode for `role` and return a session token. Students
    /// need no passcode.
    pub fn login(&self, role: Role, passcode: Option<&str>) -> Result<String> {
        if role.can_edit() {
            let hash = self.passcode_hashes.get(&role).ok_or(AppError::Unauthorized)?;
            let passcode = passcode.ok_or(AppError::Unauthorized)?;
            if !Self::verify_passcode(passcode, hash)? {
                tracing::warn!("Rejected {} login with a wrong passcode", role.as_str());
                return Err(AppError::Unauthorized);
            }
        }

        tracing::info!("{} session started", role.as_str());
        self.tokens.issue(role, self.session_duration_hours)
    }

    pub fn validate_session(&self, token: &str) -> Result<Claims> {
        self.tokens.validate(token)
    }

    pub fn create_session_cookie(&self, token: &str, secure: bool) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, token.to_string()))
            .path("/")
            .same_site(SameSite::Lax)
            .http_only(true)
            .secure(secure)
            .max_age(cookie::time::Duration::hours(self.session_duration_hours))
            .build()
    }

    pub fn create_logout_cookie() -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, ""))
            .path("/")
            .same_site(SameSite::Lax)
            .http_only(true)
            .max_age(cookie::time::Duration::seconds(0))
            .build()
    }
}
