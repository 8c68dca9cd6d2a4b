//! Account authentication: password login and Google OAuth linking.

use crate::db::UserRepository;
use crate::models::User;
use crate::Result;

#[derive(Debug, Clone)]
pub struct AuthService {
    users: UserRepository,
}

pub fn hash_password(password: &str) -> Result<String> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| crate::Error::Internal(format!("failed to hash password: {e}")))
}

fn verify_password(hash: &str, password: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

impl AuthService {
    pub fn new(users: UserRepository) -> Self {
        Self { users }
    }

    pub async fn user_by_id(&self, id: i64) -> Result<User> {
        self.users.get_by_id(id).await
    }

    /// Password login. Unknown users and wrong passwords are reported the
    /// same way so the endpoint does not leak which emails exist.
    pub async fn login(&self, email: &str, password: &str) -> Result<i64> {
        let user = match self.users.get_by_email(email).await {
            Ok(user) => user,
            Err(crate::Error::NotFound(_)) => return Err(crate::Error::InvalidCredentials),
            Err(e) => return Err(e),
        };

        let hash = match user.password_hash.as_deref() {
            Some(hash) if !hash.is_empty() => hash,
            // OAuth-only accounts have no password to check.
            _ => return Err(crate::Error::InvalidCredentials),
        };

        if !verify_password(hash, password) {
            return Err(crate::Error::InvalidCredentials);
        }

        Ok(user.id)
    }

    /// OAuth login: resolve to an existing google-linked account, link a
    /// matching email account, or create a fresh user.
    pub async fn oauth_login(&self, email: &str, google_id: &str) -> Result<i64> {
        let email = email.trim().to_lowercase();
        let google_id = google_id.trim();

        if email.is_empty() || google_id.is_empty() {
            return Err(crate::Error::InvalidCredentials);
        }

        match self.users.get_by_google_id(google_id).await {
            Ok(user) => return Ok(user.id),
            Err(crate::Error::NotFound(_)) => {}
            Err(e) => return Err(e),
        }

        match self.users.get_by_email(&email).await {
            Ok(user) => {
                match user.google_id.as_deref() {
                    Some(existing) if !existing.is_empty() && existing != google_id => {
                        return Err(crate::Error::Conflict(
                            "account already linked to a different google id".to_string(),
                        ));
                    }
                    Some(existing) if !existing.is_empty() => {}
                    _ => self.users.set_google_id(user.id, google_id).await?,
                }
                Ok(user.id)
            }
            Err(crate::Error::NotFound(_)) => self.users.create_oauth_user(&email, google_id).await,
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_round_trip() {
        let hash = hash_password("Password123!").unwrap();
        assert!(verify_password(&hash, "Password123!"));
        assert!(!verify_password(&hash, "password123!"));
    }

    #[test]
    fn malformed_hash_never_verifies() {
        assert!(!verify_password("not-a-bcrypt-hash", "anything"));
    }
}
