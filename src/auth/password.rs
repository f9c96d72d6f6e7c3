// Password hashing; bcrypt is CPU-bound so both directions run on the blocking pool

use bcrypt::{hash, verify, DEFAULT_COST};

use super::AuthError;

pub async fn hash_password(password: &str, cost: Option<u32>) -> Result<String, AuthError> {
    let password = password.to_string();
    let cost = cost.unwrap_or(DEFAULT_COST);

    tokio::task::spawn_blocking(move || hash(password, cost).map_err(|e| AuthError::Hashing(e.to_string())))
        .await
        .map_err(|e| AuthError::Hashing(format!("Task join error: {}", e)))?
}

/// `Ok(false)` for a wrong password; a malformed stored hash also counts as a mismatch
pub async fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let password = password.to_string();
    let hash = hash.to_string();

    let verified = tokio::task::spawn_blocking(move || verify(password, &hash))
        .await
        .map_err(|e| AuthError::Hashing(format!("Task join error: {}", e)))?;

    match verified {
        Ok(matches) => Ok(matches),
        Err(e) => {
            tracing::warn!("Stored password hash could not be checked: {}", e);
            Ok(false)
        }
    }
}
