pub mod prompt;

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use atomic_write_file::AtomicWriteFile;

const TOKEN_FILE: &str = "token";

/// Environment variable name for providing an API token without the token file
pub const ENV_TOKEN_VAR: &str = "ESG_SCOPE_TOKEN";

// Re-export prompt functions for convenience
pub use prompt::{prompt_for_token, reprompt_for_token, setup_token};

/// Check for an API token in the ESG_SCOPE_TOKEN environment variable.
/// Returns Some(token) if the env var is set and non-empty, None otherwise.
pub fn get_token_from_env() -> Option<String> {
    match std::env::var(ENV_TOKEN_VAR) {
        Ok(val) => {
            let trimmed = val.trim().to_string();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed)
            }
        }
        Err(_) => None,
    }
}

#[derive(Debug)]
pub enum CredentialError {
    TokenNotFound,
    Unreadable(String),
    StoreFailed(String),
}

impl fmt::Display for CredentialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialError::TokenNotFound => write!(f, "Token not found"),
            CredentialError::Unreadable(msg) => write!(f, "Failed to read token file: {}", msg),
            CredentialError::StoreFailed(msg) => write!(f, "Failed to store token: {}", msg),
        }
    }
}

impl std::error::Error for CredentialError {}

fn token_path() -> PathBuf {
    crate::config::get_config_dir().join(TOKEN_FILE)
}

fn load_token_at(path: &Path) -> Result<String, CredentialError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => {
            let token = contents.trim().to_string();
            if token.is_empty() {
                Err(CredentialError::TokenNotFound)
            } else {
                Ok(token)
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(CredentialError::TokenNotFound),
        Err(e) => Err(CredentialError::Unreadable(e.to_string())),
    }
}

fn store_token_at(path: &Path, token: &str) -> Result<(), CredentialError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| CredentialError::StoreFailed(e.to_string()))?;
    }

    let mut file =
        AtomicWriteFile::open(path).map_err(|e| CredentialError::StoreFailed(e.to_string()))?;
    writeln!(file, "{}", token).map_err(|e| CredentialError::StoreFailed(e.to_string()))?;
    file.commit()
        .map_err(|e| CredentialError::StoreFailed(e.to_string()))?;

    // Token file is a secret; owner-only on unix.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let _ = std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600));
    }

    Ok(())
}

/// Retrieve the stored token from the config directory.
pub fn load_token() -> Result<String, CredentialError> {
    load_token_at(&token_path())
}

/// Store a token in the config directory (atomic replace, 0600 on unix).
pub fn store_token(token: &str) -> Result<(), CredentialError> {
    store_token_at(&token_path(), token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_file_roundtrip() {
        let dir = std::env::temp_dir().join("esg-scope-test-credentials");
        let path = dir.join("token");
        let _ = std::fs::remove_file(&path);

        assert!(matches!(
            load_token_at(&path),
            Err(CredentialError::TokenNotFound)
        ));

        store_token_at(&path, "test_token_12345").unwrap();
        assert_eq!(load_token_at(&path).unwrap(), "test_token_12345");

        // Re-store replaces the old token.
        store_token_at(&path, "rotated").unwrap();
        assert_eq!(load_token_at(&path).unwrap(), "rotated");

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_empty_token_file_counts_as_missing() {
        let dir = std::env::temp_dir().join("esg-scope-test-credentials-empty");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("token");
        std::fs::write(&path, "\n").unwrap();

        assert!(matches!(
            load_token_at(&path),
            Err(CredentialError::TokenNotFound)
        ));

        let _ = std::fs::remove_file(&path);
    }
}
