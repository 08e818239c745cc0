use anyhow::{Context, Result};

use super::{get_token_from_env, load_token, store_token, CredentialError};

/// Prompts user to enter an API token for the ESG backend
pub fn prompt_for_token() -> Result<String> {
    println!("ESG backend API token required.");
    println!("Ask your backend administrator for one, or set {}.", super::ENV_TOKEN_VAR);
    println!();

    let token = rpassword::prompt_password("Enter token: ")
        .context("Failed to read token from stdin")?;

    let token = token.trim();

    if token.is_empty() {
        anyhow::bail!("Token cannot be empty");
    }

    Ok(token.to_string())
}

/// Re-prompts for token when the existing one is rejected by the backend
pub fn reprompt_for_token() -> Result<String> {
    eprintln!();
    eprintln!("Your API token was rejected (invalid or expired).");
    eprintln!("Please provide a new token.");
    eprintln!();

    let token = prompt_for_token()?;

    store_token(&token).context("Failed to store new token")?;

    eprintln!("New token stored in the config directory.");

    Ok(token)
}

/// Resolve the token to use, if any: environment variable first, then the
/// stored token file. A missing token is not an error — the backend may run
/// unauthenticated in development, and a 401 later triggers a re-prompt.
pub fn setup_token() -> Result<Option<String>> {
    if let Some(token) = get_token_from_env() {
        return Ok(Some(token));
    }

    match load_token() {
        Ok(token) => Ok(Some(token)),
        Err(CredentialError::TokenNotFound) => Ok(None),
        Err(e) => anyhow::bail!("Failed to read stored token: {}", e),
    }
}
