//! Interactive credential entry
//!
//! Every run asks for whatever the command line did not provide. The API
//! token is always read from a hidden prompt and only ever held in memory.
//! After a rejected login the form is shown again, prefilled with the
//! previous answers.

use anyhow::{Context, Result};
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Password};
use otimer_core::{ConnectionConfig, SessionError};

#[derive(Debug, Clone, Default)]
pub struct KnownFields {
    pub url: Option<String>,
    pub database: Option<String>,
    pub username: Option<String>,
}

/// Supplies replacement credentials after a login was rejected.
pub trait CredentialSource {
    /// Report `error` for `previous` and return the next attempt, or `None`
    /// to give up.
    fn retry_after(
        &mut self,
        previous: &ConnectionConfig,
        error: &SessionError,
    ) -> Result<Option<ConnectionConfig>>;
}

fn ask(
    theme: &ColorfulTheme,
    prompt: &str,
    known: Option<String>,
    default: Option<&str>,
) -> Result<String> {
    if let Some(value) = known.filter(|v| !v.trim().is_empty()) {
        return Ok(value);
    }
    let mut input = Input::<String>::with_theme(theme).with_prompt(prompt);
    if let Some(default) = default.filter(|d| !d.is_empty()) {
        input = input.default(default.to_string());
    }
    input
        .interact_text()
        .with_context(|| format!("Failed to read {}", prompt))
}

fn ask_token(theme: &ColorfulTheme) -> Result<String> {
    Password::with_theme(theme)
        .with_prompt("API token")
        .interact()
        .context("Failed to read API token")
}

pub fn collect_credentials(known: KnownFields) -> Result<ConnectionConfig> {
    let theme = ColorfulTheme::default();

    let base_url = ask(&theme, "URL (e.g. https://my.odoo.com)", known.url, None)?;
    let database = ask(&theme, "Database", known.database, None)?;
    let username = ask(&theme, "Username", known.username, None)?;
    let api_token = ask_token(&theme)?;

    Ok(ConnectionConfig::new(base_url, database, username, api_token))
}

/// Terminal prompts; errors go to stderr once per rejected attempt.
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl CredentialSource for TerminalPrompt {
    fn retry_after(
        &mut self,
        previous: &ConnectionConfig,
        error: &SessionError,
    ) -> Result<Option<ConnectionConfig>> {
        eprintln!("Error: {}", error);

        let theme = ColorfulTheme::default();
        let again = Confirm::with_theme(&theme)
            .with_prompt("Try again?")
            .default(true)
            .interact()
            .context("Failed to read answer")?;
        if !again {
            return Ok(None);
        }

        let url_prompt = "URL (e.g. https://my.odoo.com)";
        let base_url = ask(&theme, url_prompt, None, Some(&previous.base_url))?;
        let database = ask(&theme, "Database", None, Some(&previous.database))?;
        let username = ask(&theme, "Username", None, Some(&previous.username))?;
        let api_token = ask_token(&theme)?;

        Ok(Some(ConnectionConfig::new(
            base_url, database, username, api_token,
        )))
    }
}
