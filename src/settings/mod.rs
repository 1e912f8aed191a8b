// Geopic - Server Settings
// Server URL and API token live in the OS keychain, never in the queue file.
// Loaded once at startup into the app context; mutated only by an explicit
// save action.

use serde::{Deserialize, Serialize};

use crate::constants::{KEYCHAIN_SERVICE, KEYCHAIN_TOKEN_ACCOUNT, KEYCHAIN_URL_ACCOUNT};
use crate::error::{GeopicError, Result};

/// Server connection settings. An empty token means requests go out
/// unauthenticated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub server_url: String,
    pub token: String,
}

impl Settings {
    /// Load settings from the keychain. Missing or unreadable entries fall
    /// back to defaults.
    pub fn load() -> Self {
        Self {
            server_url: read_entry(KEYCHAIN_URL_ACCOUNT).unwrap_or_default(),
            token: read_entry(KEYCHAIN_TOKEN_ACCOUNT).unwrap_or_default(),
        }
    }

    /// Save both settings to the keychain.
    pub fn save(&self) -> Result<()> {
        write_entry(KEYCHAIN_URL_ACCOUNT, self.server_url.trim())?;
        write_entry(KEYCHAIN_TOKEN_ACCOUNT, self.token.trim())?;
        Ok(())
    }

    /// Server base URL with any trailing slash removed.
    pub fn base_url(&self) -> &str {
        self.server_url.trim().trim_end_matches('/')
    }

    /// Bearer token, when one is configured.
    pub fn auth_token(&self) -> Option<&str> {
        let token = self.token.trim();
        if token.is_empty() {
            None
        } else {
            Some(token)
        }
    }
}

// --- Keychain operations ---

fn read_entry(account: &str) -> Option<String> {
    let entry = keyring::Entry::new(KEYCHAIN_SERVICE, account).ok()?;
    entry.get_password().ok()
}

fn write_entry(account: &str, value: &str) -> Result<()> {
    let entry = keyring::Entry::new(KEYCHAIN_SERVICE, account)
        .map_err(|e| GeopicError::Keychain(e.to_string()))?;
    entry
        .set_password(value)
        .map_err(|e| GeopicError::Keychain(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_strips_trailing_slash() {
        let settings = Settings {
            server_url: "http://192.168.1.12:5000/".to_string(),
            token: String::new(),
        };
        assert_eq!(settings.base_url(), "http://192.168.1.12:5000");
    }

    #[test]
    fn test_base_url_keeps_clean_url() {
        let settings = Settings {
            server_url: "http://example.com".to_string(),
            token: String::new(),
        };
        assert_eq!(settings.base_url(), "http://example.com");
    }

    #[test]
    fn test_auth_token_empty_is_none() {
        let settings = Settings::default();
        assert!(settings.auth_token().is_none());

        let settings = Settings {
            server_url: String::new(),
            token: "  ".to_string(),
        };
        assert!(settings.auth_token().is_none());
    }

    #[test]
    fn test_auth_token_trimmed() {
        let settings = Settings {
            server_url: String::new(),
            token: " secret ".to_string(),
        };
        assert_eq!(settings.auth_token(), Some("secret"));
    }
}
