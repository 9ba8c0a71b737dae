//! Secrets read from environment variables.
//!
//! Values are wrapped in [`SecretString`] as soon as they are read and are
//! only exposed at the point of use (query string, bearer header).

use secrecy::SecretString;

use kleinbot_types::error::ConfigError;

pub const VERIFY_TOKEN: &str = "VERIFY_TOKEN";
pub const PAGE_ACCESS_TOKEN: &str = "PAGE_ACCESS_TOKEN";
pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const VOICE_API_KEY: &str = "VOICE_API_KEY";

/// Runtime secrets.
///
/// Does NOT derive Debug so the values cannot end up in logs.
pub struct Secrets {
    pub verify_token: SecretString,
    pub page_access_token: SecretString,
    pub openai_api_key: SecretString,
    /// Text-to-speech key; falls back to the chat key when unset.
    pub voice_api_key: Option<SecretString>,
}

impl Secrets {
    /// Read all secrets from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read secrets through `lookup`. Empty values count as missing.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &'static str| -> Option<SecretString> {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .map(SecretString::from)
        };
        let require =
            |key: &'static str| get(key).ok_or(ConfigError::MissingSecret(key));

        Ok(Self {
            verify_token: require(VERIFY_TOKEN)?,
            page_access_token: require(PAGE_ACCESS_TOKEN)?,
            openai_api_key: require(OPENAI_API_KEY)?,
            voice_api_key: get(VOICE_API_KEY),
        })
    }

    /// The key used for text-to-speech requests.
    pub fn voice_key(&self) -> &SecretString {
        self.voice_api_key.as_ref().unwrap_or(&self.openai_api_key)
    }

    /// Names of the secrets that are set, for startup diagnostics.
    pub fn present(&self) -> Vec<&'static str> {
        let mut names = vec![VERIFY_TOKEN, PAGE_ACCESS_TOKEN, OPENAI_API_KEY];
        if self.voice_api_key.is_some() {
            names.push(VOICE_API_KEY);
        }
        names
    }
}
