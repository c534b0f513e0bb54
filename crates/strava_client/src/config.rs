use crate::{AuthorisationScope, StravaError, Token};
use secrecy::SecretString;

pub const DEFAULT_BASE_URL: &str = "https://www.strava.com/api/v3";

#[derive(Clone, Debug)]
pub struct Config {
    pub access_token: SecretString,
    pub scopes: Vec<AuthorisationScope>,
    pub base_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, StravaError> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Testable helper that reads configuration values using the provided
    /// function instead of the process environment.
    pub fn from_env_with<F>(mut get: F) -> Result<Self, StravaError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let access_token = get("STRAVA_ACCESS_TOKEN")
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| StravaError::Config("STRAVA_ACCESS_TOKEN missing".into()))?;
        let scopes = match get("STRAVA_TOKEN_SCOPES") {
            Some(s) => AuthorisationScope::parse_list(&s)?,
            None => vec![AuthorisationScope::Public],
        };
        let base_url = get("STRAVA_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into());
        Ok(Self {
            access_token: SecretString::new(access_token.into()),
            scopes,
            base_url,
        })
    }

    pub fn token(&self) -> Token {
        Token::new(self.access_token.clone(), self.scopes.clone())
    }
}
