use crate::{Athlete, StravaError};
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};
use std::str::FromStr;

/// Scope granted to an access token at authorisation time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AuthorisationScope {
    Public,
    Write,
    ViewPrivate,
}

impl FromStr for AuthorisationScope {
    type Err = StravaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "public" => Ok(AuthorisationScope::Public),
            "write" => Ok(AuthorisationScope::Write),
            "view_private" => Ok(AuthorisationScope::ViewPrivate),
            other => Err(StravaError::Config(format!(
                "unknown authorisation scope: {other}"
            ))),
        }
    }
}

impl AuthorisationScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthorisationScope::Public => "public",
            AuthorisationScope::Write => "write",
            AuthorisationScope::ViewPrivate => "view_private",
        }
    }

    /// Parse Strava's comma separated scope list, e.g. `view_private,write`.
    pub fn parse_list(s: &str) -> Result<Vec<Self>, StravaError> {
        let mut scopes = Vec::new();
        for part in s.split(',').filter(|p| !p.trim().is_empty()) {
            let scope = part.parse()?;
            if !scopes.contains(&scope) {
                scopes.push(scope);
            }
        }
        Ok(scopes)
    }
}

/// An access token together with what it is allowed to do.
#[derive(Clone, Debug)]
pub struct Token {
    access_token: SecretString,
    scopes: Vec<AuthorisationScope>,
    athlete: Option<Athlete>,
}

impl Token {
    pub fn new(access_token: SecretString, scopes: Vec<AuthorisationScope>) -> Self {
        Self {
            access_token,
            scopes,
            athlete: None,
        }
    }

    /// Attach the athlete the token was issued to.
    pub fn with_athlete(mut self, athlete: Athlete) -> Self {
        self.athlete = Some(athlete);
        self
    }

    pub fn access_token(&self) -> &SecretString {
        &self.access_token
    }

    pub fn scopes(&self) -> &[AuthorisationScope] {
        &self.scopes
    }

    pub fn athlete(&self) -> Option<&Athlete> {
        self.athlete.as_ref()
    }

    pub fn has_write_access(&self) -> bool {
        self.scopes.contains(&AuthorisationScope::Write)
    }

    pub fn has_view_private(&self) -> bool {
        self.scopes.contains(&AuthorisationScope::ViewPrivate)
    }

    /// Hex SHA-256 of the access token and its scope set; identifies the
    /// token in caches without holding its plaintext. Scope order does not
    /// matter.
    pub fn cache_key(&self) -> String {
        let mut scopes = self.scopes.clone();
        scopes.sort();
        scopes.dedup();
        let mut hasher = Sha256::new();
        hasher.update(self.access_token.expose_secret().as_bytes());
        for scope in scopes {
            hasher.update(b"\0");
            hasher.update(scope.as_str().as_bytes());
        }
        hex::encode(hasher.finalize())
    }
}
