use chrono::{DateTime, Utc};

/// A bearer token and the instant it stops being accepted
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub token: String,
    pub expires_on: DateTime<Utc>,
}

impl AccessToken {
    pub fn new(token: impl Into<String>, expires_on: DateTime<Utc>) -> Self {
        Self {
            token: token.into(),
            expires_on,
        }
    }

    /// True while `expires_on` is strictly after `now`
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_on > now
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"***REDACTED***")
            .field("expires_on", &self.expires_on)
            .finish()
    }
}
