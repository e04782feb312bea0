//! Remote repository addressing

/// Hosted repository `https://<host>/<user>/<repository>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSpec {
    pub host: String,
    pub user: String,
    pub repository: String,
}

impl RemoteSpec {
    pub fn new(host: impl Into<String>, user: impl Into<String>, repository: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            user: user.into(),
            repository: repository.into(),
        }
    }

    /// Browser URL, safe to print
    pub fn public_url(&self) -> String {
        format!("https://{}/{}/{}", self.host, self.user, self.repository)
    }

    /// Push URL carrying the token as basic-auth credentials. Never log this.
    pub fn authenticated_url(&self, token: &str) -> String {
        format!(
            "https://{}:{}@{}/{}/{}.git",
            self.user, token, self.host, self.user, self.repository
        )
    }
}
