//! Authentication options for Subversion command lines.

use crate::types::RepositoryLocation;

/// Credential flags appended to svn invocations.
///
/// Credentials never travel inside the URL. Nothing is cached in the user's
/// svn auth store and svn never prompts.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AuthOptions {
    username: Option<String>,
    password: Option<String>,
}

impl std::fmt::Debug for AuthOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthOptions")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl AuthOptions {
    /// Options carrying the location's credentials.
    #[must_use]
    pub fn from_location(location: &RepositoryLocation) -> Self {
        Self {
            username: location.username().map(str::to_string),
            password: location.password().map(str::to_string),
        }
    }

    /// Whether a username will be sent.
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        self.username.as_deref().is_some_and(|u| !u.is_empty())
    }

    /// The argument fragment.
    #[must_use]
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(4);
        if let Some(username) = self.username.as_deref().filter(|u| !u.is_empty()) {
            args.push(format!("--username={username}"));
            args.push(format!(
                "--password={}",
                self.password.as_deref().unwrap_or_default()
            ));
        }
        args.push("--no-auth-cache".to_string());
        args.push("--non-interactive".to_string());
        args
    }
}
