//! Administrator credential check
//!
//! A single shared credential pair, compared with exact, case-sensitive
//! equality. No session or token is issued after a successful check.

/// Decides whether a user/password pair belongs to the administrator
pub trait AdminVerifier: Send + Sync {
    fn verify(&self, user: &str, password: &str) -> bool;
}

impl<F> AdminVerifier for F
where
    F: Fn(&str, &str) -> bool + Send + Sync,
{
    fn verify(&self, user: &str, password: &str) -> bool {
        self(user, password)
    }
}

/// Credential pair taken from `ADMIN_USER` / `ADMIN_PASS`
///
/// When either value is missing no login can succeed.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials {
    user: Option<String>,
    password: Option<String>,
}

impl StaticCredentials {
    pub fn new(user: Option<String>, password: Option<String>) -> Self {
        Self { user, password }
    }

    pub fn is_configured(&self) -> bool {
        self.user.is_some() && self.password.is_some()
    }
}

impl AdminVerifier for StaticCredentials {
    fn verify(&self, user: &str, password: &str) -> bool {
        match (&self.user, &self.password) {
            (Some(expected_user), Some(expected_password)) => {
                expected_user == user && expected_password == password
            }
            _ => false,
        }
    }
}
