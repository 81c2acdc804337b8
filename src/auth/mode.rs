//! Whether authentication is switched on at all.

use super::routes::RouteClassifier;

/// Authentication mode read from `AUTH_MODE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// `AUTH_MODE=sso` (any case): validate tokens on protected routes
    Sso,
    /// Any other value, or unset: skip authentication
    Open,
}

impl AuthMode {
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("sso") {
            AuthMode::Sso
        } else {
            AuthMode::Open
        }
    }
}

/// Authentication settings from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSettings {
    pub mode: AuthMode,
    pub oidc_issuer_url: Option<String>,
    pub oidc_application_id: Option<String>,
}

impl AuthSettings {
    pub fn from_env() -> Self {
        Self::from_env_with(|name| std::env::var(name).ok())
    }

    /// Read `AUTH_MODE`, `OIDC_ISSUER_URL` and `OIDC_APPLICATION_ID` through `lookup`.
    pub fn from_env_with<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.is_empty());
        Self {
            mode: lookup("AUTH_MODE")
                .map(|v| AuthMode::parse(&v))
                .unwrap_or(AuthMode::Open),
            oidc_issuer_url: non_empty("OIDC_ISSUER_URL"),
            oidc_application_id: non_empty("OIDC_APPLICATION_ID"),
        }
    }

    /// Authentication is enforced only in SSO mode with complete OIDC settings.
    pub fn is_enforced(&self) -> bool {
        if self.mode != AuthMode::Sso {
            tracing::debug!(mode = ?self.mode, "Authentication disabled");
            return false;
        }
        if self.oidc_issuer_url.is_none() {
            tracing::warn!("AUTH_MODE=sso but OIDC_ISSUER_URL is not configured. Authentication disabled.");
            return false;
        }
        if self.oidc_application_id.is_none() {
            tracing::warn!(
                "AUTH_MODE=sso but OIDC_APPLICATION_ID is not configured. Authentication disabled."
            );
            return false;
        }
        true
    }

    /// Whether a request to `path` must carry a valid token.
    pub fn requires_auth(&self, routes: &RouteClassifier, path: &str) -> bool {
        self.is_enforced() && routes.is_authenticated(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(vars: &[(&str, &str)]) -> AuthSettings {
        let vars: Vec<(String, String)> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AuthSettings::from_env_with(|name| {
            vars.iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.clone())
        })
    }

    #[test]
    fn test_sso_mode_is_case_insensitive() {
        for value in ["sso", "SSO", "Sso"] {
            assert_eq!(AuthMode::parse(value), AuthMode::Sso, "{}", value);
        }
    }

    #[test]
    fn test_other_modes_are_open() {
        for value in ["open", "OPEN", "false", "true", "off", "on", ""] {
            assert_eq!(AuthMode::parse(value), AuthMode::Open, "{}", value);
        }
    }

    #[test]
    fn test_padded_sso_is_open() {
        for value in [" sso", "sso ", "sso\n"] {
            assert_eq!(AuthMode::parse(value), AuthMode::Open, "{:?}", value);
        }
        let auth = settings(&[
            ("AUTH_MODE", " sso"),
            ("OIDC_ISSUER_URL", "https://auth.example.com"),
            ("OIDC_APPLICATION_ID", "app"),
        ]);
        assert!(!auth.is_enforced());
    }

    #[test]
    fn test_unset_mode_is_open() {
        assert_eq!(settings(&[]).mode, AuthMode::Open);
    }

    #[test]
    fn test_enforced_with_complete_oidc() {
        let auth = settings(&[
            ("AUTH_MODE", "sso"),
            ("OIDC_ISSUER_URL", "https://auth.example.com/realms/test"),
            ("OIDC_APPLICATION_ID", "app-123"),
        ]);
        assert!(auth.is_enforced());

        let routes = RouteClassifier::new();
        assert!(auth.requires_auth(&routes, "/v1/agents"));
        assert!(!auth.requires_auth(&routes, "/health"));
    }

    #[test]
    fn test_sso_without_issuer_is_not_enforced() {
        let auth = settings(&[("AUTH_MODE", "sso"), ("OIDC_APPLICATION_ID", "app-123")]);
        assert!(!auth.is_enforced());
    }

    #[test]
    fn test_sso_with_empty_app_id_is_not_enforced() {
        let auth = settings(&[
            ("AUTH_MODE", "SSO"),
            ("OIDC_ISSUER_URL", "https://auth.example.com"),
            ("OIDC_APPLICATION_ID", ""),
        ]);
        assert!(auth.oidc_application_id.is_none());
        assert!(!auth.requires_auth(&RouteClassifier::new(), "/v1/agents"));
    }

    #[test]
    fn test_open_mode_never_requires_auth() {
        let auth = settings(&[
            ("AUTH_MODE", "open"),
            ("OIDC_ISSUER_URL", "https://auth.example.com"),
            ("OIDC_APPLICATION_ID", "app"),
        ]);
        assert!(!auth.requires_auth(&RouteClassifier::new(), "/v1/agents"));
    }
}
