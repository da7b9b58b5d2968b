use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// Most fields have defaults suitable for local development; the JWT
/// secret is deliberately required so no default secret can ship.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `10`). A timed-out
    /// request surfaces to the client as retryable.
    pub request_timeout_secs: u64,
    /// Emails allowed to register with the ADMIN role, parsed from
    /// comma-separated `ADMIN_EMAIL_WHITELIST`. Matched
    /// case-insensitively.
    pub admin_email_whitelist: Vec<String>,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                 |
    /// |-------------------------|-------------------------|
    /// | `HOST`                  | `0.0.0.0`               |
    /// | `PORT`                  | `3000`                  |
    /// | `CORS_ORIGINS`          | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`  | `10`                    |
    /// | `ADMIN_EMAIL_WHITELIST` | empty (no admin signup) |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is unset (see [`JwtConfig::from_env`]) or
    /// a numeric variable fails to parse; misconfiguration should fail
    /// at startup, not at request time.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins = split_csv(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".into()),
        );

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let admin_email_whitelist =
            split_csv(&std::env::var("ADMIN_EMAIL_WHITELIST").unwrap_or_default())
                .into_iter()
                .map(|e| e.to_lowercase())
                .collect();

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            admin_email_whitelist,
            jwt,
        }
    }

    /// Whether an email may register with the ADMIN role.
    pub fn is_admin_email(&self, email: &str) -> bool {
        let email = email.to_lowercase();
        self.admin_email_whitelist.iter().any(|e| e == &email)
    }
}

fn split_csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
