use portal_auth_types::token::DEFAULT_TOKEN_TTL_SECS;

/// Portal service configuration loaded from environment variables.
#[derive(Debug)]
pub struct PortalConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// HS256 signing secret shared by every token this service issues and accepts.
    pub jwt_secret: String,
    /// TCP port for the HTTP server (default 8080). Env var: `PORTAL_PORT`.
    pub portal_port: u16,
    /// Token validity window in seconds (default 24h). Env var: `TOKEN_TTL_SECS`.
    pub token_ttl_secs: u64,
}

impl PortalConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            jwt_secret: std::env::var("JWT_SECRET").expect("JWT_SECRET"),
            portal_port: std::env::var("PORTAL_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
            token_ttl_secs: std::env::var("TOKEN_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TOKEN_TTL_SECS),
        }
    }
}
