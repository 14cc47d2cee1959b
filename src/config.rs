use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Runtime settings, read once at startup from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub database_url: String,
    pub jwt_secret: String,
    /// Credentials for the admin account seeded into an empty database.
    pub admin_username: String,
    pub admin_password: String,
    pub admin_email: String,
    pub export: ExportConfig,
}

/// Settings for the PDF export pipeline.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Directory holding scratch .tex/.pdf files during compilation.
    pub scratch_dir: PathBuf,
    /// LaTeX build command, latexmk by default.
    pub engine: String,
    /// Upper bound on a single compiler run.
    pub timeout: Duration,
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

impl Config {
    pub fn from_env() -> Self {
        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) => secret,
            Err(_) => {
                tracing::warn!("JWT_SECRET not set, using an insecure development secret");
                "stockroom-dev-secret".to_string()
            }
        };
        let timeout_secs = env::var("EXPORT_TIMEOUT_SECS")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(60);
        Self {
            bind_addr: var_or("BIND_ADDR", "0.0.0.0:3000"),
            database_url: var_or("DATABASE_URL", "sqlite:stockroom.db?mode=rwc"),
            jwt_secret,
            admin_username: var_or("ADMIN_USERNAME", "admin"),
            admin_password: var_or("ADMIN_PASSWORD", "admin"),
            admin_email: var_or("ADMIN_EMAIL", "admin@example.com"),
            export: ExportConfig {
                scratch_dir: PathBuf::from(var_or("EXPORT_SCRATCH_DIR", "export-scratch")),
                engine: var_or("EXPORT_ENGINE", "latexmk"),
                timeout: Duration::from_secs(timeout_secs),
            },
        }
    }
}
