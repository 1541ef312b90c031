use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_host: String,
    pub server_port: u16,
    /// Allowed CORS origins (comma-separated). Use "*" for any origin (development only).
    pub cors_origins: Vec<String>,
    /// Name of the radio served by the index page, created on startup if missing
    pub radio_name: String,
    /// The DJ refills the playlist once it holds fewer tracks than this
    pub dj_min_tracks: usize,
    /// Playlist size the DJ refills up to
    pub dj_target_tracks: usize,
    /// Polling interval handed to clients in update payloads
    pub update_interval_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        // JWT_SECRET is required - no insecure defaults
        let jwt_secret = env::var("JWT_SECRET").map_err(|_| {
            anyhow::anyhow!(
                "JWT_SECRET environment variable must be set. \
                Generate a secure secret with: openssl rand -base64 32"
            )
        })?;

        // Validate JWT secret length (at least 32 bytes for HS256)
        if jwt_secret.len() < 32 {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least 32 characters long for security. \
                Generate a secure secret with: openssl rand -base64 32"
            ));
        }

        // Parse CORS origins - default to localhost for development
        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000,http://localhost:8000".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let config = Config {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://veto_radio.db?mode=rwc".to_string()),
            jwt_secret,
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .unwrap_or(8000),
            cors_origins,
            radio_name: env::var("RADIO_NAME").unwrap_or_else(|_| "radio".to_string()),
            dj_min_tracks: parse_var("DJ_MIN_TRACKS", 10)?,
            dj_target_tracks: parse_var("DJ_TARGET_TRACKS", 25)?,
            update_interval_secs: parse_var("UPDATE_INTERVAL_SECS", 5)?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.dj_min_tracks == 0 {
            return Err(anyhow::anyhow!("DJ_MIN_TRACKS must be at least 1"));
        }
        if self.dj_target_tracks < self.dj_min_tracks {
            return Err(anyhow::anyhow!(
                "DJ_TARGET_TRACKS ({}) must not be below DJ_MIN_TRACKS ({})",
                self.dj_target_tracks,
                self.dj_min_tracks
            ));
        }
        Ok(())
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T, anyhow::Error>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{} has an invalid value '{}': {}", name, raw, e)),
        Err(_) => Ok(default),
    }
}
