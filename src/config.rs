use std::env;

use anyhow::{anyhow, Context};

use crate::services::day::DayBoundary;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub frontend_url: String,
    pub cors_extra_origins: Vec<String>,

    pub jwt_secret: String,

    /// Fixed offset from UTC, in minutes, where calendar days start.
    pub progress_utc_offset_minutes: i32,
    pub progress_log_limit: i64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let progress_utc_offset_minutes = parse_var("PROGRESS_UTC_OFFSET_MINUTES", 0)?;
        DayBoundary::from_offset_minutes(progress_utc_offset_minutes)
            .ok_or_else(|| anyhow!("PROGRESS_UTC_OFFSET_MINUTES must be within +/-840"))?;

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: parse_var("PORT", 8080)?,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".into()),
            cors_extra_origins: env::var("CORS_EXTRA_ORIGINS")
                .map(|raw| {
                    raw.split(',')
                        .map(|o| o.trim().to_string())
                        .filter(|o| !o.is_empty())
                        .collect()
                })
                .unwrap_or_default(),

            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,

            progress_utc_offset_minutes,
            progress_log_limit: parse_var("PROGRESS_LOG_LIMIT", 365)?,
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn day_boundary(&self) -> DayBoundary {
        DayBoundary::from_offset_minutes(self.progress_utc_offset_minutes).unwrap_or_default()
    }
}

fn parse_var<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| anyhow!("{} must be a number", name)),
        Err(_) => Ok(default),
    }
}
