// src/config.rs

use std::{env, net::SocketAddr};

use thiserror::Error;

use crate::progress::grading::GradingScale;

/// Error raised while reading configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required variable is not set.
    #[error("{0} must be set")]
    Missing(&'static str),

    /// A variable is set but its value cannot be used.
    #[error("{key} has an invalid value: '{value}'")]
    Invalid { key: &'static str, value: String },
}

/// Bootstrap teacher account created on startup when absent.
#[derive(Debug, Clone)]
pub struct SeedTeacher {
    pub nip: String,
    pub password: String,
    pub name: String,
    pub school_id: i64,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    /// Token lifetime in seconds.
    pub jwt_expiration: u64,
    pub rust_log: String,
    pub bind_addr: SocketAddr,
    pub grading: GradingScale,
    pub seed_teacher: Option<SeedTeacher>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = required("DATABASE_URL")?;
        let jwt_secret = required("JWT_SECRET")?;

        let jwt_expiration = parsed("JWT_EXPIRATION")?.unwrap_or(86_400);

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let bind_addr = parsed("BIND_ADDR")?
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

        let defaults = GradingScale::default();
        let grading = GradingScale::new(
            parsed("GRADE_A_MIN")?.unwrap_or(defaults.a_min),
            parsed("GRADE_B_MIN")?.unwrap_or(defaults.b_min),
            parsed("GRADE_C_MIN")?.unwrap_or(defaults.c_min),
        )
        .ok_or_else(|| ConfigError::Invalid {
            key: "GRADE_*_MIN",
            value: "thresholds must be descending and at most 100".to_string(),
        })?;

        let seed_teacher = match (
            env::var("SEED_TEACHER_NIP").ok(),
            env::var("SEED_TEACHER_PASSWORD").ok(),
        ) {
            (Some(nip), Some(password)) => Some(SeedTeacher {
                name: env::var("SEED_TEACHER_NAME").unwrap_or_else(|_| nip.clone()),
                school_id: parsed("SEED_TEACHER_SCHOOL_ID")?
                    .ok_or(ConfigError::Missing("SEED_TEACHER_SCHOOL_ID"))?,
                nip,
                password,
            }),
            _ => None,
        };

        Ok(Self {
            database_url,
            jwt_secret,
            jwt_expiration,
            rust_log,
            bind_addr,
            grading,
            seed_teacher,
        })
    }
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::Missing(key))
}

fn parsed<T: std::str::FromStr>(key: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { key, value }),
        Err(_) => Ok(None),
    }
}
