use chrono::NaiveTime;
use dotenvy::dotenv;
use std::env;

use crate::engine::status::AttendancePolicy;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,
    pub token_ttl: usize,

    // Attendance policy
    pub late_cutoff: NaiveTime,
    pub half_day_hours: f64,

    // Rate limiting
    pub rate_login_per_min: u32,
    pub rate_register_per_min: u32,
    pub rate_api_per_min: u32,

    pub api_prefix: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            server_addr: env::var("SERVER_ADDR").expect("SERVER_ADDR must be set"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            token_ttl: env::var("TOKEN_TTL")
                .unwrap_or_else(|_| "86400".to_string()) // default 24h
                .parse()
                .expect("TOKEN_TTL must be a number of seconds"),

            late_cutoff: NaiveTime::parse_from_str(
                &env::var("LATE_CUTOFF").unwrap_or_else(|_| "09:00".to_string()),
                "%H:%M",
            )
            .expect("LATE_CUTOFF must be HH:MM"),
            half_day_hours: env::var("HALF_DAY_HOURS")
                .unwrap_or_else(|_| "4".to_string())
                .parse()
                .expect("HALF_DAY_HOURS must be a number"),

            rate_login_per_min: env::var("RATE_LOGIN_PER_MIN")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .expect("RATE_LOGIN_PER_MIN must be a number"),
            rate_register_per_min: env::var("RATE_REGISTER_PER_MIN")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .expect("RATE_REGISTER_PER_MIN must be a number"),
            rate_api_per_min: env::var("RATE_API_PER_MIN")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .expect("RATE_API_PER_MIN must be a number"),

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),
        }
    }

    pub fn policy(&self) -> AttendancePolicy {
        AttendancePolicy {
            late_cutoff: self.late_cutoff,
            half_day_hours: self.half_day_hours,
        }
    }
}
