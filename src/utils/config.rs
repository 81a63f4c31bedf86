use regex::Regex;
use std::env;

const DEFAULT_PARTITIONS: &str = "users,users_info";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0} not set")]
    Missing(&'static str),
    #[error("invalid {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Clone, Debug, PartialEq)]
pub enum AppEnvironment {
    Production,
    Development,
}

impl AppEnvironment {
    pub fn from(raw_environment: String) -> Self {
        match raw_environment.as_ref() {
            "production" => Self::Production,
            _ => Self::Development,
        }
    }
}

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub partitions: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub host: String,
    pub environment: AppEnvironment,
    pub port: u16,
    pub url: String,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub database: DatabaseConfig,
    pub app: AppConfig,
}

/// Splits a priority-ordered list of partition table names. Names end up
/// interpolated into SQL so anything outside `[a-z0-9_]` is rejected.
pub fn parse_partitions(raw: &str) -> Result<Vec<String>, Error> {
    let regex = Regex::new(r"^[a-z_][a-z0-9_]*$").expect("Invalid partition name regex");

    let partitions = raw
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| match regex.is_match(name) {
            true => Ok(name.to_string()),
            false => Err(Error::Invalid {
                name: "USER_PARTITIONS",
                value: name.to_string(),
            }),
        })
        .collect::<Result<Vec<_>, _>>()?;

    if partitions.is_empty() {
        return Err(Error::Invalid {
            name: "USER_PARTITIONS",
            value: raw.to_string(),
        });
    }

    Ok(partitions)
}

fn parse_number<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, Error> {
    match env::var(name) {
        Ok(value) => value.parse::<T>().map_err(|_| Error::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}

pub fn get_config() -> Result<Config, Error> {
    let database_url = env::var("DATABASE_URL").map_err(|_| Error::Missing("DATABASE_URL"))?;
    let max_connections = parse_number("DATABASE_MAX_CONNECTIONS", 4u32)?;
    let partitions = parse_partitions(
        &env::var("USER_PARTITIONS").unwrap_or_else(|_| DEFAULT_PARTITIONS.to_string()),
    )?;
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let environment = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
    let port = parse_number("PORT", 8000u16)?;
    let url = env::var("URL").unwrap_or_else(|_| format!("http://{}:{}", host, port));

    Ok(Config {
        database: DatabaseConfig {
            url: database_url,
            max_connections,
            partitions,
        },
        app: AppConfig {
            host,
            environment: AppEnvironment::from(environment),
            port,
            url,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partitions_keep_priority_order() {
        let partitions = parse_partitions(" users , users_info,").unwrap();
        assert_eq!(partitions, vec!["users", "users_info"]);
    }

    #[test]
    fn partitions_reject_unsafe_names() {
        assert!(parse_partitions("users; DROP TABLE users").is_err());
        assert!(parse_partitions("Users").is_err());
        assert!(parse_partitions(" , ").is_err());
    }

    #[test]
    fn environment_defaults_to_development() {
        assert_eq!(
            AppEnvironment::from("production".to_string()),
            AppEnvironment::Production
        );
        assert_eq!(
            AppEnvironment::from("staging".to_string()),
            AppEnvironment::Development
        );
    }
}
