use log::info;
use reqwest::Url;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("unknown service '{0}', expected one of: users, movies, showtimes, bookings, ui")]
    UnknownService(String),

    #[error("invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    Users,
    Movies,
    Showtimes,
    Bookings,
    Ui,
}

impl Service {
    pub const ALL: [Service; 5] = [
        Service::Users,
        Service::Movies,
        Service::Showtimes,
        Service::Bookings,
        Service::Ui,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Service::Users => "users",
            Service::Movies => "movies",
            Service::Showtimes => "showtimes",
            Service::Bookings => "bookings",
            Service::Ui => "ui",
        }
    }

    pub fn default_port(self) -> u16 {
        match self {
            Service::Users => 5000,
            Service::Movies => 5001,
            Service::Showtimes => 5002,
            Service::Bookings => 5003,
            Service::Ui => 5004,
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Service {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Service::ALL
            .iter()
            .copied()
            .find(|service| service.name() == s)
            .ok_or_else(|| ConfigError::UnknownService(s.to_owned()))
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub service: Service,
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub users_url: Url,
    pub movies_url: Url,
    pub showtimes_url: Url,
    pub bookings_url: Url,
}

impl Config {
    pub fn load(service: Service) -> Result<Self, ConfigError> {
        Self::from_lookup(service, |key| env::var(key).ok())
    }

    pub fn from_lookup<F>(service: Service, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &'static str, default: String| -> String {
            lookup(key).unwrap_or_else(|| {
                info!("{} not set, using default: {}", key, default);
                default
            })
        };
        let url = |key: &'static str, upstream: Service| -> Result<Url, ConfigError> {
            let default = format!("http://127.0.0.1:{}", upstream.default_port());
            parse(key, &var(key, default))
        };

        Ok(Config {
            service,
            host: var("CINEMA_HOST", "0.0.0.0".to_owned()),
            port: parse("CINEMA_PORT", &var("CINEMA_PORT", service.default_port().to_string()))?,
            data_dir: PathBuf::from(var("CINEMA_DATA_DIR", "database".to_owned())),
            users_url: url("CINEMA_USERS_URL", Service::Users)?,
            movies_url: url("CINEMA_MOVIES_URL", Service::Movies)?,
            showtimes_url: url("CINEMA_SHOWTIMES_URL", Service::Showtimes)?,
            bookings_url: url("CINEMA_BOOKINGS_URL", Service::Bookings)?,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn data_file(&self, name: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", name))
    }
}

fn parse<T>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    value.parse().map_err(|err: T::Err| ConfigError::Invalid {
        key,
        message: err.to_string(),
    })
}
