#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Invalid port in {variable}: {source}")]
    InvalidPort {
        variable: String,
        source: std::num::ParseIntError,
    },
}

#[derive(serde::Deserialize, Clone)]
pub struct Settings {
    pub robot: EndpointSettings,
    pub client: EndpointSettings,
}

#[derive(serde::Deserialize, Clone)]
pub struct EndpointSettings {
    pub port: u16,
    pub host: String,
}

impl Settings {
    /// Reads `BROKER_HOST`, `ROBOT_PORT` and `CLIENT_PORT`, falling
    /// back to 0.0.0.0:3001 (robots) and 0.0.0.0:3002 (client).
    pub fn from_env() -> Result<Self, SettingsError> {
        let host = std::env::var("BROKER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        Ok(Self {
            robot: EndpointSettings {
                host: host.clone(),
                port: env_port("ROBOT_PORT", 3001)?,
            },
            client: EndpointSettings {
                host,
                port: env_port("CLIENT_PORT", 3002)?,
            },
        })
    }
}

fn env_port(variable: &str, default: u16) -> Result<u16, SettingsError> {
    match std::env::var(variable) {
        Ok(value) => value.parse().map_err(|source| SettingsError::InvalidPort {
            variable: variable.to_string(),
            source,
        }),
        Err(_) => Ok(default),
    }
}
