use std::path::PathBuf;

/// Runtime configuration, read from environment variables with fallbacks.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub data_file: PathBuf,
}

impl AppConfig {
    /// Read configuration from the environment.
    /// `BIND_ADDR` defaults to 0.0.0.0:3000, `PATIENTS_FILE` to patients.json.
    pub fn from_env() -> Self {
        let bind_addr =
            std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let data_file = std::env::var("PATIENTS_FILE")
            .unwrap_or_else(|_| "patients.json".to_string())
            .into();

        Self {
            bind_addr,
            data_file,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            data_file: PathBuf::from("patients.json"),
        }
    }
}
