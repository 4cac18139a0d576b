use serde::Deserialize;

/// Server configuration loaded from config.toml with env var overrides.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to. Default: "127.0.0.1"
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on. Default: 3000
    #[serde(default = "default_port")]
    pub port: u16,
    /// Allowed CORS origins. Default: ["http://localhost:1420"]
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
    /// Tracing log level. Default: "info"
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Base URL clients use to reach this server; avatar URLs are built from it.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
    #[serde(default)]
    pub storage: FileStorageConfig,
    #[serde(default)]
    pub jwt: JwtConfig,
}

/// Object store settings for avatar images.
#[derive(Debug, Clone, Deserialize)]
pub struct FileStorageConfig {
    /// `"local"` or `"memory"`. Default: "local"
    #[serde(default = "default_storage_backend")]
    pub backend: String,
    /// Root directory for the `local` backend. Default: "./data/blobs"
    #[serde(default = "default_storage_local_path")]
    pub local_path: String,
    /// Largest accepted avatar upload. Default: 5 MB
    #[serde(default = "default_max_file_size_bytes")]
    pub max_file_size_bytes: usize,
}

/// Ed25519 key pair (PEM) and lifetime for access tokens.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    #[serde(default)]
    pub private_key_pem: String,
    #[serde(default)]
    pub public_key_pem: String,
    /// Default: 900 (15 minutes)
    #[serde(default = "default_access_token_ttl_seconds")]
    pub access_token_ttl_seconds: u64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    3000
}
fn default_cors_origins() -> Vec<String> {
    vec!["http://localhost:1420".to_string()]
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_public_base_url() -> String {
    "http://127.0.0.1:3000".to_string()
}
fn default_storage_backend() -> String {
    "local".to_string()
}
fn default_storage_local_path() -> String {
    "./data/blobs".to_string()
}
fn default_max_file_size_bytes() -> usize {
    profilesync_shared::constants::MAX_AVATAR_SIZE_BYTES
}
fn default_access_token_ttl_seconds() -> u64 {
    900
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
            log_level: default_log_level(),
            public_base_url: default_public_base_url(),
            storage: FileStorageConfig::default(),
            jwt: JwtConfig::default(),
        }
    }
}

impl Default for FileStorageConfig {
    fn default() -> Self {
        Self {
            backend: default_storage_backend(),
            local_path: default_storage_local_path(),
            max_file_size_bytes: default_max_file_size_bytes(),
        }
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            private_key_pem: String::new(),
            public_key_pem: String::new(),
            access_token_ttl_seconds: default_access_token_ttl_seconds(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from TOML file with environment variable overrides.
    ///
    /// Reads `config.toml` from CWD (or path in `CONFIG_PATH` env var),
    /// then overrides individual fields from env vars.
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        let contents = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&contents)
    }

    /// Load configuration from a TOML string, then apply env var overrides.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let mut config: ServerConfig = toml::from_str(toml_str)?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply environment variable overrides to the config.
    ///
    /// Returns an error if an env var is set but has an invalid format
    /// (e.g., PORT=abc).
    pub fn apply_env_overrides(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        if let Ok(val) = std::env::var("HOST") {
            self.host = val;
        }
        if let Ok(val) = std::env::var("PORT") {
            self.port = val
                .parse()
                .map_err(|_| format!("invalid PORT value: {val}"))?;
        }
        if let Ok(val) = std::env::var("LOG_LEVEL") {
            self.log_level = val;
        }
        if let Ok(val) = std::env::var("PUBLIC_BASE_URL") {
            self.public_base_url = val;
        }
        if let Ok(val) = std::env::var("STORAGE_BACKEND") {
            self.storage.backend = val;
        }
        if let Ok(val) = std::env::var("STORAGE_LOCAL_PATH") {
            self.storage.local_path = val;
        }
        if let Ok(val) = std::env::var("MAX_AVATAR_SIZE_BYTES") {
            self.storage.max_file_size_bytes = val
                .parse()
                .map_err(|_| format!("invalid MAX_AVATAR_SIZE_BYTES value: {val}"))?;
        }
        Ok(())
    }
}
