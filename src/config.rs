//! Application configuration module / 应用配置模块
//!
//! Manages application configuration loaded from config.json
//! Creates default config file on first run / 首次运行时创建默认配置文件
//! Environment variables override file values (PORT, HOST, API_KEY, REPOSITORY_PATH, APP_ENV)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration / 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Server configuration / 服务器配置
    pub server: ServerConfig,
    /// Shared-secret configuration / API密钥配置
    pub auth: AuthConfig,
    /// Master index location / 主索引位置
    pub index: IndexConfig,
    /// "production" or "development" / 运行环境
    pub environment: String,
}

/// Server configuration / 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address / 服务器监听地址
    pub host: String,
    /// Server port / 服务器端口
    pub port: u16,
}

/// API key configuration / API密钥配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Key expected in `x-api-key` header or `api_key` query parameter
    pub api_key: String,
}

/// Index configuration / 索引配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Repository root directory / 仓库根目录
    pub repository_path: String,
    /// Master index file (relative to repository_path) / 主索引文件
    pub master_index_file: String,
    /// Document served at `/` (relative to repository_path) / 根路径文档
    pub root_document: String,
    /// Refuse to start when the master index cannot be loaded / 加载失败时拒绝启动
    pub fail_fast: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            auth: AuthConfig::default(),
            index: IndexConfig::default(),
            environment: "production".to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            api_key: "your-super-secret-api-key-123".to_string(),
        }
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            repository_path: ".".to_string(),
            master_index_file: "metadata/plans_master_index.json".to_string(),
            root_document: "README.md".to_string(),
            fail_fast: false,
        }
    }
}

impl AppConfig {
    /// Get the full master index path / 获取主索引完整路径
    pub fn get_master_index_path(&self) -> PathBuf {
        Path::new(&self.index.repository_path).join(&self.index.master_index_file)
    }

    /// Get the root document path / 获取根文档路径
    pub fn get_root_document_path(&self) -> PathBuf {
        Path::new(&self.index.repository_path).join(&self.index.root_document)
    }

    /// Get the server bind address / 获取服务器绑定地址
    pub fn get_bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Whether error details may be returned to clients / 是否为开发模式
    pub fn is_development(&self) -> bool {
        self.environment.eq_ignore_ascii_case("development")
    }

    /// Apply overrides from a variable lookup (normally `std::env::var`) / 应用环境变量覆盖
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            match port.trim().parse::<u16>() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!("Ignoring invalid PORT value: {}", port),
            }
        }
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(key) = lookup("API_KEY") {
            self.auth.api_key = key;
        }
        if let Some(path) = lookup("REPOSITORY_PATH") {
            self.index.repository_path = path;
        }
        if let Some(env) = lookup("APP_ENV") {
            self.environment = env;
        }
    }
}

/// Get the config file path / 获取配置文件路径
fn get_config_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("config.json")
}

/// Load configuration from file, or create default if not exists / 加载配置文件，不存在则创建默认配置
pub fn load_config() -> Result<AppConfig, String> {
    let config_path = get_config_path();

    let mut config = if config_path.exists() {
        let config = read_config(&config_path)?;
        tracing::info!("Loaded configuration from {:?}", config_path);
        config
    } else {
        // Create default config / 创建默认配置
        let config = AppConfig::default();
        save_config(&config_path, &config)?;
        tracing::info!("Created default configuration at {:?}", config_path);
        config
    };

    config.apply_overrides(|name| std::env::var(name).ok());
    Ok(config)
}

/// Read and parse a config file / 读取并解析配置文件
pub fn read_config(path: &Path) -> Result<AppConfig, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config file: {}", e))?;

    serde_json::from_str(&content).map_err(|e| format!("Failed to parse config file: {}", e))
}

/// Save configuration to file / 保存配置到文件
pub fn save_config(path: &Path, config: &AppConfig) -> Result<(), String> {
    let content = serde_json::to_string_pretty(config)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;

    std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {}", e))?;

    Ok(())
}
