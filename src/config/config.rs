use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 快照持久化策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotStrategy {
    /// 整个快照序列化为 JSON，存放在条目表的保留键下
    #[default]
    Blob,
    /// 每个被占用的槽位一行
    Rows,
}

impl std::fmt::Display for SnapshotStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnapshotStrategy::Blob => write!(f, "blob"),
            SnapshotStrategy::Rows => write!(f, "rows"),
        }
    }
}

/// 数据库配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite 数据库文件路径
    pub path: PathBuf,
    /// 快照持久化策略
    pub snapshot_strategy: SnapshotStrategy,
    /// 忙等待超时（毫秒）
    pub busy_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("subjects.db"),
            snapshot_strategy: SnapshotStrategy::Blob,
            busy_timeout_ms: 5_000,
        }
    }
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 服务地址
    pub host: String,
    /// 服务端口
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 5000,
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: String,
    /// 结构化日志格式
    pub structured: bool,
    /// 日志文件目录，设置后按天滚动写文件
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            structured: false,
            log_dir: None,
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// 数据库配置
    pub database: DatabaseConfig,
    /// 服务器配置
    pub server: ServerConfig,
    /// 日志配置
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// 创建开发环境配置
    pub fn development() -> Self {
        let mut config = Self::default();
        config.logging.level = "debug".into();
        config
    }

    /// 监听地址
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.database.path, PathBuf::from("subjects.db"));
        assert_eq!(config.database.snapshot_strategy, SnapshotStrategy::Blob);
        assert_eq!(config.bind_addr(), "127.0.0.1:5000");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_development_is_verbose() {
        assert_eq!(AppConfig::development().logging.level, "debug");
    }

    #[test]
    fn test_strategy_serde_names() {
        let rows: SnapshotStrategy = serde_json::from_str("\"rows\"").unwrap();
        assert_eq!(rows, SnapshotStrategy::Rows);
        assert_eq!(SnapshotStrategy::Blob.to_string(), "blob");
    }
}
