use crate::config::config::AppConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::PathBuf;

/// 环境变量前缀，嵌套字段用 `__` 分隔，如 `SUBJECTS_SERVER__PORT`
pub const ENV_PREFIX: &str = "SUBJECTS_";
/// 数据库路径覆盖
pub const DB_PATH_ENV: &str = "SUBJECTS_DB_PATH";
/// 配置文件路径覆盖
pub const CONFIG_PATH_ENV: &str = "SUBJECTS_CONFIG";

/// 配置加载器
pub struct ConfigLoader;

impl ConfigLoader {
    /// 从默认路径加载配置
    ///
    /// 优先级（后者覆盖前者）：
    /// 1. 内置默认值
    /// 2. ./config.toml（或 `SUBJECTS_CONFIG` 指定的文件），不存在则跳过
    /// 3. `SUBJECTS_` 前缀环境变量
    /// 4. `SUBJECTS_DB_PATH`
    pub fn load() -> Result<AppConfig, figment::Error> {
        let path = std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_config_path());
        Self::load_from(path)
    }

    /// 从指定路径加载配置
    pub fn load_from(path: PathBuf) -> Result<AppConfig, figment::Error> {
        Self::figment(path).extract()
    }

    fn figment(path: PathBuf) -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .merge(
                Env::raw()
                    .only(&[DB_PATH_ENV])
                    .map(|_| "database.path".into()),
            )
    }

    /// 验证配置
    pub fn validate(config: &AppConfig) -> Result<(), ConfigValidationError> {
        if config.server.port == 0 {
            return Err(ConfigValidationError::InvalidPort);
        }

        if config.database.path.as_os_str().is_empty() {
            return Err(ConfigValidationError::MissingDatabasePath);
        }

        Ok(())
    }
}

/// 配置验证错误
#[derive(thiserror::Error, Debug)]
pub enum ConfigValidationError {
    #[error("服务端口无效，必须大于 0")]
    InvalidPort,

    #[error("数据库文件路径未配置")]
    MissingDatabasePath,
}

/// 获取默认配置文件路径
pub fn default_config_path() -> PathBuf {
    PathBuf::from("config.toml")
}
