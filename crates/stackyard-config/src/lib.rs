pub mod error;

pub use error::*;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 設定ファイルパスを直接指定する環境変数
pub const CONFIG_PATH_ENV: &str = "STACKYARD_CONFIG_PATH";
/// ストレージパスを上書きする環境変数
pub const STORAGE_PATH_ENV: &str = "STACKYARD_STORAGE_PATH";
/// 実行モードを上書きする環境変数
pub const MODE_ENV: &str = "STACKYARD_MODE";

const CONFIG_CANDIDATES: [&str; 2] = ["stackyard.yml", ".stackyard.yml"];

/// 実行モード
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeMode {
    /// オーケストレータの stdout/stderr をログファイルに保存する
    Dev,
    #[default]
    Prod,
}

impl RuntimeMode {
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "dev" | "development" => Ok(Self::Dev),
            "prod" | "production" => Ok(Self::Prod),
            _ => Err(ConfigError::InvalidMode(s.to_string())),
        }
    }
}

impl fmt::Display for RuntimeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dev => f.write_str("dev"),
            Self::Prod => f.write_str("prod"),
        }
    }
}

/// デプロイランタイムの設定
///
/// YAML形式：
/// ```yaml
/// storage_path: /var/lib/stackyard
/// mode: dev
/// compose_command: ["docker", "compose"]
/// command_timeout_secs: 300
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// マニフェストと診断ログの保存先
    #[serde(default = "default_storage_path")]
    pub storage_path: PathBuf,
    #[serde(default)]
    pub mode: RuntimeMode,
    /// オーケストレータの起動コマンド（プログラム + 先頭引数）
    #[serde(default = "default_compose_command")]
    pub compose_command: Vec<String>,
    /// 外部コマンド1回あたりのタイムアウト（秒）
    #[serde(default = "default_command_timeout_secs")]
    pub command_timeout_secs: u64,
}

fn default_storage_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("stackyard"))
        .unwrap_or_else(|| PathBuf::from(".stackyard"))
}

fn default_compose_command() -> Vec<String> {
    vec!["docker-compose".to_string()]
}

fn default_command_timeout_secs() -> u64 {
    300
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            storage_path: default_storage_path(),
            mode: RuntimeMode::default(),
            compose_command: default_compose_command(),
            command_timeout_secs: default_command_timeout_secs(),
        }
    }
}

impl RuntimeConfig {
    /// 指定したストレージパスでデフォルト設定を作成
    pub fn with_storage_path(storage_path: impl Into<PathBuf>) -> Self {
        Self {
            storage_path: storage_path.into(),
            ..Default::default()
        }
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }

    /// 診断ログを保存するか
    pub fn captures_diagnostics(&self) -> bool {
        self.mode == RuntimeMode::Dev
    }

    /// `{storage_path}/{id}.yml`
    pub fn manifest_path(&self, id: &str) -> PathBuf {
        self.storage_path.join(format!("{}.yml", id))
    }

    /// `{storage_path}/{id}.stdout.log`
    pub fn stdout_log_path(&self, id: &str) -> PathBuf {
        self.storage_path.join(format!("{}.stdout.log", id))
    }

    /// `{storage_path}/{id}.stderr.log`
    pub fn stderr_log_path(&self, id: &str) -> PathBuf {
        self.storage_path.join(format!("{}.stderr.log", id))
    }

    /// 設定値を検証
    pub fn validate(&self) -> Result<()> {
        if self.compose_command.first().is_none_or(|p| p.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                key: "compose_command".to_string(),
                message: "プログラム名が空です".to_string(),
            });
        }
        if self.command_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "command_timeout_secs".to_string(),
                message: "1以上を指定してください".to_string(),
            });
        }
        Ok(())
    }

    /// 環境変数による上書きを適用
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(path) = std::env::var(STORAGE_PATH_ENV) {
            if !path.trim().is_empty() {
                self.storage_path = PathBuf::from(path);
            }
        }
        if let Ok(mode) = std::env::var(MODE_ENV) {
            self.mode = RuntimeMode::parse(&mode)?;
        }
        Ok(())
    }
}

/// Stackyard の設定ディレクトリを取得
pub fn get_config_dir() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .ok_or(ConfigError::ConfigDirNotFound)?
        .join("stackyard"))
}

/// 設定ファイルを探す
///
/// 以下の優先順位で検索:
/// 1. 環境変数 STACKYARD_CONFIG_PATH (直接パス指定)
/// 2. カレントディレクトリ: stackyard.yml, .stackyard.yml
/// 3. ~/.config/stackyard/config.yml (グローバル設定)
///
/// どれも見つからなければ `None`（デフォルト設定で動作する）。
pub fn find_config_file() -> Result<Option<PathBuf>> {
    // 1. 環境変数で直接指定
    if let Ok(config_path) = std::env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(config_path);
        if path.exists() {
            return Ok(Some(path));
        }
        tracing::warn!(path = %path.display(), "{} points to a missing file", CONFIG_PATH_ENV);
    }

    // 2. カレントディレクトリで検索
    let current_dir = std::env::current_dir()?;
    for filename in &CONFIG_CANDIDATES {
        let path = current_dir.join(filename);
        if path.exists() {
            return Ok(Some(path));
        }
    }

    // 3. グローバル設定ファイル
    match get_config_dir() {
        Ok(config_dir) => {
            let global_config = config_dir.join("config.yml");
            if global_config.exists() {
                return Ok(Some(global_config));
            }
        }
        Err(ConfigError::ConfigDirNotFound) => {
            tracing::debug!("No user config directory, skipping global config");
        }
        Err(e) => return Err(e),
    }

    Ok(None)
}

/// 設定ファイルを読み込む（環境変数の上書きは適用しない）
pub fn load_from_path(path: &Path) -> Result<RuntimeConfig> {
    let content = std::fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(RuntimeConfig::default());
    }
    serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// 設定を読み込む
///
/// 設定ファイル → 環境変数の順に適用し、最後に検証する。
pub fn load_config() -> Result<RuntimeConfig> {
    let mut config = match find_config_file()? {
        Some(path) => {
            tracing::debug!(path = %path.display(), "Loading configuration");
            load_from_path(&path)?
        }
        None => RuntimeConfig::default(),
    };

    config.apply_env_overrides()?;
    config.validate()?;
    Ok(config)
}
