//! 再起動ポリシー

use crate::error::TopologyError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 再起動ポリシー
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RestartPolicy {
    /// 再起動しない
    No,
    /// 常に再起動
    Always,
    /// 異常終了時のみ再起動
    OnFailure,
    /// 明示的に停止しない限り再起動
    UnlessStopped,
}

impl RestartPolicy {
    /// 文字列からパース
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "no" => Some(Self::No),
            "always" => Some(Self::Always),
            "on-failure" | "on_failure" => Some(Self::OnFailure),
            "unless-stopped" | "unless_stopped" => Some(Self::UnlessStopped),
            _ => None,
        }
    }

    /// compose ファイルに書き出す文字列
    pub fn as_compose_str(&self) -> &'static str {
        match self {
            Self::No => "no",
            Self::Always => "always",
            Self::OnFailure => "on-failure",
            Self::UnlessStopped => "unless-stopped",
        }
    }

    /// 設定値からパース（空文字・未指定はデフォルト）
    pub fn from_config(value: Option<&str>, default: Self) -> Result<Self, TopologyError> {
        match value.map(str::trim) {
            None | Some("") => Ok(default),
            Some(v) => Self::parse(v).ok_or_else(|| TopologyError::InvalidRestartPolicy(v.into())),
        }
    }
}

impl fmt::Display for RestartPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_compose_str())
    }
}

impl FromStr for RestartPolicy {
    type Err = TopologyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| TopologyError::InvalidRestartPolicy(s.to_string()))
    }
}
