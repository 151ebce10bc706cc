//! サービスレコード

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// プロビジョニング対象のサービスレコード
///
/// 呼び出し側（レコードストア）が所有する。1回のライフサイクル操作の間は不変。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRecord {
    /// 一意なID。マニフェストのファイル名と compose のプロジェクト名になる
    pub id: String,
    /// テンプレート識別子（例: "redis", "cassandra"）
    pub template: String,
    /// ユーザー指定の上書き設定（image, restartPolicy, password など）
    #[serde(default)]
    pub configs: BTreeMap<String, String>,
}

impl ServiceRecord {
    pub fn new(id: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            template: template.into(),
            configs: BTreeMap::new(),
        }
    }

    pub fn with_config(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.configs.insert(key.into(), value.into());
        self
    }

    /// 設定値を取得
    pub fn config(&self, key: &str) -> Option<&str> {
        self.configs.get(key).map(String::as_str)
    }

    /// 設定値を取得（未指定ならデフォルト）
    pub fn config_or(&self, key: &str, default: &str) -> String {
        self.config(key).unwrap_or(default).to_string()
    }
}
