//! compose マニフェスト定義
//!
//! トポロジジェネレータが埋めるフィールドだけをモデル化しています。
//! compose スキーマ全体は扱いません。

use super::restart::RestartPolicy;
use crate::error::{Result, TopologyError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// compose スキーマのバージョン（固定）
pub const COMPOSE_VERSION: &str = "3";

/// compose マニフェスト
///
/// YAML形式：
/// ```yaml
/// version: "3"
/// services:
///   db1:
///     image: cassandra:4.0
///     restart: unless-stopped
///     ports: ["9042"]
///     environment: ["CASSANDRA_SEEDS=db1"]
///   db2:
///     depends_on: [db1]
///     networks: [db]
/// networks:
///   db: {}
/// ```
///
/// `services` と `networks` はソート済みマップなので、
/// 同じ入力からは常にバイト単位で同一の YAML が得られる。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub version: String,
    pub services: BTreeMap<String, NodeSpec>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub networks: BTreeMap<String, NetworkSpec>,
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            version: COMPOSE_VERSION.to_string(),
            services: BTreeMap::new(),
            networks: BTreeMap::new(),
        }
    }
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// サービス（ノード）を追加
    pub fn with_service(mut self, name: impl Into<String>, node: NodeSpec) -> Self {
        self.services.insert(name.into(), node);
        self
    }

    /// 属性なしのネットワークを宣言
    pub fn with_network(mut self, name: impl Into<String>) -> Self {
        self.networks.insert(name.into(), NetworkSpec::default());
        self
    }

    /// YAML にシリアライズ
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// YAML からパース
    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// 参照整合性を検証
    ///
    /// `depends_on` は `services` のキーを、`networks` はトップレベルで
    /// 宣言されたネットワークを指していなければならない。
    pub fn validate(&self) -> Result<()> {
        for (name, node) in &self.services {
            if let Some(target) = node
                .depends_on
                .iter()
                .find(|dep| !self.services.contains_key(*dep))
            {
                return Err(TopologyError::DanglingDependency {
                    node: name.clone(),
                    target: target.clone(),
                });
            }

            if let Some(network) = node
                .networks
                .iter()
                .find(|net| !self.networks.contains_key(*net))
            {
                return Err(TopologyError::UndeclaredNetwork {
                    node: name.clone(),
                    network: network.clone(),
                });
            }
        }
        Ok(())
    }
}

/// ノード（compose の1サービス）定義
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSpec {
    /// イメージ参照 (`name:version`)
    pub image: String,
    pub restart: RestartPolicy,
    /// exec 形式のコマンド（compose による空白分割を受けない）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<Vec<String>>,
    /// 公開するコンテナポート（ホスト側はランタイムが割り当てる）
    #[serde(default)]
    pub ports: Vec<String>,
    /// `KEY=VALUE` 形式
    #[serde(default)]
    pub environment: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub networks: Vec<String>,
}

impl NodeSpec {
    pub fn new(image: impl Into<String>, restart: RestartPolicy) -> Self {
        Self {
            image: image.into(),
            restart,
            command: None,
            ports: Vec::new(),
            environment: Vec::new(),
            depends_on: Vec::new(),
            networks: Vec::new(),
        }
    }

    /// 環境変数の値を取得
    pub fn env(&self, key: &str) -> Option<&str> {
        self.environment.iter().find_map(|entry| {
            entry
                .split_once('=')
                .filter(|(k, _)| *k == key)
                .map(|(_, v)| v)
        })
    }
}

/// ネットワーク定義
///
/// 必須属性がないことを示すマーカー。YAML では `{}` になる。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkSpec {}

/// compose の変数展開をエスケープする（`$` → `$$`）
///
/// ユーザー指定の値を `environment` や `command` に埋め込む前に通す。
pub fn escape_interpolation(value: &str) -> String {
    value.replace('$', "$$")
}

/// `name:version` 形式のイメージ参照を組み立てる
///
/// `image` に既にタグが含まれていればそのまま使用する。
pub fn image_reference(image: &str, version: &str) -> String {
    let has_tag = image
        .rsplit('/')
        .next()
        .is_some_and(|last| last.contains(':'));
    if has_tag || version.is_empty() {
        image.to_string()
    } else {
        format!("{}:{}", image, version)
    }
}
