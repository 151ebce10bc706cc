//! トポロジジェネレータ
//!
//! サービスファミリーごとに、論理リクエストから compose マニフェストを生成する。
//! ジェネレータは純粋関数で失敗しない。入力の検証はリクエスト構築時に行う。

mod cassandra;
mod redis;

pub use cassandra::*;
pub use redis::*;

use crate::error::{Result, TopologyError};
use crate::model::{Manifest, ServiceRecord, Template};

/// クラスタのノード数上限
pub const MAX_CLUSTER_NODES: u32 = 16;

/// クラスタのデフォルトノード数
pub const CLUSTER_DEFAULT_NODES: u32 = 3;

/// 検証済みのクラスタノード数（1..=MAX_CLUSTER_NODES）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeCount(u32);

impl NodeCount {
    /// 0 はデフォルト値として扱う
    pub fn new(count: u32) -> Result<Self> {
        match count {
            0 => Ok(Self::default()),
            n if n <= MAX_CLUSTER_NODES => Ok(Self(n)),
            n => Err(invalid_node_count(n.to_string())),
        }
    }

    /// 設定値からパース（空文字はデフォルト）
    pub fn parse(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Ok(Self::default());
        }

        let count: i64 = trimmed
            .parse()
            .map_err(|_| invalid_node_count(trimmed.to_string()))?;
        let count = u32::try_from(count).map_err(|_| invalid_node_count(trimmed.to_string()))?;
        Self::new(count)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for NodeCount {
    fn default() -> Self {
        Self(CLUSTER_DEFAULT_NODES)
    }
}

fn invalid_node_count(value: String) -> TopologyError {
    TopologyError::InvalidNodeCount {
        value,
        max: MAX_CLUSTER_NODES,
    }
}

/// ファミリーごとの型付きリクエスト
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopologyRequest {
    Redis(RedisRequest),
    Cassandra(CassandraRequest),
}

impl TopologyRequest {
    /// サービスレコードからリクエストを構築
    ///
    /// ノード名・ネットワーク名にはレコードIDを使う。
    pub fn from_record(template: Template, record: &ServiceRecord) -> Result<Self> {
        match template {
            Template::Redis => Ok(Self::Redis(RedisRequest::from_record(record)?)),
            Template::Cassandra => Ok(Self::Cassandra(CassandraRequest::from_record(record)?)),
        }
    }

    pub fn template(&self) -> Template {
        match self {
            Self::Redis(_) => Template::Redis,
            Self::Cassandra(_) => Template::Cassandra,
        }
    }

    /// マニフェストを生成
    pub fn generate(&self) -> Manifest {
        match self {
            Self::Redis(req) => generate_redis(req),
            Self::Cassandra(req) => generate_cassandra(req),
        }
    }

    /// ポート問い合わせの対象（サービス名, 内部ポート）
    ///
    /// クラスタの場合はシードノード。
    pub fn port_target(&self) -> (String, &'static str) {
        match self {
            Self::Redis(req) => (req.name.clone(), REDIS_PORT),
            Self::Cassandra(req) => (cassandra_node_name(&req.name, 1), CASSANDRA_PORT),
        }
    }

    /// デプロイ結果に追加する派生値
    pub fn derived_values(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::Redis(req) => vec![("password", req.password.clone())],
            Self::Cassandra(req) => vec![
                ("nodes", req.nodes.get().to_string()),
                ("seed", cassandra_node_name(&req.name, 1)),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_count_zero_uses_default() {
        assert_eq!(NodeCount::new(0).unwrap().get(), CLUSTER_DEFAULT_NODES);
        assert_eq!(NodeCount::parse("").unwrap().get(), CLUSTER_DEFAULT_NODES);
        assert_eq!(NodeCount::parse("0").unwrap().get(), CLUSTER_DEFAULT_NODES);
    }

    #[test]
    fn test_node_count_bounds() {
        assert_eq!(NodeCount::new(1).unwrap().get(), 1);
        assert_eq!(NodeCount::new(MAX_CLUSTER_NODES).unwrap().get(), MAX_CLUSTER_NODES);
        assert!(NodeCount::new(MAX_CLUSTER_NODES + 1).is_err());
    }

    #[test]
    fn test_node_count_rejects_negative_and_garbage() {
        for value in ["-1", "abc", "3.5", "99999999999"] {
            match NodeCount::parse(value) {
                Err(TopologyError::InvalidNodeCount { value: v, max }) => {
                    assert_eq!(v, value);
                    assert_eq!(max, MAX_CLUSTER_NODES);
                }
                other => panic!("Expected InvalidNodeCount for {}, got {:?}", value, other),
            }
        }
    }

    #[test]
    fn test_request_dispatch_by_template() {
        let record = ServiceRecord::new("db", "cassandra").with_config("nodes", "2");
        let request = TopologyRequest::from_record(Template::Cassandra, &record).unwrap();

        assert_eq!(request.template(), Template::Cassandra);
        assert_eq!(request.generate().services.len(), 2);
        assert_eq!(request.port_target(), ("db1".to_string(), "9042"));
    }

    #[test]
    fn test_redis_derived_password_defaults_to_empty() {
        let record = ServiceRecord::new("cache1", "redis");
        let request = TopologyRequest::from_record(Template::Redis, &record).unwrap();

        assert_eq!(request.derived_values(), vec![("password", String::new())]);
        assert_eq!(request.port_target(), ("cache1".to_string(), "6379"));
    }
}
