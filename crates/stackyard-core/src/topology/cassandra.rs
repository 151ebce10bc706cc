//! クラスタデータベース (Cassandra) ジェネレータ
//!
//! ノード `{name}1` がシード。他のノードは全てシードを `CASSANDRA_SEEDS` に持ち、
//! シードに `depends_on` し、`{name}` ネットワークに参加する。

use super::NodeCount;
use crate::error::Result;
use crate::model::{
    Manifest, NodeSpec, RestartPolicy, ServiceRecord, escape_interpolation, image_reference,
};

pub const CASSANDRA_IMAGE: &str = "cassandra";
pub const CASSANDRA_DEFAULT_VERSION: &str = "4.0";
pub const CASSANDRA_PORT: &str = "9042";
pub const CASSANDRA_RESTART_POLICY: RestartPolicy = RestartPolicy::UnlessStopped;
pub const CASSANDRA_ENDPOINT_SNITCH: &str = "GossipingPropertyFileSnitch";
pub const CLUSTER_DEFAULT_DC: &str = "DC1";
pub const CLUSTER_DEFAULT_RACK: &str = "RAC1";

/// クラスタデータベースのリクエスト
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CassandraRequest {
    /// ノード名の接頭辞兼ネットワーク名
    pub name: String,
    pub version: String,
    pub nodes: NodeCount,
    pub datacenter: String,
    pub rack: String,
    pub restart: RestartPolicy,
}

impl CassandraRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: CASSANDRA_DEFAULT_VERSION.to_string(),
            nodes: NodeCount::default(),
            datacenter: CLUSTER_DEFAULT_DC.to_string(),
            rack: CLUSTER_DEFAULT_RACK.to_string(),
            restart: CASSANDRA_RESTART_POLICY,
        }
    }

    /// 設定キー: `version`, `nodes`, `datacenter`, `rack`, `restartPolicy`
    pub fn from_record(record: &ServiceRecord) -> Result<Self> {
        Ok(Self {
            name: record.id.clone(),
            version: record.config_or("version", CASSANDRA_DEFAULT_VERSION),
            nodes: NodeCount::parse(record.config("nodes").unwrap_or(""))?,
            datacenter: record.config_or("datacenter", CLUSTER_DEFAULT_DC),
            rack: record.config_or("rack", CLUSTER_DEFAULT_RACK),
            restart: RestartPolicy::from_config(
                record.config("restartPolicy"),
                CASSANDRA_RESTART_POLICY,
            )?,
        })
    }
}

/// クラスタ内のノード名 (`{name}{index}`、index は1始まり)
pub fn cassandra_node_name(name: &str, index: u32) -> String {
    format!("{}{}", name, index)
}

/// クラスタのマニフェストを生成
pub fn generate_cassandra(req: &CassandraRequest) -> Manifest {
    let version = or_default(&req.version, CASSANDRA_DEFAULT_VERSION);
    let datacenter = or_default(&req.datacenter, CLUSTER_DEFAULT_DC);
    let rack = or_default(&req.rack, CLUSTER_DEFAULT_RACK);
    let image = image_reference(CASSANDRA_IMAGE, version);
    let seed = cassandra_node_name(&req.name, 1);

    let mut manifest = Manifest::new();
    for index in 1..=req.nodes.get() {
        let mut node = NodeSpec::new(image.clone(), req.restart);
        node.ports.push(CASSANDRA_PORT.to_string());
        node.environment = vec![
            format!("CASSANDRA_SEEDS={}", seed),
            format!("CASSANDRA_ENDPOINT_SNITCH={}", CASSANDRA_ENDPOINT_SNITCH),
            format!("CASSANDRA_DC={}", escape_interpolation(datacenter)),
            format!("CASSANDRA_RACK={}", escape_interpolation(rack)),
        ];

        if index > 1 {
            node.depends_on.push(seed.clone());
            node.networks.push(req.name.clone());
        }

        manifest = manifest.with_service(cassandra_node_name(&req.name, index), node);
    }

    if req.nodes.get() > 1 {
        manifest = manifest.with_network(req.name.clone());
    }

    manifest
}

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.trim().is_empty() {
        default
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, nodes: u32) -> CassandraRequest {
        CassandraRequest {
            nodes: NodeCount::new(nodes).unwrap(),
            ..CassandraRequest::new(name)
        }
    }

    #[test]
    fn test_node_count_matches_request() {
        for n in 1..=5 {
            let manifest = generate_cassandra(&request("db", n));
            assert_eq!(manifest.services.len(), n as usize);
            manifest.validate().unwrap();
        }
    }

    #[test]
    fn test_seed_has_no_edges_and_peers_point_at_seed() {
        let manifest = generate_cassandra(&request("db", 4));

        let seed = &manifest.services["db1"];
        assert!(seed.depends_on.is_empty());
        assert!(seed.networks.is_empty());

        for peer in ["db2", "db3", "db4"] {
            let node = &manifest.services[peer];
            assert_eq!(node.depends_on, vec!["db1"]);
            assert_eq!(node.networks, vec!["db"]);
        }

        // 全ノードが同じシードを参照する
        for node in manifest.services.values() {
            assert_eq!(node.env("CASSANDRA_SEEDS"), Some("db1"));
        }
    }

    #[test]
    fn test_three_node_cluster_layout() {
        let manifest = generate_cassandra(&request("db", 3));

        let names: Vec<&str> = manifest.services.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["db1", "db2", "db3"]);
        assert!(manifest.networks.contains_key("db"));

        let yaml = manifest.to_yaml().unwrap();
        let value: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();
        assert!(value["services"]["db1"].get("depends_on").is_none());
        assert!(value["services"]["db1"].get("networks").is_none());
        assert_eq!(value["services"]["db3"]["depends_on"][0].as_str(), Some("db1"));
        assert_eq!(value["services"]["db3"]["networks"][0].as_str(), Some("db"));
    }

    #[test]
    fn test_single_node_cluster_declares_no_network() {
        let manifest = generate_cassandra(&request("solo", 1));

        assert_eq!(manifest.services.len(), 1);
        assert!(manifest.networks.is_empty());
        assert_eq!(manifest.services["solo1"].env("CASSANDRA_SEEDS"), Some("solo1"));
    }

    #[test]
    fn test_empty_inputs_use_defaults() {
        let req = CassandraRequest {
            name: "db".to_string(),
            version: String::new(),
            nodes: NodeCount::new(0).unwrap(),
            datacenter: String::new(),
            rack: " ".to_string(),
            restart: CASSANDRA_RESTART_POLICY,
        };

        let manifest = generate_cassandra(&req);
        assert_eq!(manifest.services.len(), 3);

        for node in manifest.services.values() {
            assert_eq!(node.image, "cassandra:4.0");
            assert_eq!(node.restart, RestartPolicy::UnlessStopped);
            assert_eq!(node.ports, vec!["9042"]);
            assert_eq!(node.env("CASSANDRA_DC"), Some("DC1"));
            assert_eq!(node.env("CASSANDRA_RACK"), Some("RAC1"));
            assert_eq!(
                node.env("CASSANDRA_ENDPOINT_SNITCH"),
                Some("GossipingPropertyFileSnitch")
            );
        }
    }

    #[test]
    fn test_placement_applies_to_every_node() {
        let record = ServiceRecord::new("ring", "cassandra")
            .with_config("nodes", "2")
            .with_config("datacenter", "eu-west")
            .with_config("rack", "r7")
            .with_config("version", "4.1");

        let manifest = generate_cassandra(&CassandraRequest::from_record(&record).unwrap());

        for node in manifest.services.values() {
            assert_eq!(node.image, "cassandra:4.1");
            assert_eq!(node.env("CASSANDRA_DC"), Some("eu-west"));
            assert_eq!(node.env("CASSANDRA_RACK"), Some("r7"));
        }
    }

    #[test]
    fn test_placement_values_escape_interpolation() {
        let record = ServiceRecord::new("ring", "cassandra")
            .with_config("nodes", "1")
            .with_config("datacenter", "${DC}")
            .with_config("rack", "r$1");

        let manifest = generate_cassandra(&CassandraRequest::from_record(&record).unwrap());
        let node = &manifest.services["ring1"];

        assert_eq!(node.env("CASSANDRA_DC"), Some("$${DC}"));
        assert_eq!(node.env("CASSANDRA_RACK"), Some("r$$1"));
    }

    #[test]
    fn test_generation_is_deterministic() {
        let req = request("db", 5);
        let first = generate_cassandra(&req).to_yaml().unwrap();
        let second = generate_cassandra(&req).to_yaml().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_from_record_rejects_invalid_node_count() {
        for nodes in ["-1", "17", "three"] {
            let record = ServiceRecord::new("db", "cassandra").with_config("nodes", nodes);
            assert!(CassandraRequest::from_record(&record).is_err(), "nodes={}", nodes);
        }
    }
}
