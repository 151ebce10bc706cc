//! キャッシュサービス (Redis) ジェネレータ

use crate::error::Result;
use crate::model::{
    Manifest, NodeSpec, RestartPolicy, ServiceRecord, escape_interpolation, image_reference,
};

pub const REDIS_IMAGE: &str = "redis";
pub const REDIS_DEFAULT_VERSION: &str = "6.2-alpine";
pub const REDIS_PORT: &str = "6379";
pub const REDIS_RESTART_POLICY: RestartPolicy = RestartPolicy::UnlessStopped;

/// 単一ノードのキャッシュサービスのリクエスト
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedisRequest {
    /// サービス名（ノード名）
    pub name: String,
    /// イメージ名。タグを含む場合は `version` より優先
    pub image: String,
    pub version: String,
    pub restart: RestartPolicy,
    /// 空文字なら認証なし
    pub password: String,
}

impl RedisRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image: REDIS_IMAGE.to_string(),
            version: REDIS_DEFAULT_VERSION.to_string(),
            restart: REDIS_RESTART_POLICY,
            password: String::new(),
        }
    }

    /// 設定キー: `image`, `version`, `restartPolicy`, `password`
    pub fn from_record(record: &ServiceRecord) -> Result<Self> {
        Ok(Self {
            name: record.id.clone(),
            image: record.config_or("image", REDIS_IMAGE),
            version: record.config_or("version", REDIS_DEFAULT_VERSION),
            restart: RestartPolicy::from_config(record.config("restartPolicy"), REDIS_RESTART_POLICY)?,
            password: record.config_or("password", ""),
        })
    }
}

/// キャッシュサービスのマニフェストを生成
pub fn generate_redis(req: &RedisRequest) -> Manifest {
    let image = if req.image.trim().is_empty() {
        REDIS_IMAGE
    } else {
        req.image.as_str()
    };
    let version = if req.version.trim().is_empty() {
        REDIS_DEFAULT_VERSION
    } else {
        req.version.as_str()
    };

    let mut node = NodeSpec::new(image_reference(image, version), req.restart);
    node.ports.push(REDIS_PORT.to_string());
    if !req.password.is_empty() {
        node.command = Some(vec![
            "redis-server".to_string(),
            "--requirepass".to_string(),
            escape_interpolation(&req.password),
        ]);
    }

    Manifest::new().with_service(req.name.clone(), node)
}
