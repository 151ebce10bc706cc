//! テンプレート（サービスファミリー）定義

use std::fmt;

/// サポートしているサービスファミリー
///
/// ファミリーを追加する場合はバリアントとジェネレータを1つずつ足す。
/// ディスパッチは全て網羅的な `match` で行うため、追加漏れはコンパイルエラーになる。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Template {
    /// 単一ノードのキャッシュサービス (Redis)
    Redis,
    /// シードノード方式のクラスタデータベース (Cassandra)
    Cassandra,
}

impl Template {
    pub const ALL: [Template; 2] = [Template::Redis, Template::Cassandra];

    /// レコードに保存されたテンプレート識別子からパース
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "redis" => Some(Self::Redis),
            "cassandra" => Some(Self::Cassandra),
            _ => None,
        }
    }

    /// テンプレート識別子
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Redis => "redis",
            Self::Cassandra => "cassandra",
        }
    }

    /// 表示用の説明
    pub fn description(&self) -> &'static str {
        match self {
            Self::Redis => "single-node cache service",
            Self::Cassandra => "seed-based multi-node database cluster",
        }
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
