use thiserror::Error;

#[derive(Error, Debug)]
pub enum TopologyError {
    #[error(
        "無効なノード数: {value}\nヒント: 1〜{max} の整数を指定してください（0 または未指定でデフォルト値）"
    )]
    InvalidNodeCount { value: String, max: u32 },

    #[error(
        "無効な再起動ポリシー: {0}\nヒント: no, always, on-failure, unless-stopped のいずれかを指定してください"
    )]
    InvalidRestartPolicy(String),

    #[error("サービス '{node}' が存在しないサービス '{target}' に依存しています")]
    DanglingDependency { node: String, target: String },

    #[error("サービス '{node}' が未定義のネットワーク '{network}' に参加しています")]
    UndeclaredNetwork { node: String, network: String },

    #[error("マニフェストのシリアライズに失敗しました: {0}")]
    Serialization(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, TopologyError>;
