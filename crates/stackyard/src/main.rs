mod commands;
mod utils;

use clap::{Parser, Subcommand};
use std::collections::BTreeMap;

#[derive(Parser)]
#[command(name = "stackyard")]
#[command(about = "ステートフルなバックエンドサービスを docker compose でプロビジョニング", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// 対象サービスの指定（全コマンド共通）
#[derive(clap::Args, Debug, Clone)]
struct RecordArgs {
    /// サービスID（compose のプロジェクト名になる）
    #[arg(short, long)]
    id: String,
    /// テンプレート (redis, cassandra)
    #[arg(short, long)]
    template: String,
    /// 上書き設定 (例: -c password=secret -c nodes=3)
    #[arg(short = 'c', long = "config", value_parser = utils::parse_key_value)]
    configs: Vec<(String, String)>,
}

impl RecordArgs {
    fn into_record(self) -> stackyard_core::ServiceRecord {
        stackyard_core::ServiceRecord {
            id: self.id,
            template: self.template,
            configs: self.configs.into_iter().collect::<BTreeMap<_, _>>(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// サポートしているテンプレートの一覧を表示
    Templates,
    /// マニフェストを生成して標準出力に表示（副作用なし）
    Render {
        #[command(flatten)]
        record: RecordArgs,
    },
    /// サービスをデプロイ
    Deploy {
        #[command(flatten)]
        record: RecordArgs,
        /// 結果を JSON で出力
        #[arg(long)]
        json: bool,
    },
    /// サービスを削除（コンテナ・ボリュームごと）
    Destroy {
        #[command(flatten)]
        record: RecordArgs,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // ログは stderr に出力（stdout はマニフェストや結果の出力に使う）
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    // コマンドディスパッチ（Templates 以外は設定ファイルを読み込む）
    match cli.command {
        Commands::Templates => {
            commands::templates::handle();
        }
        Commands::Render { record } => {
            commands::render::handle(&load_runtime()?, &record.into_record())?;
        }
        Commands::Deploy { record, json } => {
            commands::deploy::handle(&load_runtime()?, &record.into_record(), json).await?;
        }
        Commands::Destroy { record } => {
            commands::destroy::handle(&load_runtime()?, &record.into_record()).await?;
        }
    }

    Ok(())
}

fn load_runtime() -> anyhow::Result<stackyard_runtime::DeploymentRuntime> {
    let config = stackyard_config::load_config()?;
    tracing::debug!(
        storage = %config.storage_path.display(),
        mode = %config.mode,
        "Configuration loaded"
    );
    Ok(stackyard_runtime::DeploymentRuntime::local(config))
}
