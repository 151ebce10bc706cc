use colored::Colorize;
use stackyard_config::RuntimeConfig;
use stackyard_runtime::{CancellationToken, DeployError};

/// `KEY=VALUE` 形式の引数をパース
pub fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("KEY=VALUE 形式で指定してください: '{}'", s))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("キーが空です: '{}'", s));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Ctrl-C で実行中のオーケストレータ呼び出しをキャンセルするトークン
pub fn cancel_on_ctrl_c() -> CancellationToken {
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("{}", "中断しています...".yellow());
            trigger.cancel();
        }
    });
    cancel
}

/// オーケストレータ側の状態を確認するコマンド
pub fn status_command(config: &RuntimeConfig, id: &str) -> String {
    let mut parts = config.compose_command.clone();
    parts.extend([
        "-f".to_string(),
        config.manifest_path(id).display().to_string(),
        "-p".to_string(),
        id.to_string(),
        "ps".to_string(),
    ]);
    parts.join(" ")
}

/// エラー時のヒントを表示
pub fn print_failure_hint(err: &DeployError, config: &RuntimeConfig, id: &str) {
    if err.touched_orchestrator() {
        eprintln!(
            "{} オーケストレータ側に途中までの状態が残っている可能性があります",
            "⚠".yellow()
        );
        eprintln!(
            "  マニフェスト: {}",
            config.manifest_path(id).display().to_string().cyan()
        );
        eprintln!("  確認: {}", status_command(config, id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_value() {
        assert_eq!(
            parse_key_value("password=secret").unwrap(),
            ("password".to_string(), "secret".to_string())
        );
        // 値に = を含められる
        assert_eq!(
            parse_key_value("password=a=b").unwrap(),
            ("password".to_string(), "a=b".to_string())
        );
        assert_eq!(
            parse_key_value("version=").unwrap(),
            ("version".to_string(), String::new())
        );
    }

    #[test]
    fn test_status_command_uses_configured_compose() {
        let config = RuntimeConfig {
            compose_command: vec!["docker".to_string(), "compose".to_string()],
            ..RuntimeConfig::with_storage_path("/srv/stackyard")
        };
        assert_eq!(
            status_command(&config, "cache1"),
            "docker compose -f /srv/stackyard/cache1.yml -p cache1 ps"
        );

        let config = RuntimeConfig::with_storage_path("/srv/stackyard");
        assert_eq!(
            status_command(&config, "db"),
            "docker-compose -f /srv/stackyard/db.yml -p db ps"
        );
    }

    #[test]
    fn test_parse_key_value_rejects_malformed() {
        assert!(parse_key_value("password").is_err());
        assert!(parse_key_value("=secret").is_err());
    }
}
