//! Compose command construction

use crate::executor::Invocation;
use stackyard_config::RuntimeConfig;
use std::path::{Path, PathBuf};
use std::time::Duration;

const FALLBACK_PROGRAM: &str = "docker-compose";

/// Builds compose invocations scoped to one manifest and project namespace
#[derive(Debug, Clone)]
pub struct ComposeCommand {
    program: String,
    prefix_args: Vec<String>,
    manifest: PathBuf,
    project: String,
    timeout: Duration,
}

impl ComposeCommand {
    pub fn new(config: &RuntimeConfig, manifest: impl AsRef<Path>, project: impl Into<String>) -> Self {
        let (program, prefix_args) = match config.compose_command.split_first() {
            Some((program, rest)) => (program.clone(), rest.to_vec()),
            None => (FALLBACK_PROGRAM.to_string(), Vec::new()),
        };

        Self {
            program,
            prefix_args,
            manifest: manifest.as_ref().to_path_buf(),
            project: project.into(),
            timeout: config.command_timeout(),
        }
    }

    fn invocation(&self, tail: &[&str]) -> Invocation {
        Invocation::new(&self.program, self.timeout)
            .args(self.prefix_args.iter().cloned())
            .arg("-f")
            .arg(self.manifest.to_string_lossy())
            .arg("-p")
            .arg(&self.project)
            .args(tail.iter().copied())
    }

    /// `up -d --force-recreate`
    pub fn up(&self) -> Invocation {
        self.invocation(&["up", "-d", "--force-recreate"])
    }

    /// `down -v --remove-orphans`
    pub fn down(&self) -> Invocation {
        self.invocation(&["down", "-v", "--remove-orphans"])
    }

    /// `port <service> <internal port>`
    pub fn port(&self, service: &str, internal_port: &str) -> Invocation {
        self.invocation(&["port", service, internal_port])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> RuntimeConfig {
        RuntimeConfig::with_storage_path("/srv/stackyard")
    }

    #[test]
    fn test_up_arguments() {
        let cfg = config();
        let compose = ComposeCommand::new(&cfg, cfg.manifest_path("cache1"), "cache1");
        let up = compose.up();

        assert_eq!(up.program, "docker-compose");
        assert_eq!(
            up.args,
            vec![
                "-f",
                "/srv/stackyard/cache1.yml",
                "-p",
                "cache1",
                "up",
                "-d",
                "--force-recreate"
            ]
        );
        assert_eq!(up.timeout, Duration::from_secs(300));
    }

    #[test]
    fn test_down_and_port_arguments() {
        let cfg = config();
        let compose = ComposeCommand::new(&cfg, cfg.manifest_path("db"), "db");

        assert_eq!(
            compose.down().to_string(),
            "docker-compose -f /srv/stackyard/db.yml -p db down -v --remove-orphans"
        );
        assert_eq!(
            compose.port("db1", "9042").to_string(),
            "docker-compose -f /srv/stackyard/db.yml -p db port db1 9042"
        );
    }

    #[test]
    fn test_compose_plugin_prefix() {
        let cfg = RuntimeConfig {
            compose_command: vec!["docker".to_string(), "compose".to_string()],
            ..config()
        };
        let up = ComposeCommand::new(&cfg, "/tmp/x.yml", "x").up();

        assert_eq!(up.program, "docker");
        assert_eq!(up.args[0], "compose");
        assert_eq!(up.args[1], "-f");
    }

    #[test]
    fn test_empty_command_falls_back() {
        let cfg = RuntimeConfig {
            compose_command: vec![],
            ..config()
        };
        assert_eq!(ComposeCommand::new(&cfg, "/tmp/x.yml", "x").up().program, "docker-compose");
    }
}
