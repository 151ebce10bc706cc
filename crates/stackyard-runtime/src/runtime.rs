//! Deployment runtime
//!
//! Each operation is re-derived from the service record alone: the same
//! record yields the same manifest and the same orchestrator commands.
//! Operations on different ids never contend, since both the manifest path
//! and the compose project namespace derive from the id. Callers must
//! serialize operations on the same id themselves.

use crate::compose::ComposeCommand;
use crate::error::{DeployError, Result};
use crate::executor::{ExecError, Invocation, ProcessExecutor, ProcessOutput, TokioExecutor};
use crate::port::parse_mapped_port;
use crate::storage::{FileStore, LocalFileStore};
use stackyard_config::RuntimeConfig;
use stackyard_core::{ServiceRecord, Template, TopologyRequest};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Key/value result handed back to the caller after a deploy
pub type DeploymentResult = BTreeMap<String, String>;

/// Placeholder the caller replaces with the node's reachable address
pub const NODE_ADDRESS_PLACEHOLDER: &str = "[NodeIp]";

const MAX_SERVICE_ID_LEN: usize = 63;

/// Check that an id is usable as a file name and compose project name
pub fn validate_service_id(id: &str) -> Result<()> {
    let mut chars = id.chars();
    let valid_first = chars
        .next()
        .is_some_and(|c| c.is_ascii_lowercase() || c.is_ascii_digit());
    let valid_rest =
        chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');

    if valid_first && valid_rest && id.len() <= MAX_SERVICE_ID_LEN {
        Ok(())
    } else {
        Err(DeployError::InvalidServiceId(id.to_string()))
    }
}

/// Manifest derived from a record, ready to persist
struct Prepared {
    request: TopologyRequest,
    yaml: String,
}

/// Generates, persists and applies manifests through an external orchestrator
pub struct DeploymentRuntime {
    config: RuntimeConfig,
    executor: Arc<dyn ProcessExecutor>,
    store: Arc<dyn FileStore>,
}

impl DeploymentRuntime {
    pub fn new(
        config: RuntimeConfig,
        executor: Arc<dyn ProcessExecutor>,
        store: Arc<dyn FileStore>,
    ) -> Self {
        Self {
            config,
            executor,
            store,
        }
    }

    /// Runtime using local processes and the local filesystem
    pub fn local(config: RuntimeConfig) -> Self {
        Self::new(config, Arc::new(TokioExecutor), Arc::new(LocalFileStore))
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Generate the manifest for a record without any side effect
    pub fn render(&self, record: &ServiceRecord) -> Result<String> {
        let template = Template::parse(&record.template)
            .ok_or_else(|| DeployError::UnsupportedTemplate(record.template.clone()))?;
        Ok(self.prepare(template, record)?.yaml)
    }

    pub async fn deploy(&self, record: &ServiceRecord) -> Result<DeploymentResult> {
        self.deploy_with_cancel(record, &CancellationToken::new())
            .await
    }

    /// Deploy a record, returning its connection parameters
    ///
    /// Fails with `UnsupportedTemplate` before any side effect when the
    /// template is unknown. The persisted manifest is left in place when a
    /// later step fails, and nothing is rolled back on the orchestrator.
    pub async fn deploy_with_cancel(
        &self,
        record: &ServiceRecord,
        cancel: &CancellationToken,
    ) -> Result<DeploymentResult> {
        let template = Template::parse(&record.template)
            .ok_or_else(|| DeployError::UnsupportedTemplate(record.template.clone()))?;
        let prepared = self.prepare(template, record)?;

        let mut result: DeploymentResult = record.configs.clone();
        result.insert("address".to_string(), NODE_ADDRESS_PLACEHOLDER.to_string());
        for (key, value) in prepared.request.derived_values() {
            result.insert(key.to_string(), value);
        }

        let manifest_path = self.persist_manifest(&record.id, &prepared.yaml).await?;
        let compose = ComposeCommand::new(&self.config, &manifest_path, &record.id);

        let output = self.run(&compose.up(), &record.id, cancel).await?;
        self.capture_diagnostics(&record.id, &output).await;

        let (service, internal_port) = prepared.request.port_target();
        let port = self
            .resolve_port(&compose, &record.id, &service, internal_port, cancel)
            .await?;
        result.insert("port".to_string(), port.to_string());

        tracing::info!(
            id = %record.id,
            template = %prepared.request.template(),
            port,
            "Service deployed"
        );
        Ok(result)
    }

    pub async fn destroy(&self, record: &ServiceRecord) -> Result<()> {
        self.destroy_with_cancel(record, &CancellationToken::new())
            .await
    }

    /// Tear down a record's containers, volumes and orphans
    ///
    /// Unlike `deploy`, an unknown template is a silent no-op: destroying a
    /// service this runtime never knew about succeeds without side effects.
    pub async fn destroy_with_cancel(
        &self,
        record: &ServiceRecord,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let Some(template) = Template::parse(&record.template) else {
            tracing::debug!(
                id = %record.id,
                template = %record.template,
                "Unknown template, nothing to destroy"
            );
            return Ok(());
        };
        let prepared = self.prepare(template, record)?;

        let manifest_path = self.persist_manifest(&record.id, &prepared.yaml).await?;
        let compose = ComposeCommand::new(&self.config, &manifest_path, &record.id);

        let output = self.run(&compose.down(), &record.id, cancel).await?;
        self.capture_diagnostics(&record.id, &output).await;

        tracing::info!(
            id = %record.id,
            template = %prepared.request.template(),
            "Service destroyed"
        );
        Ok(())
    }

    fn prepare(&self, template: Template, record: &ServiceRecord) -> Result<Prepared> {
        validate_service_id(&record.id)?;

        let request = TopologyRequest::from_record(template, record)?;
        let yaml = request.generate().to_yaml()?;

        Ok(Prepared { request, yaml })
    }

    async fn persist_manifest(&self, id: &str, yaml: &str) -> Result<PathBuf> {
        let path = self.config.manifest_path(id);
        self.store
            .store_file(&path, yaml)
            .await
            .map_err(|source| DeployError::Storage {
                path: path.clone(),
                source,
            })?;

        tracing::debug!("Stored manifest: {}", path.display());
        Ok(path)
    }

    /// Execute an invocation and require a successful exit
    async fn run(
        &self,
        invocation: &Invocation,
        project: &str,
        cancel: &CancellationToken,
    ) -> Result<ProcessOutput> {
        let output = self.exec(invocation, project, cancel).await?;

        if !output.success {
            return Err(DeployError::Execution {
                command: invocation.to_string(),
                stderr: output.stderr,
            });
        }
        Ok(output)
    }

    async fn exec(
        &self,
        invocation: &Invocation,
        project: &str,
        cancel: &CancellationToken,
    ) -> Result<ProcessOutput> {
        tracing::info!(command = %invocation, project, "Run orchestrator command");

        self.executor
            .exec(invocation, cancel)
            .await
            .map_err(|err| {
                let command = invocation.to_string();
                match err {
                    ExecError::Timeout(timeout) => DeployError::Timeout { command, timeout },
                    ExecError::Cancelled => DeployError::Cancelled { command },
                    ExecError::Spawn { source, .. } | ExecError::Wait(source) => {
                        DeployError::Spawn { command, source }
                    }
                }
            })
    }

    async fn resolve_port(
        &self,
        compose: &ComposeCommand,
        project: &str,
        service: &str,
        internal_port: &str,
        cancel: &CancellationToken,
    ) -> Result<u16> {
        let output = self
            .exec(&compose.port(service, internal_port), project, cancel)
            .await?;

        if !output.success {
            return Err(DeployError::PortResolution {
                service: service.to_string(),
                reason: output.stderr.trim().to_string(),
            });
        }

        parse_mapped_port(&output.stdout).map_err(|err| DeployError::PortResolution {
            service: service.to_string(),
            reason: err.to_string(),
        })
    }

    /// Store orchestrator output in dev mode
    ///
    /// Best effort: a failed write is logged and never fails the operation.
    async fn capture_diagnostics(&self, id: &str, output: &ProcessOutput) {
        if !self.config.captures_diagnostics() {
            return;
        }

        let logs = [
            (self.config.stdout_log_path(id), &output.stdout),
            (self.config.stderr_log_path(id), &output.stderr),
        ];
        for (path, content) in logs {
            if let Err(err) = self.store.store_file(&path, content).await {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "Failed to store diagnostic log"
                );
            }
        }
    }
}
