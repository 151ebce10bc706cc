//! Stackyard deployment runtime
//!
//! Drives an external compose orchestrator through the lifecycle of one
//! service record: the manifest is generated by `stackyard-core`, persisted
//! under the configured storage path, then applied or torn down with
//! `docker-compose` (or `docker compose`).
//!
//! # Example
//!
//! ```ignore
//! use stackyard_config::RuntimeConfig;
//! use stackyard_core::ServiceRecord;
//! use stackyard_runtime::DeploymentRuntime;
//!
//! let runtime = DeploymentRuntime::local(RuntimeConfig::with_storage_path("/var/lib/stackyard"));
//! let record = ServiceRecord::new("cache1", "redis").with_config("password", "secret");
//!
//! let result = runtime.deploy(&record).await?;
//! println!("redis listening on port {}", result["port"]);
//! ```

pub mod compose;
pub mod error;
pub mod executor;
pub mod port;
pub mod runtime;
pub mod storage;

pub use compose::ComposeCommand;
pub use error::{DeployError, Result};
pub use executor::{ExecError, Invocation, ProcessExecutor, ProcessOutput, TokioExecutor};
pub use port::{PortParseError, parse_mapped_port};
pub use runtime::{DeploymentResult, DeploymentRuntime, NODE_ADDRESS_PLACEHOLDER, validate_service_id};
pub use storage::{FileStore, LocalFileStore};
pub use tokio_util::sync::CancellationToken;
