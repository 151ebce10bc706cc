use stackyard_core::ServiceRecord;
use stackyard_runtime::DeploymentRuntime;

pub fn handle(runtime: &DeploymentRuntime, record: &ServiceRecord) -> anyhow::Result<()> {
    let yaml = runtime.render(record)?;
    print!("{}", yaml);
    Ok(())
}
