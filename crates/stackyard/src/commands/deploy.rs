use crate::utils;
use colored::Colorize;
use stackyard_core::ServiceRecord;
use stackyard_runtime::DeploymentRuntime;

pub async fn handle(
    runtime: &DeploymentRuntime,
    record: &ServiceRecord,
    json: bool,
) -> anyhow::Result<()> {
    eprintln!(
        "🚀 {} をデプロイ中 ({})",
        record.id.cyan(),
        record.template
    );

    let cancel = utils::cancel_on_ctrl_c();
    let result = match runtime.deploy_with_cancel(record, &cancel).await {
        Ok(result) => result,
        Err(err) => {
            utils::print_failure_hint(&err, runtime.config(), &record.id);
            return Err(err.into());
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    eprintln!("{}", "✓ デプロイが完了しました".green());
    for (key, value) in &result {
        println!("{}: {}", key.bold(), value);
    }
    Ok(())
}
