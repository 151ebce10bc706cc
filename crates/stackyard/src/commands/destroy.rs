use crate::utils;
use colored::Colorize;
use stackyard_core::ServiceRecord;
use stackyard_runtime::DeploymentRuntime;

pub async fn handle(runtime: &DeploymentRuntime, record: &ServiceRecord) -> anyhow::Result<()> {
    eprintln!("🗑  {} を削除中 ({})", record.id.cyan(), record.template);

    let cancel = utils::cancel_on_ctrl_c();
    if let Err(err) = runtime.destroy_with_cancel(record, &cancel).await {
        utils::print_failure_hint(&err, runtime.config(), &record.id);
        return Err(err.into());
    }

    eprintln!("{}", "✓ 削除しました".green());
    Ok(())
}
