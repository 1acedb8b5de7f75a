use anyhow::{Context, Result};
use comfy_table::Table;
use tracing::info_span;

use ivw_cli::inspect::{WorkspaceSummary, summarize};
use ivw_cli::modules::builtin_registry;
use ivw_cli::upgrade::{UpgradeReport, upgrade_workspace};
use ivw_serialization::{Deserializer, SerializerOptions};

use crate::cli::{InspectArgs, ReportFormatArg, UpgradeArgs};
use crate::summary::{apply_table_style, print_upgrade_report, print_workspace_summary};

pub fn run_modules() -> Result<()> {
    let registry = builtin_registry();
    let mut table = Table::new();
    table.set_header(vec!["Module", "Current version"]);
    apply_table_style(&mut table);
    for (name, version) in registry.modules() {
        table.add_row(vec![name.to_string(), version.to_string()]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_inspect(args: &InspectArgs) -> Result<WorkspaceSummary> {
    let span = info_span!("inspect", path = %args.workspace.display());
    let _guard = span.enter();
    let deserializer = Deserializer::from_file(&args.workspace)
        .with_context(|| format!("load workspace {}", args.workspace.display()))?;
    let summary = summarize(&deserializer, &builtin_registry());
    match args.format {
        ReportFormatArg::Table => print_workspace_summary(&summary),
        ReportFormatArg::Json => {
            let json = serde_json::to_string_pretty(&summary).context("encode summary")?;
            println!("{json}");
        }
    }
    Ok(summary)
}

pub fn run_upgrade(args: &UpgradeArgs) -> Result<UpgradeReport> {
    let span = info_span!("upgrade", path = %args.workspace.display());
    let _guard = span.enter();
    let options = SerializerOptions::default().with_indent(args.indent);
    let report = upgrade_workspace(
        &args.workspace,
        args.output.as_deref(),
        args.dry_run,
        &builtin_registry(),
        options,
    )
    .with_context(|| format!("upgrade workspace {}", args.workspace.display()))?;
    print_upgrade_report(&report);
    Ok(report)
}
