use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use ivw_cli::inspect::{ModuleStatus, WorkspaceSummary};
use ivw_cli::upgrade::UpgradeReport;

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

pub fn print_workspace_summary(summary: &WorkspaceSummary) {
    if let Some(path) = &summary.path {
        println!("Workspace: {}", path.display());
    }
    println!(
        "Root: {} (format version {}, {} nodes)",
        summary.root, summary.workspace_version, summary.node_count
    );

    let mut modules = Table::new();
    modules.set_header(vec![
        header_cell("Module"),
        header_cell("Saved"),
        header_cell("Current"),
        header_cell("Status"),
    ]);
    apply_table_style(&mut modules);
    align_column(&mut modules, 1, CellAlignment::Right);
    align_column(&mut modules, 2, CellAlignment::Right);
    for module in &summary.modules {
        modules.add_row(vec![
            Cell::new(&module.name),
            Cell::new(module.persisted_version),
            module
                .current_version
                .map_or_else(|| dim_cell("-"), Cell::new),
            status_cell(module),
        ]);
    }
    println!("{modules}");

    if summary.properties.is_empty() {
        return;
    }
    let mut properties = Table::new();
    properties.set_header(vec![
        header_cell("Owner"),
        header_cell("Property"),
        header_cell("Type"),
        header_cell("Value"),
    ]);
    apply_table_style(&mut properties);
    for property in &summary.properties {
        properties.add_row(vec![
            Cell::new(&property.owner),
            Cell::new(&property.identifier),
            dim_cell(&property.class_identifier),
            property
                .value
                .as_deref()
                .map_or_else(|| dim_cell("-"), Cell::new),
        ]);
    }
    println!("{properties}");
}

pub fn print_upgrade_report(report: &UpgradeReport) {
    println!("Workspace: {}", report.input.display());
    if report.upgrades.is_empty() {
        println!("Already up to date.");
    } else {
        print_upgrade_table(report);
    }
    if let Some(outcome) = report.outcome() {
        println!("{outcome}");
    }
}

fn print_upgrade_table(report: &UpgradeReport) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Module"),
        header_cell("From"),
        header_cell("To"),
        header_cell("Changed"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Center);
    for upgrade in &report.upgrades {
        table.add_row(vec![
            Cell::new(&upgrade.module),
            Cell::new(upgrade.from_version),
            Cell::new(upgrade.to_version),
            if upgrade.changed {
                Cell::new("yes").fg(Color::Green)
            } else {
                dim_cell("no")
            },
        ]);
    }
    println!("{table}");
}

fn status_cell(module: &ModuleStatus) -> Cell {
    match module.current_version {
        None => dim_cell("unknown"),
        Some(_) if module.needs_upgrade => Cell::new("upgrade")
            .fg(Color::Yellow)
            .add_attribute(Attribute::Bold),
        Some(_) => Cell::new("current").fg(Color::Green),
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
