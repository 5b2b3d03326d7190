use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use cndr_model::{StageReport, StageStatus};

use crate::commands::{Distribution, ProcessResult};

pub fn print_summary(result: &ProcessResult) {
    println!("Input: {}", result.input.display());
    match &result.output {
        Some(path) => println!("Output: {}", path.display()),
        None => println!("Output: (dry run, not written)"),
    }
    println!("Records: {}", result.rows);
    println!(
        "Columns written: {} ({} cells)",
        result.report.columns_written().count(),
        result.report.total_cells_changed()
    );
    println!("{}", stage_table(&result.report.stages));

    if !result.flag_counts.is_empty() {
        println!("{}", flag_table(&result.flag_counts, result.rows));
    }
    for (name, distribution) in [
        ("ADNC_severity", &result.adnc),
        ("LATE_stage", &result.late),
    ] {
        if let Some(distribution) = distribution {
            println!("{}", distribution_table(name, distribution));
        }
    }
}

pub fn stage_table(stages: &[StageReport]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Stage"),
        header_cell("Status"),
        header_cell("Columns"),
        header_cell("Cells"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for stage in stages {
        table.add_row(vec![
            Cell::new(stage.stage.as_str()).add_attribute(Attribute::Bold),
            status_cell(&stage.status),
            count_cell(stage.is_applied().then_some(stage.columns_written.len())),
            count_cell(stage.is_applied().then_some(stage.cells_changed)),
        ]);
    }
    table
}

pub fn flag_table(counts: &[(&str, usize)], rows: usize) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Flag"), header_cell("Records = 1")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (name, count) in counts {
        table.add_row(vec![
            Cell::new(name),
            count_cell(Some(*count)).add_attribute(Attribute::Bold),
        ]);
    }
    table.add_row(vec![dim_cell("of"), dim_cell(rows)]);
    table
}

pub fn distribution_table(name: &str, distribution: &Distribution) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell(name), header_cell("Records")]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 1, CellAlignment::Right);
    for (value, count) in &distribution.counts {
        table.add_row(vec![Cell::new(value), Cell::new(count)]);
    }
    table.add_row(vec![dim_cell("missing"), count_cell(Some(distribution.missing))]);
    table
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(100);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn status_cell(status: &StageStatus) -> Cell {
    match status {
        StageStatus::Applied => Cell::new("applied").fg(Color::Green),
        StageStatus::Skipped { reason } => Cell::new(format!("skipped: {reason}")).fg(Color::Yellow),
        StageStatus::Disabled => dim_cell("disabled"),
    }
}

fn count_cell(count: Option<usize>) -> Cell {
    match count {
        Some(value) if value > 0 => Cell::new(value),
        Some(value) => dim_cell(value),
        None => dim_cell("-"),
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
