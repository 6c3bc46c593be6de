use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use seatek_cli::RunOutcome;
use seatek_ingest::format_numeric;
use seatek_model::CorrectionRecord;

pub fn print_summary(outcome: &RunOutcome) {
    println!("Input: {}", outcome.input.display());
    println!(
        "Outliers: {} ({} method), corrected: {}, skipped: {}",
        outcome.outliers.len(),
        outcome.method,
        outcome.corrections.len(),
        outcome.skipped.len()
    );
    println!("Summary: {}", outcome.summary_path.display());
    if let Some(path) = &outcome.plot_path {
        println!("Plot: {}", path.display());
    }
    if outcome.corrections.is_empty() {
        println!("No corrections applied.");
    } else {
        println!("{}", corrections_table(&outcome.corrections));
    }
    if !outcome.skipped.is_empty() {
        eprintln!("Skipped outliers:");
        for skipped in &outcome.skipped {
            eprintln!("- {}: {}", skipped.record.plot_label(), skipped.reason);
        }
    }
}

fn corrections_table(records: &[CorrectionRecord]) -> Table {
    let mut table = Table::new();
    table.set_header(
        CorrectionRecord::COLUMNS
            .iter()
            .map(|label| header_cell(label))
            .collect::<Vec<_>>(),
    );
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    for index in 1..=3 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for record in records {
        table.add_row(vec![
            Cell::new(&record.year_pair),
            Cell::new(record.sensor_id),
            Cell::new(format_numeric(record.original_difference)),
            offset_cell(record.offset_applied),
            Cell::new(record.corrected_file.display()),
        ]);
    }
    table
}

fn offset_cell(offset: f64) -> Cell {
    let color = if offset < 0.0 { Color::Red } else { Color::Green };
    Cell::new(format_numeric(offset)).fg(color)
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
