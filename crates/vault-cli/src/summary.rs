use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use vault_model::{ContentDiff, FieldChange, VersionMetadata, VersionNumber};

pub fn print_history(versions: &[VersionMetadata], current: Option<VersionNumber>) {
    if versions.is_empty() {
        println!("No saved versions.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Version"),
        header_cell("Saved"),
        header_cell("Description"),
        header_cell("Parent"),
        header_cell("Texts"),
        header_cell("Styles"),
        header_cell("Media"),
        header_cell("Colors"),
        header_cell("Checksum"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 4..=7 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for meta in versions {
        let version = if Some(meta.version) == current {
            Cell::new(format!("* {}", meta.version))
                .fg(Color::Green)
                .add_attribute(Attribute::Bold)
        } else {
            Cell::new(format!("  {}", meta.version))
        };
        table.add_row(vec![
            version,
            Cell::new(&meta.timestamp),
            Cell::new(&meta.description),
            meta.parent_version.map_or_else(|| dim_cell("-"), Cell::new),
            count_cell(meta.changes.texts),
            count_cell(meta.changes.styles),
            count_cell(meta.changes.media),
            count_cell(meta.changes.colors),
            dim_cell(&meta.checksum),
        ]);
    }
    println!("{table}");
}

pub fn print_diff(diff: &ContentDiff) {
    if diff.is_empty() {
        println!("No differences.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Id"),
        header_cell("Before"),
        header_cell("After"),
    ]);
    apply_table_style(&mut table);
    for (field, changes) in [
        ("texts", &diff.texts),
        ("images", &diff.images),
        ("colors", &diff.colors),
    ] {
        for change in changes {
            add_change_row(&mut table, field, change);
        }
    }
    println!("{table}");
}

/// One row per version: `(version, problem)` with `None` meaning it verified.
pub fn print_verification(results: &[(VersionNumber, Option<String>)]) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Version"), header_cell("Status")]);
    apply_table_style(&mut table);
    for (version, problem) in results {
        let status = match problem {
            None => Cell::new("ok").fg(Color::Green),
            Some(problem) => Cell::new(problem)
                .fg(Color::Red)
                .add_attribute(Attribute::Bold),
        };
        table.add_row(vec![Cell::new(version), status]);
    }
    println!("{table}");
}

fn add_change_row(table: &mut Table, field: &str, change: &FieldChange) {
    table.add_row(vec![
        Cell::new(field),
        Cell::new(&change.id),
        value_cell(change.before.as_deref(), Color::Red),
        value_cell(change.after.as_deref(), Color::Green),
    ]);
}

fn value_cell(value: Option<&str>, color: Color) -> Cell {
    match value {
        Some(value) => Cell::new(value).fg(color),
        None => dim_cell("(absent)"),
    }
}

fn count_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count).fg(Color::Yellow).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
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

fn apply_table_style(table: &mut Table) {
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
        .set_width(160);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}
