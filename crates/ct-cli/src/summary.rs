use std::cmp::Ordering;
use std::path::PathBuf;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use ct_model::{Finding, FindingKind, Severity};

use crate::types::GenerateResult;

pub fn print_summary(result: &GenerateResult) {
    println!("Thesaurus: {}", result.thesaurus.display());
    println!("Output: {}", result.output_dir.display());
    if let Some(path) = &result.findings_json {
        println!("Findings report: {}", path.display());
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Root"),
        header_cell("Codelists"),
        header_cell("Elements"),
        header_cell("Text"),
        header_cell("Workbook"),
        header_cell("Warnings"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Center);
    align_column(&mut table, 4, CellAlignment::Center);
    align_column(&mut table, 5, CellAlignment::Right);
    let mut total_codelists = 0usize;
    let mut total_elements = 0usize;
    let mut total_warnings = 0usize;
    for root in &result.roots {
        let warnings = root.findings.warning_count();
        total_codelists += root.codelist_count;
        total_elements += root.element_count;
        total_warnings += warnings;
        table.add_row(vec![
            root_cell(&root.root),
            Cell::new(root.codelist_count),
            Cell::new(root.element_count),
            output_cell(Some(&root.text_path)),
            output_cell(root.workbook_path.as_ref()),
            count_cell(warnings, Color::Yellow),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(total_codelists).add_attribute(Attribute::Bold),
        Cell::new(total_elements).add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        count_cell(total_warnings, Color::Yellow).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
    print_findings_table(result);
}

fn print_findings_table(result: &GenerateResult) {
    let mut findings: Vec<(&str, &Finding)> = Vec::new();
    for root in &result.roots {
        for finding in &root.findings.findings {
            findings.push((root.root.as_str(), finding));
        }
    }
    if findings.is_empty() {
        return;
    }
    findings.sort_by(|a, b| {
        let severity = severity_rank(b.1.severity).cmp(&severity_rank(a.1.severity));
        if severity != Ordering::Equal {
            return severity;
        }
        let root = a.0.cmp(b.0);
        if root != Ordering::Equal {
            return root;
        }
        let codelist = a.1.codelist.cmp(&b.1.codelist);
        if codelist != Ordering::Equal {
            return codelist;
        }
        kind_label(a.1.kind).cmp(kind_label(b.1.kind))
    });
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Root"),
        header_cell("Severity"),
        header_cell("Kind"),
        header_cell("Codelist"),
        header_cell("Concept"),
        header_cell("Message"),
    ]);
    apply_findings_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Center);
    align_column(&mut table, 3, CellAlignment::Center);
    for (root, finding) in findings {
        table.add_row(vec![
            root_cell(root),
            severity_cell(finding.severity),
            Cell::new(kind_label(finding.kind)),
            Cell::new(finding.codelist.clone().unwrap_or_else(|| "-".to_string())),
            Cell::new(finding.concept.clone().unwrap_or_else(|| "-".to_string())),
            Cell::new(finding.message.clone()),
        ]);
    }
    println!();
    println!("Findings:");
    println!("{table}");
}

fn output_cell(path: Option<&PathBuf>) -> Cell {
    match path {
        Some(_) => Cell::new("✓")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
        None => dim_cell("-"),
    }
}

fn count_cell(value: usize, color: Color) -> Cell {
    if value > 0 {
        Cell::new(value).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(value)
    }
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
        .set_width(120);
    if table.column_count() >= 6 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Fixed(36)),
            ColumnConstraint::LowerBoundary(Width::Fixed(11)),
            ColumnConstraint::LowerBoundary(Width::Fixed(10)),
            ColumnConstraint::LowerBoundary(Width::Fixed(6)),
            ColumnConstraint::LowerBoundary(Width::Fixed(10)),
            ColumnConstraint::LowerBoundary(Width::Fixed(10)),
        ]);
    }
}

fn apply_findings_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(180);
    if table.column_count() >= 6 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Fixed(36)),
            ColumnConstraint::UpperBoundary(Width::Fixed(9)),
            ColumnConstraint::UpperBoundary(Width::Fixed(28)),
            ColumnConstraint::UpperBoundary(Width::Fixed(10)),
            ColumnConstraint::UpperBoundary(Width::Fixed(34)),
            ColumnConstraint::UpperBoundary(Width::Percentage(40)),
        ]);
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn severity_cell(severity: Severity) -> Cell {
    match severity {
        Severity::Error => Cell::new("ERROR").fg(Color::Red),
        Severity::Warning => Cell::new("WARN").fg(Color::Yellow),
    }
}

fn severity_rank(severity: Severity) -> u8 {
    match severity {
        Severity::Error => 2,
        Severity::Warning => 1,
    }
}

fn kind_label(kind: FindingKind) -> &'static str {
    match kind {
        FindingKind::SubmissionValueTooLong => "submission value too long",
        FindingKind::ExtensibilityMissing => "extensibility missing",
        FindingKind::ExtensibilityConflict => "extensibility conflict",
        FindingKind::DefinitionMissing => "definition missing",
        FindingKind::DefinitionConflict => "definition conflict",
        FindingKind::CodelistNameMissing => "codelist name missing",
        FindingKind::CodelistNameCollision => "codelist name collision",
        FindingKind::SubmissionValueCollision => "submission value collision",
        FindingKind::SubmissionValueUnresolved => "submission value unresolved",
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn root_cell(root: &str) -> Cell {
    Cell::new(root)
        .fg(Color::Blue)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
