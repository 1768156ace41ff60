//! Spreadsheet conversion of a written delimited report.
//!
//! Reads the tab-delimited file back and emits a single-worksheet
//! SpreadsheetML workbook, the XML dialect Excel 2003 and later open
//! natively. Every cell is written as a string so codes like "01" keep
//! their leading zeros.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event};
use quick_xml::Writer;
use tracing::info;

const SPREADSHEET_NS: &str = "urn:schemas-microsoft-com:office:spreadsheet";

/// Excel caps worksheet names at 31 characters and rejects a handful of
/// punctuation characters.
const SHEET_NAME_MAX: usize = 31;

/// Converts the delimited report at `source` into a workbook at
/// `target`, with a single worksheet named `sheet_name` (sanitized).
pub fn convert_to_workbook(source: &Path, target: &Path, sheet_name: &str) -> Result<()> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_path(source)
        .with_context(|| format!("open {}", source.display()))?;

    let file = File::create(target).with_context(|| format!("create {}", target.display()))?;
    let mut xml = Writer::new_with_indent(BufWriter::new(file), b' ', 1);

    xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .context("write xml declaration")?;
    xml.write_event(Event::PI(BytesPI::new(
        "mso-application progid=\"Excel.Sheet\"",
    )))
    .context("write processing instruction")?;

    let mut workbook = BytesStart::new("Workbook");
    workbook.push_attribute(("xmlns", SPREADSHEET_NS));
    workbook.push_attribute(("xmlns:ss", SPREADSHEET_NS));
    xml.write_event(Event::Start(workbook))
        .context("write workbook")?;

    let name = worksheet_name(sheet_name);
    let mut worksheet = BytesStart::new("Worksheet");
    worksheet.push_attribute(("ss:Name", name.as_str()));
    xml.write_event(Event::Start(worksheet))
        .context("write worksheet")?;
    xml.write_event(Event::Start(BytesStart::new("Table")))
        .context("write table")?;

    let mut row_count = 0usize;
    for record in reader.records() {
        let record = record.with_context(|| format!("read {}", source.display()))?;
        xml.write_event(Event::Start(BytesStart::new("Row")))
            .context("write row")?;
        for cell in record.iter() {
            xml.write_event(Event::Start(BytesStart::new("Cell")))
                .context("write cell")?;
            let mut data = BytesStart::new("Data");
            data.push_attribute(("ss:Type", "String"));
            xml.write_event(Event::Start(data)).context("write data")?;
            xml.write_event(Event::Text(BytesText::new(cell)))
                .context("write text")?;
            xml.write_event(Event::End(BytesEnd::new("Data")))
                .context("write data")?;
            xml.write_event(Event::End(BytesEnd::new("Cell")))
                .context("write cell")?;
        }
        xml.write_event(Event::End(BytesEnd::new("Row")))
            .context("write row")?;
        row_count += 1;
    }

    xml.write_event(Event::End(BytesEnd::new("Table")))
        .context("write table")?;
    xml.write_event(Event::End(BytesEnd::new("Worksheet")))
        .context("write worksheet")?;
    xml.write_event(Event::End(BytesEnd::new("Workbook")))
        .context("write workbook")?;
    xml.into_inner()
        .flush()
        .with_context(|| format!("write {}", target.display()))?;

    info!(
        source = %source.display(),
        target = %target.display(),
        rows = row_count,
        "converted report to workbook"
    );
    Ok(())
}

fn worksheet_name(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .map(|c| match c {
            ':' | '\\' | '/' | '?' | '*' | '[' | ']' => ' ',
            other => other,
        })
        .collect();
    let trimmed = cleaned.trim();
    let name: String = trimmed.chars().take(SHEET_NAME_MAX).collect();
    if name.is_empty() {
        "Terminology".to_string()
    } else {
        name
    }
}
