//! OOXML workbook assembly.
//!
//! Builds the minimal part set of an .xlsx by hand — content types, the
//! two relationship parts, workbook, styles, and one worksheet — and packs
//! them with [`crate::zip::ZipBuilder`]. The worksheet is: a title row
//! merged across all columns, a weekday header row, a day-number header
//! row, then one row per schedule row with its label and each date's raw
//! cell text as inline strings.

use chrono::{Datelike, NaiveDateTime};

use shiftgrid_engine::schedule::Schedule;

use crate::zip::ZipBuilder;

const XML_DECL: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n";

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Header rows above the data: title, weekday, day number.
const HEADER_ROWS: usize = 3;

/// Assemble the complete .xlsx archive for a schedule snapshot.
pub fn workbook_archive(schedule: &Schedule, modified: NaiveDateTime) -> Vec<u8> {
    let mut builder = ZipBuilder::new(modified);
    builder.add("[Content_Types].xml", content_types_xml().as_bytes());
    builder.add("_rels/.rels", root_rels_xml().as_bytes());
    builder.add("xl/workbook.xml", workbook_xml(&schedule.title).as_bytes());
    builder.add("xl/_rels/workbook.xml.rels", workbook_rels_xml().as_bytes());
    builder.add("xl/styles.xml", styles_xml().as_bytes());
    builder.add("xl/worksheets/sheet1.xml", sheet_xml(schedule).as_bytes());
    builder.finish()
}

pub(crate) fn content_types_xml() -> String {
    let mut xml = String::from(XML_DECL);
    xml.push_str("<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">");
    xml.push_str("<Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>");
    xml.push_str("<Default Extension=\"xml\" ContentType=\"application/xml\"/>");
    xml.push_str("<Override PartName=\"/xl/workbook.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml\"/>");
    xml.push_str("<Override PartName=\"/xl/worksheets/sheet1.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml\"/>");
    xml.push_str("<Override PartName=\"/xl/styles.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml\"/>");
    xml.push_str("</Types>");
    xml
}

pub(crate) fn root_rels_xml() -> String {
    let mut xml = String::from(XML_DECL);
    xml.push_str(
        "<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">",
    );
    xml.push_str("<Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument\" Target=\"xl/workbook.xml\"/>");
    xml.push_str("</Relationships>");
    xml
}

pub(crate) fn workbook_xml(title: &str) -> String {
    let mut xml = String::from(XML_DECL);
    xml.push_str("<workbook xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\" xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\">");
    xml.push_str(&format!(
        "<sheets><sheet name=\"{}\" sheetId=\"1\" r:id=\"rId1\"/></sheets>",
        escape_xml(&sheet_name(title))
    ));
    xml.push_str("</workbook>");
    xml
}

pub(crate) fn workbook_rels_xml() -> String {
    let mut xml = String::from(XML_DECL);
    xml.push_str(
        "<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">",
    );
    xml.push_str("<Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet\" Target=\"worksheets/sheet1.xml\"/>");
    xml.push_str("<Relationship Id=\"rId2\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles\" Target=\"styles.xml\"/>");
    xml.push_str("</Relationships>");
    xml
}

/// Two cell formats: 0 = default, 1 = bold centered (title band).
pub(crate) fn styles_xml() -> String {
    let mut xml = String::from(XML_DECL);
    xml.push_str("<styleSheet xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\">");
    xml.push_str("<fonts count=\"2\"><font><sz val=\"11\"/><name val=\"Calibri\"/></font><font><b/><sz val=\"12\"/><name val=\"Calibri\"/></font></fonts>");
    xml.push_str("<fills count=\"2\"><fill><patternFill patternType=\"none\"/></fill><fill><patternFill patternType=\"gray125\"/></fill></fills>");
    xml.push_str("<borders count=\"1\"><border><left/><right/><top/><bottom/><diagonal/></border></borders>");
    xml.push_str("<cellStyleXfs count=\"1\"><xf numFmtId=\"0\" fontId=\"0\" fillId=\"0\" borderId=\"0\"/></cellStyleXfs>");
    xml.push_str("<cellXfs count=\"2\">");
    xml.push_str("<xf numFmtId=\"0\" fontId=\"0\" fillId=\"0\" borderId=\"0\" xfId=\"0\"/>");
    xml.push_str("<xf numFmtId=\"0\" fontId=\"1\" fillId=\"0\" borderId=\"0\" xfId=\"0\" applyFont=\"1\" applyAlignment=\"1\"><alignment horizontal=\"center\"/></xf>");
    xml.push_str("</cellXfs>");
    xml.push_str("</styleSheet>");
    xml
}

/// The worksheet itself.
pub(crate) fn sheet_xml(schedule: &Schedule) -> String {
    let days: Vec<_> = schedule.dates().collect();
    let last_col = days.len(); // 0 = label column
    let last_row = HEADER_ROWS + schedule.rows.len();

    let mut xml = String::from(XML_DECL);
    xml.push_str("<worksheet xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\">");
    xml.push_str(&format!(
        "<dimension ref=\"A1:{}\"/>",
        cell_ref(last_row.saturating_sub(1), last_col)
    ));
    xml.push_str(&format!(
        "<cols><col min=\"1\" max=\"1\" width=\"24\" customWidth=\"1\"/><col min=\"2\" max=\"{}\" width=\"5.5\" customWidth=\"1\"/></cols>",
        last_col + 1
    ));
    xml.push_str("<sheetData>");

    // Row 1: title, merged across every column.
    let title = format!(
        "{} ({} - {})",
        schedule.title,
        schedule.date_from.format("%d.%m.%Y"),
        schedule.date_to.format("%d.%m.%Y"),
    );
    xml.push_str("<row r=\"1\">");
    push_inline_str(&mut xml, 0, 0, &title, Some(1));
    xml.push_str("</row>");

    // Row 2: weekday names.
    xml.push_str("<row r=\"2\">");
    for (i, day) in days.iter().enumerate() {
        let name = WEEKDAYS[day.weekday().num_days_from_monday() as usize];
        push_inline_str(&mut xml, 1, i + 1, name, None);
    }
    xml.push_str("</row>");

    // Row 3: day numbers.
    xml.push_str("<row r=\"3\">");
    for (i, day) in days.iter().enumerate() {
        xml.push_str(&format!(
            "<c r=\"{}\"><v>{}</v></c>",
            cell_ref(2, i + 1),
            day.day()
        ));
    }
    xml.push_str("</row>");

    // Data rows: label + raw cell text.
    for (r, row) in schedule.rows.iter().enumerate() {
        let sheet_row = HEADER_ROWS + r;
        xml.push_str(&format!("<row r=\"{}\">", sheet_row + 1));
        push_inline_str(&mut xml, sheet_row, 0, &row.label(), None);
        for (i, day) in days.iter().enumerate() {
            if let Some(cell) = schedule.cell_at(row.id, *day) {
                push_inline_str(&mut xml, sheet_row, i + 1, &cell.value_raw, None);
            }
        }
        xml.push_str("</row>");
    }

    xml.push_str("</sheetData>");
    xml.push_str(&format!(
        "<mergeCells count=\"1\"><mergeCell ref=\"A1:{}\"/></mergeCells>",
        cell_ref(0, last_col)
    ));
    xml.push_str("</worksheet>");
    xml
}

fn push_inline_str(xml: &mut String, row: usize, col: usize, text: &str, style: Option<u32>) {
    let style_attr = match style {
        Some(s) => format!(" s=\"{}\"", s),
        None => String::new(),
    };
    xml.push_str(&format!(
        "<c r=\"{}\" t=\"inlineStr\"{}><is><t>{}</t></is></c>",
        cell_ref(row, col),
        style_attr,
        escape_xml(text)
    ));
}

/// Excel sheet names: at most 31 chars, none of `[ ] : * ? / \`.
fn sheet_name(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .map(|c| match c {
            '[' | ']' | ':' | '*' | '?' | '/' | '\\' => '_',
            c => c,
        })
        .take(31)
        .collect();
    if cleaned.trim().is_empty() {
        "Schedule".to_string()
    } else {
        cleaned
    }
}

/// A1-style reference from 0-based row/column.
fn cell_ref(row: usize, col: usize) -> String {
    format!("{}{}", col_letters(col), row + 1)
}

/// Convert 0-based column index to Excel-style letter(s).
fn col_letters(col: usize) -> String {
    let mut result = String::new();
    let mut n = col;
    loop {
        result.insert(0, (b'A' + (n % 26) as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    result
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use shiftgrid_engine::ids::{PositionId, RowId, ScheduleId};
    use shiftgrid_engine::schedule::{Cell, PayKind, Row, SalaryHandling};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 7, d).unwrap()
    }

    fn schedule() -> Schedule {
        let mut s = Schedule::new(ScheduleId::from_raw(1), "July <grill>", date(1), date(7));
        s.push_row(Row {
            id: RowId::from_raw(1),
            position_id: PositionId::from_raw(1),
            position_name: "Cook".into(),
            index: 1,
            pay_kind: PayKind::Hourly,
            pay_rate: Some(200.0),
            norm_hours: 0.0,
            rate_override: None,
            amount_override: None,
            salary_handling: SalaryHandling::Prorate,
        });
        s.set_cell(Cell {
            row_id: RowId::from_raw(1),
            work_date: date(2),
            value_raw: "2x12".into(),
            value: Some(12.0),
            unit_count: Some(2.0),
        });
        s
    }

    #[test]
    fn test_col_letters() {
        assert_eq!(col_letters(0), "A");
        assert_eq!(col_letters(25), "Z");
        assert_eq!(col_letters(26), "AA");
        assert_eq!(col_letters(27), "AB");
        assert_eq!(col_letters(701), "ZZ");
    }

    #[test]
    fn test_sheet_xml_shape() {
        let xml = sheet_xml(&schedule());
        // 7 days: label column + 7 -> merge A1:H1.
        assert!(xml.contains("<mergeCell ref=\"A1:H1\"/>"), "{xml}");
        // Title is escaped and carries the date range.
        assert!(xml.contains("July &lt;grill&gt; (01.07.2026 - 07.07.2026)"), "{xml}");
        // Weekday header: 2026-07-01 is a Wednesday.
        assert!(xml.contains("<c r=\"B2\" t=\"inlineStr\"><is><t>Wed</t></is></c>"));
        // Day-number header.
        assert!(xml.contains("<c r=\"B3\"><v>1</v></c>"));
        // Row label and the raw cell text as inline strings.
        assert!(xml.contains("<is><t>Cook 1</t></is>"));
        assert!(xml.contains("<is><t>2x12</t></is>"));
        // The empty days produce no cells at all.
        assert!(!xml.contains("<c r=\"D4\""));
    }

    #[test]
    fn test_sheet_name_rules() {
        assert_eq!(sheet_name("July"), "July");
        assert_eq!(sheet_name("a/b:c"), "a_b_c");
        assert_eq!(sheet_name(""), "Schedule");
        assert_eq!(sheet_name(&"x".repeat(40)).len(), 31);
    }

    #[test]
    fn test_workbook_parts_are_wellformed_enough() {
        assert!(content_types_xml().contains("worksheets/sheet1.xml"));
        assert!(root_rels_xml().contains("xl/workbook.xml"));
        assert!(workbook_rels_xml().contains("styles.xml"));
        assert!(workbook_xml("J&J").contains("name=\"J&amp;J\""));
    }
}
