//! In-memory `.xlsx` workbooks for integration tests.
#![allow(dead_code)]

use std::io::Cursor;
use std::io::Write;
use zip::write::SimpleFileOptions;
use zip::CompressionMethod;
use zip::ZipWriter;

/// A worksheet cell
#[derive(Clone, Debug)]
pub enum Cell {
    Empty,
    /// Inline string
    Text(&'static str),
    /// Entry of the shared string table
    Shared(&'static str),
    /// Serial number styled with the built-in date format
    Date(f64),
    /// Serial number styled with a custom `yyyy"년" m"월" d"일"` format
    KoreanDate(f64),
    /// Unstyled number
    Number(f64),
}

pub const HEADER: [&str; 22] = [
    "학번", "이름", "성별", "대학", "캠퍼스", "계열", "학과", "모집시기", "지원일", "경쟁률",
    "충원", "등급", "비고", "전형명", "전형일", "1단계발표", "최종발표", "합격여부", "등록",
    "상담", "메모", "수능최저",
];

/// Title row, an empty row, then the 22-column header on row 3
pub fn preamble() -> Vec<Vec<Cell>> {
    vec![
        vec![Cell::Text("2025학년도 수시 지원 결과")],
        vec![],
        HEADER.iter().map(|title| Cell::Text(*title)).collect(),
    ]
}

/// One application row laid out on the default column positions
pub fn application(
    class: &'static str,
    name: &'static str,
    institution: &'static str,
    category: &'static str,
    dates: [Cell; 3],
    auxiliary: &'static str,
) -> Vec<Cell> {
    let mut row = vec![Cell::Empty; 22];
    row[0] = Cell::Text(class);
    row[1] = Cell::Text(name);
    row[3] = Cell::Text(institution);
    row[13] = Cell::Text(category);
    let [screening, stage_one, final_result] = dates;
    row[14] = screening;
    row[15] = stage_one;
    row[16] = final_result;
    row[21] = Cell::Text(auxiliary);
    row
}

/// Builds an `.xlsx` package whose first sheet holds `rows`, starting at `A1`.
pub fn xlsx(rows: &[Vec<Cell>]) -> Vec<u8> {
    let mut shared_strings: Vec<&str> = Vec::new();
    let mut sheet = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );
    for (row_index, row) in rows.iter().enumerate() {
        sheet.push_str(&format!(r#"<row r="{}">"#, row_index + 1));
        for (col_index, cell) in row.iter().enumerate() {
            let reference = format!("{}{}", column_name(col_index), row_index + 1);
            match cell {
                Cell::Empty => (),
                Cell::Text(text) => sheet.push_str(&format!(
                    r#"<c r="{reference}" t="inlineStr"><is><t>{}</t></is></c>"#,
                    escape(text)
                )),
                Cell::Shared(text) => {
                    let index = shared_strings.iter().position(|it| it == text).unwrap_or_else(|| {
                        shared_strings.push(*text);
                        shared_strings.len() - 1
                    });
                    sheet.push_str(&format!(r#"<c r="{reference}" t="s"><v>{index}</v></c>"#));
                }
                Cell::Date(serial) => sheet.push_str(&format!(r#"<c r="{reference}" s="1"><v>{serial}</v></c>"#)),
                Cell::KoreanDate(serial) => sheet.push_str(&format!(r#"<c r="{reference}" s="2"><v>{serial}</v></c>"#)),
                Cell::Number(value) => sheet.push_str(&format!(r#"<c r="{reference}"><v>{value}</v></c>"#)),
            }
        }
        sheet.push_str("</row>");
    }
    sheet.push_str("</sheetData></worksheet>");

    let mut strings = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="{0}" uniqueCount="{0}">"#,
        shared_strings.len()
    );
    for text in &shared_strings {
        strings.push_str(&format!("<si><t>{}</t></si>", escape(text)));
    }
    strings.push_str("</sst>");

    let parts = [
        ("[Content_Types].xml", CONTENT_TYPES.to_owned()),
        ("_rels/.rels", ROOT_RELS.to_owned()),
        ("xl/workbook.xml", WORKBOOK.to_owned()),
        ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS.to_owned()),
        ("xl/styles.xml", STYLES.to_owned()),
        ("xl/sharedStrings.xml", strings),
        ("xl/worksheets/sheet1.xml", sheet),
    ];
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    for (name, content) in parts {
        zip.start_file(name, options).expect("start zip entry");
        zip.write_all(content.as_bytes()).expect("write zip entry");
    }
    zip.finish().expect("finish zip").into_inner()
}

fn column_name(mut col: usize) -> String {
    let mut name = Vec::new();
    loop {
        name.push(b'A' + (col % 26) as u8);
        if col < 26 {
            break;
        }
        col = col / 26 - 1;
    }
    name.reverse();
    String::from_utf8(name).expect("ascii column name")
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><workbookPr/><sheets><sheet name="수시" sheetId="1" r:id="rId1"/></sheets></workbook>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><numFmts count="1"><numFmt numFmtId="164" formatCode="yyyy&quot;년&quot; m&quot;월&quot; d&quot;일&quot;"/></numFmts><cellXfs count="3"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/><xf numFmtId="14" fontId="0" fillId="0" borderId="0" xfId="0" applyNumberFormat="1"/><xf numFmtId="164" fontId="0" fillId="0" borderId="0" xfId="0" applyNumberFormat="1"/></cellXfs></styleSheet>"#;
