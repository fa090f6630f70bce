use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use sculptor::catalog::CourseCatalog;
use sculptor::CatalogError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Celda de la planilla: texto en línea o número.
enum Cell<'a> {
    Text(&'a str),
    Num(f64),
}

fn column_letter(i: usize) -> char {
    (b'A' + i as u8) as char
}

fn sheet_xml(rows: &[Vec<Cell>]) -> String {
    let mut body = String::new();
    for (r, row) in rows.iter().enumerate() {
        body.push_str(&format!("<row r=\"{}\">", r + 1));
        for (c, cell) in row.iter().enumerate() {
            let at = format!("{}{}", column_letter(c), r + 1);
            match cell {
                Cell::Text(t) => body.push_str(&format!("<c r=\"{}\" t=\"inlineStr\"><is><t>{}</t></is></c>", at, t)),
                Cell::Num(n) => body.push_str(&format!("<c r=\"{}\"><v>{}</v></c>", at, n)),
            }
        }
        body.push_str("</row>");
    }
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <worksheet xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\">\
         <sheetData>{}</sheetData></worksheet>",
        body
    )
}

/// Arma un .xlsx mínimo (sin estilos ni sharedStrings) con las hojas indicadas, en orden.
fn write_xlsx(path: &Path, sheets: &[(&str, Vec<Vec<Cell>>)]) {
    let mut zip = ZipWriter::new(File::create(path).expect("crear xlsx"));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    let mut overrides = String::new();
    let mut workbook_sheets = String::new();
    let mut rels = String::new();
    for (i, (name, _)) in sheets.iter().enumerate() {
        let n = i + 1;
        overrides.push_str(&format!(
            "<Override PartName=\"/xl/worksheets/sheet{}.xml\" \
             ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml\"/>",
            n
        ));
        workbook_sheets.push_str(&format!("<sheet name=\"{}\" sheetId=\"{}\" r:id=\"rId{}\"/>", name, n, n));
        rels.push_str(&format!(
            "<Relationship Id=\"rId{}\" \
             Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet\" \
             Target=\"worksheets/sheet{}.xml\"/>",
            n, n
        ));
    }

    let parts: Vec<(String, String)> = vec![
        (
            "[Content_Types].xml".to_string(),
            format!(
                "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
                 <Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">\
                 <Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>\
                 <Default Extension=\"xml\" ContentType=\"application/xml\"/>\
                 <Override PartName=\"/xl/workbook.xml\" \
                 ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml\"/>{}</Types>",
                overrides
            ),
        ),
        (
            "_rels/.rels".to_string(),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
             <Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
             <Relationship Id=\"rId1\" \
             Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument\" \
             Target=\"xl/workbook.xml\"/></Relationships>"
                .to_string(),
        ),
        (
            "xl/workbook.xml".to_string(),
            format!(
                "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
                 <workbook xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\" \
                 xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\">\
                 <sheets>{}</sheets></workbook>",
                workbook_sheets
            ),
        ),
        (
            "xl/_rels/workbook.xml.rels".to_string(),
            format!(
                "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
                 <Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">{}</Relationships>",
                rels
            ),
        ),
    ];

    for (name, content) in parts {
        zip.start_file(name, options).expect("entrada zip");
        zip.write_all(content.as_bytes()).expect("escribir entrada");
    }
    for (i, (_, rows)) in sheets.iter().enumerate() {
        zip.start_file(format!("xl/worksheets/sheet{}.xml", i + 1), options).expect("entrada zip");
        zip.write_all(sheet_xml(rows).as_bytes()).expect("escribir hoja");
    }
    zip.finish().expect("cerrar xlsx");
}

fn scraper_sheet() -> Vec<Vec<Cell<'static>>> {
    use Cell::*;
    vec![
        vec![Text("course_code"), Text("class_name"), Text("credits_raw"), Text("prereq_codes")],
        vec![Text("cs141"), Text("Program Design II"), Num(3.0), Text("CS 111")],
        vec![Text(""), Text(""), Text(""), Text("")],
        vec![Text("CS 251"), Text("Data Structures"), Text("3 or 4 hours"), Text("CS 141; cs151")],
        vec![Text("HIST 100"), Text("World History"), Text("TBA"), Text("")],
    ]
}

fn temp_xlsx(dir: &tempfile::TempDir, name: &str) -> PathBuf {
    dir.path().join(name)
}

#[test]
fn test_load_xlsx_prefers_catalog_sheet() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_xlsx(&dir, "catalog.xlsx");
    let notes = vec![vec![Cell::Text("notes")], vec![Cell::Text("exported from the scraper")]];
    write_xlsx(&path, &[("Notes", notes), ("Catalog", scraper_sheet())]);

    let catalog = CourseCatalog::load(&path).expect("Debe leer la hoja 'Catalog'");
    // fila en blanco omitida; HIST 100 sin créditos legibles se descarta
    assert_eq!(catalog.len(), 2);

    let pd2 = catalog.get("CS 141").expect("CS 141 presente");
    assert_eq!(pd2.title, "Program Design II");
    assert_eq!(pd2.credits, 3.0);
    assert_eq!(pd2.subject, "CS");
    assert_eq!(pd2.prereqs, vec!["CS 111".to_string()]);

    let ds = catalog.get("cs251").expect("CS 251 presente");
    assert_eq!(ds.credits, 4.0);
    assert_eq!(ds.prereqs, vec!["CS 141".to_string(), "CS 151".to_string()]);
    assert!(catalog.get("HIST 100").is_none());
}

#[test]
fn test_load_xlsx_first_sheet_when_no_catalog_sheet() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_xlsx(&dir, "courses.xlsx");
    write_xlsx(&path, &[("Fall 2025", scraper_sheet()), ("Other", vec![vec![Cell::Text("x")]])]);

    let catalog = CourseCatalog::load(&path).expect("Debe leer la primera hoja");
    assert_eq!(catalog.len(), 2);
    assert!(catalog.get("CS 141").is_some());
}

#[test]
fn test_load_xlsx_without_code_column() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_xlsx(&dir, "titles.xlsx");
    let rows = vec![
        vec![Cell::Text("class_name"), Cell::Text("credits")],
        vec![Cell::Text("Program Design II"), Cell::Num(3.0)],
    ];
    write_xlsx(&path, &[("catalog", rows)]);

    match CourseCatalog::load(&path) {
        Err(CatalogError::UnsupportedFormat(msg)) => assert!(msg.contains("code")),
        other => panic!("se esperaba UnsupportedFormat, se obtuvo {:?}", other.map(|c| c.len())),
    }
}
