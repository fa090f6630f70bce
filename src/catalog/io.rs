use calamine::{open_workbook_auto, Data, Reader};
use std::fs;
use std::path::Path;

use crate::catalog::raw::{CreditsValue, PrereqsValue, RawCourseRecord};
use crate::error::CatalogError;

/// Normaliza un código de curso: mayúsculas, sin puntuación, y un único espacio
/// entre el prefijo de letras y el número ("cs109", "CS  109", "CS-109" -> "CS 109").
pub fn normalize_code(raw: &str) -> String {
    let compact: String = raw
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '&')
        .map(|c| c.to_ascii_uppercase())
        .collect();

    match compact.find(|c: char| c.is_ascii_digit()) {
        Some(idx) if idx > 0 && compact[..idx].chars().all(|c| c.is_ascii_alphabetic() || c == '&') => {
            format!("{} {}", &compact[..idx], &compact[idx..])
        }
        _ => compact,
    }
}

/// Prefijo alfabético del código: "MATH 220" -> "MATH".
pub fn subject_from_code(code: &str) -> String {
    normalize_code(code)
        .chars()
        .take_while(|c| c.is_ascii_alphabetic() || *c == '&')
        .collect()
}

/// Normaliza títulos para compararlos: minúsculas, sólo alfanuméricos y espacios simples.
pub fn normalize_title(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extrae créditos de un texto libre ("3", "3 or 4", "1-3", "1–3", "3 hours").
/// Si hay varios valores se usa el mayor para que el techo nunca se supere.
pub fn parse_credits(text: &str) -> Option<f64> {
    let mut values: Vec<f64> = Vec::new();
    let mut current = String::new();

    for ch in text.chars().chain(std::iter::once(' ')) {
        if ch.is_ascii_digit() || (ch == '.' && !current.contains('.')) {
            current.push(ch);
        } else if !current.is_empty() {
            if let Ok(v) = current.trim_end_matches('.').parse::<f64>() {
                values.push(v);
            }
            current.clear();
        }
    }

    values.into_iter().fold(None, |acc, v| match acc {
        Some(m) if m >= v => Some(m),
        _ => Some(v),
    })
}

/// Normaliza encabezados eliminando espacios y guiones bajos y pasando a minúsculas.
pub fn normalize_header(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .collect()
}

/// Convierte una celda de calamine a String.
pub fn cell_to_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => {
            if (f.floor() - f).abs() < f64::EPSILON {
                format!("{}", *f as i64)
            } else {
                format!("{}", f)
            }
        }
        Data::Int(i) => format!("{}", i),
        Data::Bool(b) => format!("{}", b),
        Data::Empty => String::new(),
        Data::Error(_) => String::new(),
        Data::DateTime(s) => s.to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
    }
}

/// Lee el catálogo desde disco según la extensión del archivo.
pub fn read_raw_catalog(path: &Path) -> Result<Vec<RawCourseRecord>, CatalogError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "json" => read_json_catalog(path),
        "xlsx" | "xlsm" | "xls" | "ods" => read_sheet_catalog(path),
        other => Err(CatalogError::UnsupportedFormat(if other.is_empty() {
            path.display().to_string()
        } else {
            other.to_string()
        })),
    }
}

fn read_json_catalog(path: &Path) -> Result<Vec<RawCourseRecord>, CatalogError> {
    let text = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str::<Vec<RawCourseRecord>>(&text)?)
}

/// Índices de columna detectados en la fila de encabezados.
#[derive(Debug, Default)]
struct SheetColumns {
    code: Option<usize>,
    title: Option<usize>,
    credits: Option<usize>,
    credits_max: Option<usize>,
    subject: Option<usize>,
    prereqs: Option<usize>,
}

impl SheetColumns {
    fn from_header(header: &[String]) -> Self {
        let mut cols = SheetColumns::default();
        for (i, h) in header.iter().enumerate() {
            match normalize_header(h).as_str() {
                "code" | "coursecode" | "codigo" => cols.code = cols.code.or(Some(i)),
                "title" | "classname" | "name" | "nombre" => cols.title = cols.title.or(Some(i)),
                "credits" | "creditsraw" | "hours" | "creditos" => cols.credits = cols.credits.or(Some(i)),
                "creditsmax" => cols.credits_max = cols.credits_max.or(Some(i)),
                "subject" | "subjectcode" => cols.subject = cols.subject.or(Some(i)),
                "prereqs" | "prereqcodes" | "prerequisites" => cols.prereqs = cols.prereqs.or(Some(i)),
                _ => {}
            }
        }
        cols
    }
}

fn read_sheet_catalog(path: &Path) -> Result<Vec<RawCourseRecord>, CatalogError> {
    let mut workbook = open_workbook_auto(path)?;

    // Preferir una hoja llamada "catalog"; si no existe, la primera
    let names = workbook.sheet_names().to_owned();
    let sheet = names
        .iter()
        .find(|n| normalize_header(n) == "catalog")
        .or_else(|| names.first())
        .cloned();
    let Some(sheet) = sheet else {
        return Ok(Vec::new());
    };

    let range = workbook.worksheet_range(&sheet)?;
    let mut rows = range.rows().map(|r| r.iter().map(cell_to_string).collect::<Vec<String>>());

    let Some(header) = rows.next() else {
        return Ok(Vec::new());
    };
    let cols = SheetColumns::from_header(&header);
    if cols.code.is_none() {
        return Err(CatalogError::UnsupportedFormat(format!(
            "sheet '{}' has no course code column",
            sheet
        )));
    }

    let cell = |row: &[String], idx: Option<usize>| -> Option<String> {
        idx.and_then(|i| row.get(i)).map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
    };

    let mut out = Vec::new();
    for row in rows {
        if row.iter().all(|c| c.trim().is_empty()) {
            continue;
        }
        out.push(RawCourseRecord {
            code: cell(&row, cols.code),
            title: cell(&row, cols.title),
            credits: cell(&row, cols.credits).map(CreditsValue::Text),
            credits_max: cell(&row, cols.credits_max).and_then(|s| parse_credits(&s)),
            subject: cell(&row, cols.subject),
            prereqs: cell(&row, cols.prereqs).map(PrereqsValue::Text),
        });
    }

    Ok(out)
}
