//! Delimited text codec shared by the CSV source and exporter.

use encoding_rs::Encoding;
use serde_json::Value;
use synthflow_config::{ColumnType, TableSchema};

use crate::artifact::Record;
use crate::error::ExecutorError;
use crate::table::{self, Table};

pub fn delimiter(option: Option<&str>) -> Result<u8, ExecutorError> {
  match option {
    None | Some("") => Ok(b','),
    Some("\\t") => Ok(b'\t'),
    Some(s) if s.len() == 1 && s.is_ascii() => Ok(s.as_bytes()[0]),
    Some(s) => Err(ExecutorError::InvalidDelimiter(s.to_string())),
  }
}

pub fn encoding(label: Option<&str>) -> Result<&'static Encoding, ExecutorError> {
  match label {
    None => Ok(encoding_rs::UTF_8),
    Some(label) => Encoding::for_label(label.trim().as_bytes())
      .ok_or_else(|| ExecutorError::UnsupportedEncoding(label.to_string())),
  }
}

pub fn decode(bytes: &[u8], encoding: &'static Encoding) -> Result<String, ExecutorError> {
  let (text, had_errors) = encoding.decode_with_bom_removal(bytes);
  if had_errors {
    return Err(ExecutorError::Decode {
      encoding: encoding.name(),
    });
  }
  Ok(text.into_owned())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellKind {
  Integer,
  Float,
  Boolean,
  Text,
}

fn parse_bool(cell: &str) -> Option<bool> {
  if cell.eq_ignore_ascii_case("true") {
    Some(true)
  } else if cell.eq_ignore_ascii_case("false") {
    Some(false)
  } else {
    None
  }
}

/// `f64::from_str` also accepts `nan`, `inf` and out-of-range exponents.
fn finite_float(cell: &str) -> Option<f64> {
  cell.trim().parse::<f64>().ok().filter(|f| f.is_finite())
}

/// Narrowest kind every non-empty cell satisfies.
fn infer<'c>(cells: impl Iterator<Item = &'c str> + Clone) -> CellKind {
  let mut present = cells.filter(|c| !c.is_empty());
  if present.clone().next().is_none() {
    CellKind::Text
  } else if present.clone().all(|c| c.parse::<i64>().is_ok()) {
    CellKind::Integer
  } else if present.clone().all(|c| finite_float(c).is_some()) {
    CellKind::Float
  } else if present.all(|c| parse_bool(c).is_some()) {
    CellKind::Boolean
  } else {
    CellKind::Text
  }
}

/// A declared column type overrides inference.
fn declared(column_type: ColumnType, inferred: CellKind) -> CellKind {
  match column_type {
    ColumnType::Number if inferred == CellKind::Integer => CellKind::Integer,
    ColumnType::Number => CellKind::Float,
    ColumnType::Boolean => CellKind::Boolean,
    _ => CellKind::Text,
  }
}

fn convert(cell: &str, kind: CellKind) -> Value {
  if cell.is_empty() {
    return Value::Null;
  }
  match kind {
    CellKind::Integer => cell.parse::<i64>().map(Value::from).unwrap_or(Value::Null),
    CellKind::Float => finite_float(cell).map(table::number).unwrap_or(Value::Null),
    CellKind::Boolean => parse_bool(cell).map(Value::Bool).unwrap_or(Value::Null),
    CellKind::Text => Value::String(cell.to_string()),
  }
}

/// Parse delimited text into records. Without a header row, columns are named
/// `0`, `1`, ...
pub fn read_records(
  text: &str,
  delimiter: u8,
  has_header: bool,
  schema: Option<&TableSchema>,
) -> Result<Vec<Record>, ExecutorError> {
  let mut reader = csv::ReaderBuilder::new()
    .delimiter(delimiter)
    .has_headers(has_header)
    .from_reader(text.as_bytes());

  let mut headers: Vec<String> = if has_header {
    reader.headers()?.iter().map(str::to_string).collect()
  } else {
    Vec::new()
  };

  let rows = reader
    .records()
    .collect::<Result<Vec<csv::StringRecord>, csv::Error>>()?;

  if !has_header {
    let width = rows.first().map(csv::StringRecord::len).unwrap_or(0);
    headers = (0..width).map(|i| i.to_string()).collect();
  }

  let kinds: Vec<CellKind> = headers
    .iter()
    .enumerate()
    .map(|(i, name)| {
      let inferred = infer(rows.iter().map(move |row| row.get(i).unwrap_or("")));
      match schema.and_then(|s| s.column(name)) {
        Some(column) => declared(column.column_type, inferred),
        None => inferred,
      }
    })
    .collect();

  Ok(
    rows
      .iter()
      .map(|row| {
        headers
          .iter()
          .zip(&kinds)
          .enumerate()
          .map(|(i, (name, kind))| (name.clone(), convert(row.get(i).unwrap_or(""), *kind)))
          .collect()
      })
      .collect(),
  )
}

fn cell_text(value: &Value) -> String {
  match value {
    Value::Null => String::new(),
    Value::String(s) => s.clone(),
    other => other.to_string(),
  }
}

/// Render records as delimited text: a header row, then one row per record.
pub fn write_records(
  records: &[Record],
  delimiter: u8,
  encoding: &'static Encoding,
) -> Result<Vec<u8>, ExecutorError> {
  let table = Table::new(records);
  let mut writer = csv::WriterBuilder::new()
    .delimiter(delimiter)
    .from_writer(Vec::new());

  writer.write_record(table.columns())?;
  for record in records {
    writer.write_record(
      table
        .columns()
        .iter()
        .map(|column| record.get(*column).map(cell_text).unwrap_or_default()),
    )?;
  }

  let bytes = writer
    .into_inner()
    .map_err(|e| ExecutorError::Io(e.into_error()))?;
  if encoding == encoding_rs::UTF_8 {
    return Ok(bytes);
  }
  encode(&String::from_utf8_lossy(&bytes), encoding)
}

/// Encode text in `encoding`, failing on characters it cannot represent.
///
/// UTF-16 output is written with a byte order mark, which `decode` strips.
fn encode(text: &str, encoding: &'static Encoding) -> Result<Vec<u8>, ExecutorError> {
  if encoding == encoding_rs::UTF_16LE || encoding == encoding_rs::UTF_16BE {
    let little_endian = encoding == encoding_rs::UTF_16LE;
    let mut bytes = Vec::with_capacity(2 * (text.len() + 1));
    for unit in std::iter::once(0xFEFF).chain(text.encode_utf16()) {
      let pair = if little_endian {
        unit.to_le_bytes()
      } else {
        unit.to_be_bytes()
      };
      bytes.extend_from_slice(&pair);
    }
    return Ok(bytes);
  }

  let (encoded, used, had_unmappable) = encoding.encode(text);
  if used != encoding {
    return Err(ExecutorError::UnsupportedEncoding(encoding.name().to_string()));
  }
  if had_unmappable {
    return Err(ExecutorError::Unmappable {
      encoding: encoding.name(),
    });
  }
  Ok(encoded.into_owned())
}
