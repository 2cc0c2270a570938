//! Column-oriented view over a list of records.

use std::collections::HashMap;

use serde_json::Value;

use crate::artifact::{Artifact, Record};

static NULL: Value = Value::Null;

/// A borrowed tabular view. Columns are the union of record keys in
/// first-seen order; a key missing from a record reads as null.
#[derive(Debug, Clone)]
pub struct Table<'a> {
  columns: Vec<&'a str>,
  rows: &'a [Record],
}

impl<'a> Table<'a> {
  pub fn new(rows: &'a [Record]) -> Self {
    let mut columns: Vec<&'a str> = Vec::new();
    for row in rows {
      for key in row.keys() {
        if !columns.contains(&key.as_str()) {
          columns.push(key);
        }
      }
    }
    Self { columns, rows }
  }

  pub fn empty() -> Self {
    Self {
      columns: Vec::new(),
      rows: &[],
    }
  }

  /// View an upstream artifact as a table. Anything but records reads as empty.
  pub fn from_artifact(artifact: Option<&'a Artifact>) -> Self {
    match artifact.and_then(Artifact::as_records) {
      Some(rows) => Self::new(rows),
      None => Self::empty(),
    }
  }

  pub fn columns(&self) -> &[&'a str] {
    &self.columns
  }

  pub fn row_count(&self) -> usize {
    self.rows.len()
  }

  pub fn has_column(&self, name: &str) -> bool {
    self.columns.iter().any(|c| *c == name)
  }

  /// Every cell of a column, nulls included.
  pub fn values(&self, column: &str) -> impl Iterator<Item = &'a Value> {
    self.rows.iter().map(move |row| row.get(column).unwrap_or(&NULL))
  }

  pub fn non_null(&self, column: &str) -> impl Iterator<Item = &'a Value> {
    self.values(column).filter(|v| !v.is_null())
  }

  /// A column is numeric when it has at least one non-null value and every
  /// non-null value is a number.
  pub fn is_numeric(&self, column: &str) -> bool {
    let mut any = false;
    for value in self.non_null(column) {
      if !value.is_number() {
        return false;
      }
      any = true;
    }
    any
  }

  pub fn numeric_columns(&self) -> Vec<&'a str> {
    self
      .columns
      .iter()
      .copied()
      .filter(|c| self.is_numeric(c))
      .collect()
  }

  /// Non-null numeric cells of a column.
  pub fn numbers(&self, column: &str) -> Vec<f64> {
    self.non_null(column).filter_map(Value::as_f64).collect()
  }

  pub fn null_count(&self, column: &str) -> usize {
    self.values(column).filter(|v| v.is_null()).count()
  }

  /// Distinct non-null values.
  pub fn distinct_count(&self, column: &str) -> usize {
    let mut seen = std::collections::HashSet::new();
    self.non_null(column).filter(|v| seen.insert(distinct_key(v))).count()
  }

  /// Most frequent non-null value and its count. Ties go to the value seen first.
  pub fn most_common(&self, column: &str) -> Option<(&'a Value, usize)> {
    let mut counts: HashMap<String, (usize, usize, &'a Value)> = HashMap::new();
    for (position, value) in self.non_null(column).enumerate() {
      counts
        .entry(distinct_key(value))
        .or_insert((0, position, value))
        .0 += 1;
    }
    counts
      .into_values()
      .max_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)))
      .map(|(count, _, value)| (value, count))
  }
}

/// Numbers compare by value so `1` and `1.0` count as one distinct value.
fn distinct_key(value: &Value) -> String {
  match value.as_f64() {
    Some(n) => format!("n:{n}"),
    None => value.to_string(),
  }
}

pub fn mean(values: &[f64]) -> Option<f64> {
  if values.is_empty() {
    return None;
  }
  Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator). Needs at least two values.
pub fn sample_std(values: &[f64]) -> Option<f64> {
  if values.len() < 2 {
    return None;
  }
  let mean = mean(values)?;
  let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
  Some((sum_sq / (values.len() - 1) as f64).sqrt())
}

pub fn min(values: &[f64]) -> Option<f64> {
  values.iter().copied().reduce(f64::min)
}

pub fn max(values: &[f64]) -> Option<f64> {
  values.iter().copied().reduce(f64::max)
}

pub fn median(values: &[f64]) -> Option<f64> {
  if values.is_empty() {
    return None;
  }
  let mut sorted = values.to_vec();
  sorted.sort_by(f64::total_cmp);
  let mid = sorted.len() / 2;
  if sorted.len() % 2 == 0 {
    Some((sorted[mid - 1] + sorted[mid]) / 2.0)
  } else {
    Some(sorted[mid])
  }
}

/// JSON number for a finite float, null otherwise.
pub fn number(value: f64) -> Value {
  serde_json::Number::from_f64(value)
    .map(Value::Number)
    .unwrap_or(Value::Null)
}
