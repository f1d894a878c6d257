use crate::domain::model::{Cell, RecordSet};
use crate::utils::error::{EtlError, Result};

/// Sentinel written in place of a literal `nan` token.
pub const NULL_SENTINEL: &str = "NULL";

/// Target type of a coerced column.
///
/// `Decimal` and `Numeric` both coerce to a number; the split mirrors the
/// SQL column types the rule was written against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Decimal,
    Numeric,
    Text,
}

/// A named, hard-coded column-coercion routine.
#[derive(Debug)]
pub struct TransformRule {
    pub name: &'static str,
    pub columns: &'static [(&'static str, ColumnKind)],
}

pub const FOOD: TransformRule = TransformRule {
    name: "food",
    columns: &[
        ("Protein", ColumnKind::Decimal),
        ("Carbohydrates", ColumnKind::Decimal),
        ("Fat", ColumnKind::Decimal),
        ("Fiber", ColumnKind::Decimal),
        ("Servings", ColumnKind::Numeric),
        ("Calories", ColumnKind::Numeric),
        ("Name", ColumnKind::Text),
        ("Type", ColumnKind::Text),
    ],
};

const RULES: &[TransformRule] = &[FOOD];

/// Looks a rule up by job name, ignoring case.
pub fn rule_for(name: &str) -> Option<&'static TransformRule> {
    RULES.iter().find(|rule| rule.name.eq_ignore_ascii_case(name))
}

/// Applies the rule registered for `name`, or returns the records untouched.
pub fn transform_records(name: &str, records: RecordSet) -> Result<RecordSet> {
    match rule_for(name) {
        Some(rule) => rule.apply(records),
        None => {
            tracing::debug!("No transform rule for '{}', passing records through", name);
            Ok(records)
        }
    }
}

impl TransformRule {
    /// Coerces the rule's columns, drops every row holding a value that
    /// cannot be coerced (or any null), then rewrites `nan` text to
    /// [`NULL_SENTINEL`].
    pub fn apply(&self, mut records: RecordSet) -> Result<RecordSet> {
        let targets = self
            .columns
            .iter()
            .map(|(column, kind)| {
                records
                    .column_index(column)
                    .map(|index| (index, *kind))
                    .ok_or_else(|| {
                        EtlError::processing(format!(
                            "transform '{}' needs column '{}' which is not in the schema",
                            self.name, column
                        ))
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        let before = records.len();
        records.rows_mut().retain_mut(|row| {
            for &(index, kind) in &targets {
                match coerce(&row[index], kind) {
                    Some(cell) => row[index] = cell,
                    None => return false,
                }
            }
            row.iter().all(|cell| !cell.is_null())
        });

        for row in records.rows_mut() {
            for cell in row.iter_mut() {
                if matches!(cell, Cell::Text(s) if s.as_str() == "nan") {
                    *cell = Cell::Text(NULL_SENTINEL.to_string());
                }
            }
        }

        let dropped = before - records.len();
        if dropped > 0 {
            tracing::info!(
                "Transform '{}' dropped {} of {} rows",
                self.name,
                dropped,
                before
            );
        }
        Ok(records)
    }
}

fn coerce(cell: &Cell, kind: ColumnKind) -> Option<Cell> {
    match kind {
        ColumnKind::Decimal | ColumnKind::Numeric => to_number(cell).map(Cell::Number),
        ColumnKind::Text => Some(Cell::Text(match cell {
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => n.to_string(),
            // stringified missing value
            Cell::Null => "nan".to_string(),
        })),
    }
}

fn to_number(cell: &Cell) -> Option<f64> {
    let value = match cell {
        Cell::Number(n) => *n,
        Cell::Text(s) => s.trim().parse::<f64>().ok()?,
        Cell::Null => return None,
    };
    (!value.is_nan()).then_some(value)
}
