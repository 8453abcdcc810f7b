//! The one column layout shared by the CSV file, imports, exports and the
//! remote table.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use tracing::warn;

use crate::ids::RecordId;
use crate::record::{format_date, parse_date, Record, ReviewerEntry, StoredRecord};
use crate::scoring::parse_score;
use crate::types::{Category, PhotoRef, Reviewer, ScoreSet};

/// Header naming. `Snake` matches `tarih, mekan, baba_Ekmek, ...`; `Titled`
/// matches `Tarih, Mekan, Baba Ekmek, ...`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColumnStyle {
    #[default]
    Snake,
    Titled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Id,
    Date,
    Venue,
    Photo,
    WouldReturn,
    Score(Reviewer, Category),
    Comment(Reviewer),
    Subtotal(Reviewer),
    Overall,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    Flag,
    Date,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub field: Field,
}

#[derive(Debug, Clone)]
pub struct Schema {
    style: ColumnStyle,
    columns: Vec<Column>,
}

impl ColumnStyle {
    /// Picks the style whose column names appear most often in `headers`.
    /// Ties go to `Snake`.
    pub fn detect<S: AsRef<str>>(headers: &[S]) -> Self {
        let hits = |style: ColumnStyle| {
            let schema = Schema::new(style);
            headers
                .iter()
                .filter(|header| schema.column(header.as_ref()).is_some())
                .count()
        };
        if hits(ColumnStyle::Titled) > hits(ColumnStyle::Snake) {
            ColumnStyle::Titled
        } else {
            ColumnStyle::Snake
        }
    }
}

impl Field {
    pub fn kind(&self) -> FieldKind {
        match self {
            Field::Id | Field::Venue | Field::Photo | Field::Comment(_) => FieldKind::Text,
            Field::Date => FieldKind::Date,
            Field::WouldReturn => FieldKind::Flag,
            Field::Score(..) | Field::Subtotal(_) | Field::Overall => FieldKind::Number,
        }
    }

    pub fn column_name(&self, style: ColumnStyle) -> String {
        match style {
            ColumnStyle::Snake => match self {
                Field::Id => "id".to_string(),
                Field::Date => "tarih".to_string(),
                Field::Venue => "mekan".to_string(),
                Field::Photo => "foto".to_string(),
                Field::WouldReturn => "yeniden_gider_miyiz".to_string(),
                Field::Score(reviewer, category) => format!("{}_{}", reviewer.key(), category.label()),
                Field::Comment(reviewer) => format!("{}_yorum", reviewer.key()),
                Field::Subtotal(reviewer) => format!("{}_toplam", reviewer.key()),
                Field::Overall => "ortalama".to_string(),
            },
            ColumnStyle::Titled => match self {
                Field::Id => "id".to_string(),
                Field::Date => "Tarih".to_string(),
                Field::Venue => "Mekan".to_string(),
                Field::Photo => "Foto".to_string(),
                Field::WouldReturn => "Yeniden Gider Miyiz".to_string(),
                Field::Score(reviewer, category) => format!("{} {}", reviewer.label(), category.label()),
                Field::Comment(reviewer) => format!("{} Yorum", reviewer.label()),
                Field::Subtotal(reviewer) => format!("{} Toplam", reviewer.label()),
                Field::Overall => "Ortalama".to_string(),
            },
        }
    }
}

impl FieldKind {
    /// Cell written for a column that a source file lacks.
    pub fn default_cell(&self) -> &'static str {
        match self {
            FieldKind::Text | FieldKind::Date => "",
            FieldKind::Number => "0",
            FieldKind::Flag => "false",
        }
    }
}

impl Schema {
    pub fn new(style: ColumnStyle) -> Self {
        let mut fields = vec![Field::Id, Field::Date, Field::Venue, Field::Photo, Field::WouldReturn];
        for reviewer in Reviewer::ALL {
            fields.extend(Category::ALL.iter().map(|category| Field::Score(reviewer, *category)));
            fields.push(Field::Comment(reviewer));
            fields.push(Field::Subtotal(reviewer));
        }
        fields.push(Field::Overall);

        let columns = fields
            .into_iter()
            .map(|field| Column {
                name: field.column_name(style),
                field,
            })
            .collect();
        Self { style, columns }
    }

    pub fn style(&self) -> ColumnStyle {
        self.style
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        let name = name.trim();
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn name_of(&self, field: Field) -> String {
        field.column_name(self.style)
    }

    pub fn header(&self) -> Vec<String> {
        self.columns.iter().map(|column| column.name.clone()).collect()
    }

    /// Schema columns absent from `headers`, in schema order.
    pub fn missing_columns<S: AsRef<str>>(&self, headers: &[S]) -> Vec<String> {
        self.columns
            .iter()
            .filter(|column| !headers.iter().any(|header| header.as_ref().trim() == column.name))
            .map(|column| column.name.clone())
            .collect()
    }

    /// Entries of `headers` the schema does not know.
    pub fn unknown_columns<S: AsRef<str>>(&self, headers: &[S]) -> Vec<String> {
        headers
            .iter()
            .map(|header| header.as_ref().trim())
            .filter(|header| self.column(header).is_none())
            .map(str::to_string)
            .collect()
    }

    pub fn cell(&self, record: &Record, field: Field) -> String {
        match field {
            Field::Id => record.id().to_string(),
            Field::Date => record.date_string(),
            Field::Venue => record.venue().to_string(),
            Field::Photo => record.photo().to_string(),
            Field::WouldReturn => record.would_return().to_string(),
            Field::Score(reviewer, category) => record
                .entry(reviewer)
                .scores
                .get(category)
                .map(format_number)
                .unwrap_or_else(|| FieldKind::Number.default_cell().to_string()),
            Field::Comment(reviewer) => record.entry(reviewer).comment.clone(),
            Field::Subtotal(reviewer) => format_number(record.entry(reviewer).subtotal),
            Field::Overall => format_number(record.overall()),
        }
    }

    pub fn row(&self, record: &Record) -> Vec<String> {
        self.columns
            .iter()
            .map(|column| self.cell(record, column.field))
            .collect()
    }

    /// Typed JSON object for table backends.
    pub fn json_row(&self, record: &Record) -> Map<String, Value> {
        self.columns
            .iter()
            .map(|column| {
                let cell = self.cell(record, column.field);
                let value = match column.field.kind() {
                    FieldKind::Number => Number::from_f64(parse_score(&cell))
                        .map(Value::Number)
                        .unwrap_or(Value::Null),
                    FieldKind::Flag => Value::Bool(record.would_return()),
                    FieldKind::Date if cell.is_empty() => Value::Null,
                    FieldKind::Text | FieldKind::Date => Value::String(cell),
                };
                (column.name.clone(), value)
            })
            .collect()
    }

    /// Rebuilds a record from raw cells. `lookup` returns the cell for a
    /// column name, or `None` when the source has no such column; absent
    /// columns take the field default and numbers go through `parse_score`.
    pub fn record_from<F>(&self, lookup: F) -> Record
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw = |field: Field| {
            lookup(&self.name_of(field))
                .unwrap_or_else(|| field.kind().default_cell().to_string())
        };

        let date_cell = raw(Field::Date);
        let date = parse_date(&date_cell);
        if date.is_none() && !date_cell.trim().is_empty() {
            warn!(value = %date_cell.trim(), "unparsable date left empty");
        }

        let entry = |reviewer: Reviewer| {
            let cells: Vec<(Category, String)> = Category::ALL
                .iter()
                .map(|category| (*category, raw(Field::Score(reviewer, *category))))
                .collect();
            ReviewerEntry {
                scores: ScoreSet::from_raw(cells.iter().map(|(category, cell)| (*category, cell.as_str()))),
                comment: raw(Field::Comment(reviewer)).trim().to_string(),
                subtotal: parse_score(&raw(Field::Subtotal(reviewer))),
            }
        };

        StoredRecord {
            id: RecordId::from_raw_or_new(&raw(Field::Id)),
            date,
            venue: raw(Field::Venue).trim().to_string(),
            photo: PhotoRef::new(raw(Field::Photo)),
            would_return: parse_flag(&raw(Field::WouldReturn)),
            baba: entry(Reviewer::Baba),
            gokce: entry(Reviewer::Gokce),
            overall: parse_score(&raw(Field::Overall)),
        }
        .into()
    }

    /// Same as `record_from`, reading cells out of a JSON object.
    pub fn record_from_json(&self, row: &Map<String, Value>) -> Record {
        self.record_from(|name| match row.get(name)? {
            Value::Null => None,
            Value::String(value) => Some(value.clone()),
            Value::Bool(value) => Some(value.to_string()),
            Value::Number(value) => Some(value.to_string()),
            other => Some(other.to_string()),
        })
    }
}

/// Integral values print without a fractional part.
pub fn format_number(value: f64) -> String {
    format!("{value}")
}

pub fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_lowercase().as_str(),
        "true" | "1" | "1.0" | "yes" | "y" | "evet" | "✅"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordBuilder;
    use std::collections::HashMap;

    fn sample_record() -> Record {
        RecordBuilder::new("Dükkan")
            .would_return(true)
            .photo(PhotoRef::new("photos/a.jpg"))
            .reviewer(Reviewer::Baba, ScoreSet::from_ratings(&[2, 4, 6, 8, 10, 0]), "sos az")
            .reviewer(Reviewer::Gokce, ScoreSet::from_ratings(&[10; 6]), "")
            .build()
            .unwrap()
    }

    #[test]
    fn test_snake_header_layout() {
        let header = Schema::new(ColumnStyle::Snake).header();
        assert_eq!(header.len(), 5 + 2 * 8 + 1);
        assert_eq!(&header[..5], ["id", "tarih", "mekan", "foto", "yeniden_gider_miyiz"]);
        assert_eq!(header[5], "baba_Ekmek");
        assert_eq!(header[11], "baba_yorum");
        assert_eq!(header[12], "baba_toplam");
        assert_eq!(header[13], "gokce_Ekmek");
        assert_eq!(header.last().unwrap(), "ortalama");
    }

    #[test]
    fn test_titled_header_layout() {
        let header = Schema::new(ColumnStyle::Titled).header();
        assert!(header.contains(&"Gökçe Yan Ürün".to_string()));
        assert!(header.contains(&"Baba Toplam".to_string()));
        assert_eq!(header[1], "Tarih");
    }

    #[test]
    fn test_row_then_record_keeps_fields() {
        let schema = Schema::new(ColumnStyle::Snake);
        let record = sample_record();
        let cells: HashMap<String, String> = schema.header().into_iter().zip(schema.row(&record)).collect();
        let back = schema.record_from(|name| cells.get(name).cloned());
        assert_eq!(back, record);
    }

    #[test]
    fn test_missing_columns_take_defaults() {
        let schema = Schema::new(ColumnStyle::Snake);
        let back = schema.record_from(|name| match name {
            "mekan" => Some("Kasap".to_string()),
            "baba_Ekmek" => Some("6,5".to_string()),
            "ortalama" => Some("abc".to_string()),
            _ => None,
        });
        assert_eq!(back.venue(), "Kasap");
        assert_eq!(back.entry(Reviewer::Baba).scores.get(Category::Bread), Some(6.5));
        assert_eq!(back.entry(Reviewer::Baba).scores.get(Category::Patty), Some(0.0));
        assert_eq!(back.entry(Reviewer::Gokce).comment, "");
        assert_eq!(back.overall(), 0.0);
        assert!(!back.would_return());
        assert!(back.date().is_none());
        assert_eq!(back.id().as_str().len(), 32);
    }

    #[test]
    fn test_detect_style() {
        let titled = Schema::new(ColumnStyle::Titled).header();
        assert_eq!(ColumnStyle::detect(&titled), ColumnStyle::Titled);
        let snake = Schema::new(ColumnStyle::Snake).header();
        assert_eq!(ColumnStyle::detect(&snake), ColumnStyle::Snake);
        assert_eq!(ColumnStyle::detect(&["id", "Mekan", "Tarih"]), ColumnStyle::Titled);
        let empty: [&str; 0] = [];
        assert_eq!(ColumnStyle::detect(&empty), ColumnStyle::Snake);
    }

    #[test]
    fn test_missing_and_unknown_columns() {
        let schema = Schema::new(ColumnStyle::Snake);
        let headers = ["id", "mekan", "semt"];
        let missing = schema.missing_columns(&headers);
        assert!(missing.contains(&"tarih".to_string()));
        assert!(!missing.contains(&"mekan".to_string()));
        assert_eq!(schema.unknown_columns(&headers), vec!["semt".to_string()]);
    }

    #[test]
    fn test_json_row_is_typed() {
        let schema = Schema::new(ColumnStyle::Snake);
        let record = sample_record();
        let row = schema.json_row(&record);
        assert_eq!(row["mekan"], Value::String("Dükkan".to_string()));
        assert_eq!(row["yeniden_gider_miyiz"], Value::Bool(true));
        assert_eq!(row["ortalama"].as_f64(), Some(7.5));
        assert_eq!(schema.record_from_json(&row), record);
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("True"));
        assert!(parse_flag(" evet "));
        assert!(!parse_flag("False"));
        assert!(!parse_flag(""));
    }
}
