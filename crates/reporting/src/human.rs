use burgerlog_core::schema::format_number;
use burgerlog_core::{Category, Record, Reviewer};

use crate::redact::redact_path;

/// Multi-line card for one record.
pub fn card(record: &Record) -> String {
    let photo = if record.photo().is_empty() {
        "Fotoğraf yok".to_string()
    } else {
        redact_path(std::path::Path::new(record.photo().as_str()))
    };
    let again = if record.would_return() { "✅ Evet" } else { "❌ Hayır" };

    let mut lines = vec![
        format!("{}  [{}]", record.venue(), record.id()),
        format!("Tarih: {}  •  Foto: {}", record.date_string(), photo),
        format!("Yeniden gider miyiz? {again}"),
    ];
    for reviewer in Reviewer::ALL {
        let entry = record.entry(reviewer);
        let scores: Vec<String> = Category::ALL
            .iter()
            .map(|category| {
                let value = entry.scores.get(*category).unwrap_or(0.0);
                format!("{}: {}", category.label(), format_number(value))
            })
            .collect();
        lines.push(format!("{} Toplam: {}", reviewer.label(), format_number(entry.subtotal)));
        lines.push(format!("  {}", scores.join(", ")));
        if !entry.comment.is_empty() {
            lines.push(format!("  Yorum: {}", entry.comment));
        }
    }
    lines.push(format!("Ortalama: {}", format_number(record.overall())));
    lines.join("\n")
}

/// One line per record: date, overall, both subtotals, venue, id.
pub fn table(records: &[Record]) -> String {
    if records.is_empty() {
        return "Kayıt yok.".to_string();
    }
    let mut lines = vec![format!(
        "{:<10}  {:>8}  {:>6}  {:>6}  {:<24}  {}",
        "Tarih",
        "Ortalama",
        Reviewer::Baba.label(),
        Reviewer::Gokce.label(),
        "Mekan",
        "id"
    )];
    for record in records {
        lines.push(format!(
            "{:<10}  {:>8}  {:>6}  {:>6}  {:<24}  {}",
            record.date_string(),
            format_number(record.overall()),
            format_number(record.entry(Reviewer::Baba).subtotal),
            format_number(record.entry(Reviewer::Gokce).subtotal),
            truncate(record.venue(), 24),
            record.id()
        ));
    }
    lines.join("\n")
}

/// Live preview shown while entering a record.
pub fn preview(baba: f64, gokce: f64, overall: f64) -> String {
    format!(
        "Genel Ortalama: {}  |  {}: {} • {}: {}",
        format_number(overall),
        Reviewer::Baba.label(),
        format_number(baba),
        Reviewer::Gokce.label(),
        format_number(gokce)
    )
}

pub fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_string();
    }
    let mut shortened: String = value.chars().take(max.saturating_sub(1)).collect();
    shortened.push('…');
    shortened
}
