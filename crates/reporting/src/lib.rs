use serde::{Deserialize, Serialize};

use burgerlog_core::schema::format_number;
use burgerlog_core::scoring::mean;
use burgerlog_core::{Record, Reviewer};

pub mod human;
pub mod json;
pub mod redact;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopVenue {
    pub venue: String,
    pub date: String,
    pub overall: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerStats {
    pub total_records: u32,
    pub would_return: u32,
    pub with_photo: u32,
    pub mean_overall: f64,
    pub mean_baba: f64,
    pub mean_gokce: f64,
    pub best: Option<TopVenue>,
    pub inconsistent: u32,
}

impl LedgerStats {
    pub fn from_records(records: &[Record]) -> Self {
        let mut stats = LedgerStats {
            total_records: 0,
            would_return: 0,
            with_photo: 0,
            mean_overall: 0.0,
            mean_baba: 0.0,
            mean_gokce: 0.0,
            best: None,
            inconsistent: 0,
        };

        for record in records {
            stats.total_records = stats.total_records.saturating_add(1);
            if record.would_return() {
                stats.would_return = stats.would_return.saturating_add(1);
            }
            if !record.photo().is_empty() {
                stats.with_photo = stats.with_photo.saturating_add(1);
            }
            if !record.is_consistent() {
                stats.inconsistent = stats.inconsistent.saturating_add(1);
            }
            let better = stats
                .best
                .as_ref()
                .map(|best| record.overall() > best.overall)
                .unwrap_or(true);
            if better {
                stats.best = Some(TopVenue {
                    venue: record.venue().to_string(),
                    date: record.date_string(),
                    overall: record.overall(),
                });
            }
        }

        let overall: Vec<f64> = records.iter().map(Record::overall).collect();
        let subtotals = |reviewer: Reviewer| -> Vec<f64> {
            records.iter().map(|record| record.entry(reviewer).subtotal).collect()
        };
        stats.mean_overall = mean(&overall);
        stats.mean_baba = mean(&subtotals(Reviewer::Baba));
        stats.mean_gokce = mean(&subtotals(Reviewer::Gokce));
        stats
    }

    pub fn human_summary(&self) -> String {
        if self.total_records == 0 {
            return "Henüz kayıt yok.".to_string();
        }
        let mut summary = format!(
            "{total} kayıt, genel ortalama {overall}.\n{baba}: {mean_baba} • {gokce}: {mean_gokce}\nYeniden gideriz: {again} • Fotoğraflı: {photos}",
            total = self.total_records,
            overall = format_number(self.mean_overall),
            baba = Reviewer::Baba.label(),
            mean_baba = format_number(self.mean_baba),
            gokce = Reviewer::Gokce.label(),
            mean_gokce = format_number(self.mean_gokce),
            again = self.would_return,
            photos = self.with_photo,
        );
        if let Some(best) = &self.best {
            summary.push_str(&format!(
                "\nEn iyisi: {} ({}), {}",
                best.venue,
                format_number(best.overall),
                best.date
            ));
        }
        if self.inconsistent > 0 {
            summary.push_str(&format!(
                "\n{} kaydın kayıtlı ortalamaları puanlarla uyuşmuyor.",
                self.inconsistent
            ));
        }
        summary
    }
}
