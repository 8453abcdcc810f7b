use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::format_description::FormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

use crate::error::ValidationError;
use crate::ids::RecordId;
use crate::scoring::ScoreAggregator;
use crate::types::{PhotoRef, Reviewer, ScoreSet};

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

const ISO_DATE: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// One reviewer's part of a record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewerEntry {
    pub scores: ScoreSet,
    pub comment: String,
    pub subtotal: f64,
}

/// The unit of persistence. Built once, never edited; only removed whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    id: RecordId,
    #[serde(with = "iso_date::option")]
    date: Option<Date>,
    venue: String,
    photo: PhotoRef,
    would_return: bool,
    baba: ReviewerEntry,
    gokce: ReviewerEntry,
    overall: f64,
}

/// Field values read back from storage, before they become a `Record`.
#[derive(Debug, Clone, Default)]
pub struct StoredRecord {
    pub id: RecordId,
    pub date: Option<Date>,
    pub venue: String,
    pub photo: PhotoRef,
    pub would_return: bool,
    pub baba: ReviewerEntry,
    pub gokce: ReviewerEntry,
    pub overall: f64,
}

#[derive(Debug, Clone)]
pub struct RecordBuilder {
    venue: String,
    date: Option<Date>,
    photo: PhotoRef,
    would_return: bool,
    entries: BTreeMap<Reviewer, (ScoreSet, String)>,
}

impl Record {
    pub fn id(&self) -> &RecordId {
        &self.id
    }

    pub fn date(&self) -> Option<Date> {
        self.date
    }

    pub fn date_string(&self) -> String {
        self.date.map(format_date).unwrap_or_default()
    }

    pub fn venue(&self) -> &str {
        &self.venue
    }

    pub fn photo(&self) -> &PhotoRef {
        &self.photo
    }

    pub fn would_return(&self) -> bool {
        self.would_return
    }

    pub fn entry(&self, reviewer: Reviewer) -> &ReviewerEntry {
        match reviewer {
            Reviewer::Baba => &self.baba,
            Reviewer::Gokce => &self.gokce,
        }
    }

    pub fn overall(&self) -> f64 {
        self.overall
    }

    /// Subtotals and overall recomputed from the per-category scores.
    pub fn recomputed(&self) -> (f64, f64, f64) {
        let baba = ScoreAggregator::subtotal(&self.baba.scores);
        let gokce = ScoreAggregator::subtotal(&self.gokce.scores);
        (baba, gokce, ScoreAggregator::overall(baba, gokce))
    }

    /// True when the stored averages match what the scores produce.
    pub fn is_consistent(&self) -> bool {
        let (baba, gokce, overall) = self.recomputed();
        baba == self.baba.subtotal && gokce == self.gokce.subtotal && overall == self.overall
    }
}

impl From<StoredRecord> for Record {
    fn from(stored: StoredRecord) -> Self {
        Self {
            id: stored.id,
            date: stored.date,
            venue: stored.venue,
            photo: stored.photo,
            would_return: stored.would_return,
            baba: stored.baba,
            gokce: stored.gokce,
            overall: stored.overall,
        }
    }
}

impl RecordBuilder {
    pub fn new(venue: impl Into<String>) -> Self {
        Self {
            venue: venue.into(),
            date: None,
            photo: PhotoRef::empty(),
            would_return: false,
            entries: BTreeMap::new(),
        }
    }

    pub fn date(mut self, date: Date) -> Self {
        self.date = Some(date);
        self
    }

    pub fn photo(mut self, photo: PhotoRef) -> Self {
        self.photo = photo;
        self
    }

    pub fn would_return(mut self, would_return: bool) -> Self {
        self.would_return = would_return;
        self
    }

    pub fn reviewer(mut self, reviewer: Reviewer, scores: ScoreSet, comment: impl Into<String>) -> Self {
        self.entries.insert(reviewer, (scores, comment.into()));
        self
    }

    /// The venue name is the only required field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.venue.trim().is_empty() {
            return Err(ValidationError::VenueRequired);
        }
        Ok(())
    }

    /// Validates the draft and computes every derived average.
    pub fn build(mut self) -> Result<Record, ValidationError> {
        self.validate()?;
        let venue = self.venue.trim().to_string();

        let baba = entry_for(self.entries.remove(&Reviewer::Baba));
        let gokce = entry_for(self.entries.remove(&Reviewer::Gokce));
        let overall = ScoreAggregator::overall(baba.subtotal, gokce.subtotal);

        Ok(Record {
            id: RecordId::new(),
            date: Some(self.date.unwrap_or_else(today)),
            venue,
            photo: self.photo,
            would_return: self.would_return,
            baba,
            gokce,
            overall,
        })
    }
}

fn entry_for(input: Option<(ScoreSet, String)>) -> ReviewerEntry {
    let (scores, comment) = input.unwrap_or_default();
    let scores = scores.completed();
    let subtotal = ScoreAggregator::subtotal(&scores);
    ReviewerEntry {
        scores,
        comment: comment.trim().to_string(),
        subtotal,
    }
}

pub fn today() -> Date {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date()
}

pub fn format_date(date: Date) -> String {
    date.format(ISO_DATE).unwrap_or_default()
}

/// Parses `YYYY-MM-DD`, ignoring any trailing time part such as
/// `2024-05-01 00:00:00` or `2024-05-01T12:00`.
pub fn parse_date(raw: &str) -> Option<Date> {
    let trimmed = raw.trim();
    let day = trimmed.split(|c| c == ' ' || c == 'T').next().unwrap_or(trimmed);
    Date::parse(day, ISO_DATE).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Month;

    fn scenario_builder() -> RecordBuilder {
        RecordBuilder::new("  Köfteci Ali ")
            .date(Date::from_calendar_date(2024, Month::May, 1).unwrap())
            .reviewer(Reviewer::Baba, ScoreSet::from_ratings(&[2, 4, 6, 8, 10, 0]), " iyi ")
            .reviewer(Reviewer::Gokce, ScoreSet::from_ratings(&[10; 6]), "harika")
    }

    #[test]
    fn test_build_computes_averages() {
        let record = scenario_builder().build().unwrap();
        assert_eq!(record.venue(), "Köfteci Ali");
        assert_eq!(record.entry(Reviewer::Baba).subtotal, 5.0);
        assert_eq!(record.entry(Reviewer::Gokce).subtotal, 10.0);
        assert_eq!(record.overall(), 7.5);
        assert_eq!(record.entry(Reviewer::Baba).comment, "iyi");
        assert_eq!(record.date_string(), "2024-05-01");
        assert!(record.photo().is_empty());
        assert!(record.is_consistent());
    }

    #[test]
    fn test_overall_matches_aggregator() {
        let baba = ScoreSet::from_ratings(&[7, 3, 9, 1, 5, 8]);
        let gokce = ScoreSet::from_ratings(&[4, 4, 6, 2, 9, 10]);
        let record = RecordBuilder::new("Burger Lab")
            .reviewer(Reviewer::Baba, baba.clone(), "")
            .reviewer(Reviewer::Gokce, gokce.clone(), "")
            .build()
            .unwrap();
        let expected = ScoreAggregator::overall(
            ScoreAggregator::subtotal(&baba),
            ScoreAggregator::subtotal(&gokce),
        );
        assert_eq!(record.overall(), expected);
    }

    #[test]
    fn test_blank_venue_rejected() {
        for venue in ["", "   ", "\t\n"] {
            assert!(RecordBuilder::new(venue).validate().is_err());
            let result = RecordBuilder::new(venue).build();
            assert_eq!(result.unwrap_err(), ValidationError::VenueRequired);
        }
        assert_eq!(ValidationError::VenueRequired.to_string(), "venue name required");
    }

    #[test]
    fn test_missing_reviewer_defaults_to_zero() {
        let record = RecordBuilder::new("Solo")
            .reviewer(Reviewer::Baba, ScoreSet::from_ratings(&[8; 6]), "")
            .build()
            .unwrap();
        assert_eq!(record.entry(Reviewer::Gokce).subtotal, 0.0);
        assert_eq!(record.overall(), 4.0);
    }

    #[test]
    fn test_date_defaults_to_today() {
        let record = RecordBuilder::new("Today").build().unwrap();
        assert!(record.date().is_some());
    }

    #[test]
    fn test_ids_are_fresh() {
        let a = scenario_builder().build().unwrap();
        let b = scenario_builder().build().unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_parse_date_accepts_time_suffix() {
        let expected = Date::from_calendar_date(2023, Month::December, 31).unwrap();
        assert_eq!(parse_date("2023-12-31"), Some(expected));
        assert_eq!(parse_date("2023-12-31 00:00:00"), Some(expected));
        assert_eq!(parse_date("2023-12-31T08:15"), Some(expected));
        assert_eq!(parse_date("31.12.2023"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_record_json_uses_iso_date() {
        let record = scenario_builder().build().unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["date"], "2024-05-01");
        let back: Record = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
