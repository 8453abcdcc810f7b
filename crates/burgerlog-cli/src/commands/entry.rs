use std::path::PathBuf;

use anyhow::Result;
use time::Date;

use burgerlog_core::record::parse_date;
use burgerlog_core::{Category, PhotoRef, RecordBuilder, Reviewer, ScoreSet};
use reporting::human;

use crate::commands::Session;

/// Six ratings in category order, each 0-10.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ratings(pub [u8; 6]);

#[derive(Debug)]
pub struct EntryInputs {
    pub venue: String,
    pub date: Option<Date>,
    pub photo: Option<PathBuf>,
    pub would_return: bool,
    pub baba: Ratings,
    pub baba_comment: String,
    pub gokce: Ratings,
    pub gokce_comment: String,
    pub dry_run: bool,
}

impl Ratings {
    pub fn scores(&self) -> ScoreSet {
        ScoreSet::from_ratings(&self.0)
    }
}

pub fn parse_ratings(value: &str) -> Result<Ratings, String> {
    let parts: Vec<&str> = value
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .collect();
    if parts.len() != Category::ALL.len() {
        return Err(format!(
            "expected {} ratings ({}), got {}",
            Category::ALL.len(),
            Category::ALL.map(|category| category.label()).join(", "),
            parts.len()
        ));
    }
    let mut ratings = [0u8; 6];
    for (slot, part) in ratings.iter_mut().zip(&parts) {
        let rating: u8 = part
            .parse()
            .map_err(|_| format!("rating must be a whole number: {part}"))?;
        if rating > 10 {
            return Err(format!("rating out of range 0-10: {rating}"));
        }
        *slot = rating;
    }
    Ok(Ratings(ratings))
}

pub fn parse_date_arg(value: &str) -> Result<Date, String> {
    parse_date(value).ok_or_else(|| format!("expected YYYY-MM-DD, got {value}"))
}

fn draft(inputs: &EntryInputs) -> RecordBuilder {
    let mut builder = RecordBuilder::new(inputs.venue.clone())
        .would_return(inputs.would_return)
        .reviewer(Reviewer::Baba, inputs.baba.scores(), inputs.baba_comment.clone())
        .reviewer(Reviewer::Gokce, inputs.gokce.scores(), inputs.gokce_comment.clone());
    if let Some(date) = inputs.date {
        builder = builder.date(date);
    }
    builder
}

pub fn execute(session: &Session, inputs: EntryInputs) -> Result<()> {
    let builder = draft(&inputs);
    builder.validate()?;

    if inputs.dry_run {
        let record = builder.build()?;
        println!(
            "{}",
            human::preview(
                record.entry(Reviewer::Baba).subtotal,
                record.entry(Reviewer::Gokce).subtotal,
                record.overall()
            )
        );
        return Ok(());
    }

    // Photo is stored only once the draft is known to be valid.
    let photo = match &inputs.photo {
        Some(source) => session.gallery().save(source),
        None => PhotoRef::empty(),
    };
    if inputs.photo.is_some() && photo.is_empty() {
        println!("Fotoğraf okunamadı, kayıt fotoğrafsız eklendi.");
    }
    let record = builder.photo(photo).build()?;

    let mut ledger = session.ledger()?;
    ledger.append(record.clone())?;

    println!(
        "{}",
        human::preview(
            record.entry(Reviewer::Baba).subtotal,
            record.entry(Reviewer::Gokce).subtotal,
            record.overall()
        )
    );
    println!("Kayıt eklendi ✅ ({})", record.id());
    Ok(())
}
