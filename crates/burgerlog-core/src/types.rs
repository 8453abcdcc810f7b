use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::scoring::parse_score;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Bread,
    Patty,
    Sauce,
    Side,
    Ambience,
    Value,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Reviewer {
    Baba,
    Gokce,
}

/// One reviewer's ratings for one record, keyed by category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreSet {
    values: BTreeMap<Category, f64>,
}

/// Stored photo location. Empty means "no photo"; it is never null so every
/// storage row carries the column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhotoRef(String);

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Bread,
        Category::Patty,
        Category::Sauce,
        Category::Side,
        Category::Ambience,
        Category::Value,
    ];

    /// Label used in column names and on cards.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Bread => "Ekmek",
            Category::Patty => "Köfte",
            Category::Sauce => "Sos",
            Category::Side => "Yan Ürün",
            Category::Ambience => "Ortam/Servis/Sunum",
            Category::Value => "Fiyat/Performans",
        }
    }
}

impl Reviewer {
    pub const ALL: [Reviewer; 2] = [Reviewer::Baba, Reviewer::Gokce];

    pub fn label(&self) -> &'static str {
        match self {
            Reviewer::Baba => "Baba",
            Reviewer::Gokce => "Gökçe",
        }
    }

    /// ASCII prefix used by snake_case columns.
    pub fn key(&self) -> &'static str {
        match self {
            Reviewer::Baba => "baba",
            Reviewer::Gokce => "gokce",
        }
    }
}

impl ScoreSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from ratings in `Category::ALL` order. Extra values are
    /// ignored, missing ones stay unset.
    pub fn from_ratings(ratings: &[u8]) -> Self {
        let values = Category::ALL
            .iter()
            .zip(ratings)
            .map(|(category, rating)| (*category, f64::from(*rating)))
            .collect();
        Self { values }
    }

    /// Builds a set from raw cells, coercing each with the best-effort parse.
    pub fn from_raw<'a, I>(cells: I) -> Self
    where
        I: IntoIterator<Item = (Category, &'a str)>,
    {
        let values = cells
            .into_iter()
            .map(|(category, raw)| (category, parse_score(raw)))
            .collect();
        Self { values }
    }

    /// Fills every unset category with 0.
    pub fn completed(mut self) -> Self {
        for category in Category::ALL {
            self.values.entry(category).or_insert(0.0);
        }
        self
    }

    pub fn set(&mut self, category: Category, value: f64) {
        self.values.insert(category, value);
    }

    pub fn get(&self, category: Category) -> Option<f64> {
        self.values.get(&category).copied()
    }

    /// Value used for averaging: unset categories count as zero.
    pub fn value_or_zero(&self, category: Category) -> f64 {
        self.get(category).unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, f64)> + '_ {
        self.values.iter().map(|(category, value)| (*category, *value))
    }
}

impl PhotoRef {
    pub fn empty() -> Self {
        Self(String::new())
    }

    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into().trim().to_string())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Reviewer {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "baba" => Ok(Reviewer::Baba),
            "gokce" | "gökçe" => Ok(Reviewer::Gokce),
            _ => Err(format!("unknown reviewer: {value}")),
        }
    }
}

impl fmt::Display for Reviewer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl fmt::Display for PhotoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_labels_are_distinct() {
        let mut labels: Vec<&str> = Category::ALL.iter().map(|c| c.label()).collect();
        labels.sort();
        labels.dedup();
        assert_eq!(labels.len(), 6);
    }

    #[test]
    fn test_score_set_from_ratings() {
        let scores = ScoreSet::from_ratings(&[2, 4, 6]);
        assert_eq!(scores.get(Category::Bread), Some(2.0));
        assert_eq!(scores.get(Category::Sauce), Some(6.0));
        assert_eq!(scores.get(Category::Side), None);
        assert_eq!(scores.value_or_zero(Category::Side), 0.0);
    }

    #[test]
    fn test_completed_fills_zeros() {
        let scores = ScoreSet::from_ratings(&[9]).completed();
        assert_eq!(scores.iter().count(), 6);
        assert_eq!(scores.get(Category::Bread), Some(9.0));
        assert_eq!(scores.get(Category::Value), Some(0.0));
    }

    #[test]
    fn test_score_set_from_raw_coerces() {
        let scores = ScoreSet::from_raw([(Category::Bread, "7,5"), (Category::Patty, "n/a")]);
        assert_eq!(scores.get(Category::Bread), Some(7.5));
        assert_eq!(scores.get(Category::Patty), Some(0.0));
    }

    #[test]
    fn test_reviewer_parse() {
        assert_eq!("Gökçe".parse::<Reviewer>().unwrap(), Reviewer::Gokce);
        assert_eq!("BABA".parse::<Reviewer>().unwrap(), Reviewer::Baba);
        assert!("someone".parse::<Reviewer>().is_err());
    }

    #[test]
    fn test_photo_ref_trims() {
        assert!(PhotoRef::new("   ").is_empty());
        assert_eq!(PhotoRef::new(" photos/a.jpg ").as_str(), "photos/a.jpg");
    }
}
