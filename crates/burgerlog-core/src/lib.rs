pub mod config;
pub mod error;
pub mod ids;
pub mod paths;
pub mod record;
pub mod schema;
pub mod scoring;
pub mod types;

pub use config::{BackendKind, Config, ConfigPaths, LedgerOrder};
pub use error::{BurgerLogError, ValidationError};
pub use ids::RecordId;
pub use record::{Record, RecordBuilder, ReviewerEntry};
pub use schema::{ColumnStyle, Field, FieldKind, Schema};
pub use scoring::ScoreAggregator;
pub use types::{Category, PhotoRef, Reviewer, ScoreSet};
