pub mod classify;
pub mod consolidate;
pub mod customer_pipeline;
pub mod etl;
pub mod join;
pub mod json_doc;
pub mod mapping;
pub mod normalize;
pub mod profile_pipeline;
pub mod project;
pub mod staging_pipeline;

pub use crate::domain::model::{
    Category, CategoryBreakdown, ColumnType, ColumnTypes, ExtractBatch, LoadSummary, Record,
    TransformResult,
};
pub use crate::domain::ports::{DestinationStore, Pipeline, SourceStore, StagingStore};
pub use crate::utils::error::Result;
