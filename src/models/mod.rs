pub mod catalog;
pub mod loaders;
pub mod review;

pub use catalog::{Catalog, CatalogItem, MetadataIndex, SourceMetadata};
pub use loaders::{load_cached, load_catalog, CatalogPaths};
pub use review::{
    AnalyzeRecord, Citation, Grading, MetaHuman, SourceRef, SubmissionRecord, TimedSubmission,
};
