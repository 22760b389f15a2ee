pub mod form_assembler;
pub mod navigator;
pub mod presenter;
pub mod submission_sink;

pub use form_assembler::{assemble, CheckGroup, ReviewForm};
pub use navigator::{FilterKey, Navigator, Progress};
pub use presenter::{present, DocumentRoots, ItemView, ResolvedDocument};
pub use submission_sink::SubmissionSink;
