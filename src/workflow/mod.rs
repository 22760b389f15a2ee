pub mod analyze_session;
pub mod review_session;

pub use analyze_session::AnalyzeSession;
pub use review_session::ReviewSession;
