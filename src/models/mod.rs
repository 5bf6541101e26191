pub mod study;

pub use study::{ReportReference, StudySummary};
