pub mod collectors;
pub mod render;
pub mod report;

pub use render::{Report, CLIENTS_HEADER, FIELD_SEPARATOR, QUEUES_HEADER};
pub use report::{build, join, progress, ReportParent, ReportRow, ReportSubscription};
