mod record_filter;
mod review_scope;

pub use record_filter::{DepartmentFilter, RecordFilter};
pub use review_scope::ReviewScope;
