// =============================================================================
// LOCALE FORMATS
// =============================================================================

/// Calendar date format used on attendance records and filter comparisons (e.g. `3/7/2026`)
pub const DATE_FORMAT: &str = "%-m/%-d/%Y";

/// Time-of-day format used on attendance records (e.g. `9:05:42 AM`)
pub const TIME_FORMAT: &str = "%-I:%M:%S %p";

/// Number of decimals kept when a verified coordinate is written to a record
pub const COORDINATE_DECIMALS: usize = 6;

// =============================================================================
// DEMO PROFILES
// =============================================================================

/// Subject id assigned to claimants who log in without registering
pub const DEMO_SUBJECT_ID: &str = "STU001";

/// Reviewer id assigned to reviewers who log in without registering
pub const DEMO_REVIEWER_ID: &str = "TCH001";

// =============================================================================
// REVIEW FILTERS
// =============================================================================

/// Department selector value that disables the department re-filter
pub const DEPARTMENT_FILTER_ALL: &str = "All";
