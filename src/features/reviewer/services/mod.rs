mod csv_export;
mod review_service;

pub use review_service::ReviewService;
