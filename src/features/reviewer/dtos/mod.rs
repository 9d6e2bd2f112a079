mod review_dto;

pub use review_dto::{RecordQueryDto, ReviewStatsDto};
