pub mod review_handler;

pub use review_handler::{
    __path_export_records, __path_get_stats, __path_list_records, export_records, get_stats,
    list_records,
};
