pub mod export;
pub mod import;

pub use export::{csv_string, export_to_csv, json_string, write_csv, ExportError, CSV_HEADER};
pub use import::{read_price_list, read_price_list_file, ImportError, ImportReport};
