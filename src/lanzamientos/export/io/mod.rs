pub mod csv_export;
pub mod excel_read;
pub mod json_export;
pub mod manifest;
