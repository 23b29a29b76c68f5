pub mod csv_loader;
pub mod parquet_writer;
pub mod storage_manager;

pub use csv_loader::*;
pub use parquet_writer::*;
pub use storage_manager::*;
