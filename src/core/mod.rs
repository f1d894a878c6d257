pub mod etl;
pub mod extract_job;
pub mod handler;
pub mod load_job;
pub mod transform;

#[cfg(test)]
pub(crate) mod testing;

pub use crate::domain::model::{Cell, RecordSet};
pub use crate::domain::ports::{BlobStore, ConfigProvider, SheetSource, TableLoader};
pub use crate::utils::error::Result;
