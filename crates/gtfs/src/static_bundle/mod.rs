mod builder;
mod zip_writer;

pub use builder::{build, StaticBundle};
pub use zip_writer::to_zip_bytes;
