pub mod file;

pub use file::{File, FileData};
