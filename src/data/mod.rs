//! Housing records: typed categories, one-hot encoding and CSV loading.

pub mod house;
pub mod loader;

pub use house::{House, HouseType, WallColor, NUM_TYPES};
pub use loader::{load_csv, read_csv, Dataset};
