pub mod list;
pub mod roll;
