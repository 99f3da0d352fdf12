//! Live room membership

mod index;

pub use index::RoomIndex;
