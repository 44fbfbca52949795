pub mod building;
pub mod slot;
pub mod status;

pub use building::{Building, Coords, Position, Room};
pub use slot::Slot;
pub use status::Status;
