pub mod booking;
pub mod layout;
pub mod scheduler;
pub mod seat_map;
