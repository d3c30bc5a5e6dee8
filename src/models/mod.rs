pub mod booking;
pub mod movie;
pub mod room;
pub mod seat;
pub mod showtime;

pub use booking::{Booking, BookingStatus, Ticket};
pub use movie::Movie;
pub use room::Room;
pub use seat::Seat;
pub use showtime::Showtime;
