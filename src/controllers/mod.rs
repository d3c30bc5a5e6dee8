pub mod bookings;
pub mod rooms;
pub mod seats;
pub mod showtimes;

use axum::Router;
use std::sync::Arc;

pub fn routes() -> Router<Arc<crate::AppState>> {
    Router::new()
        .merge(rooms::routes())
        .merge(showtimes::routes())
        .merge(seats::routes())
        .merge(bookings::routes())
}
