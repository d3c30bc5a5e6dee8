use crate::{database::Database, redis_client::RedisClient};

pub mod showtimes;

/// Redis-backed read cache. Scope is deliberately narrow: only the upcoming
/// showtime listing is cached. Seat and ticket state is never cached - the
/// seat map must always reflect the latest committed tickets.
#[derive(Clone)]
pub struct CacheService {
    redis: RedisClient,
    db: Database,
    listing_ttl_secs: u64,
}

impl CacheService {
    pub fn new(redis: RedisClient, db: Database, listing_ttl_secs: u64) -> Self {
        Self {
            redis,
            db,
            listing_ttl_secs,
        }
    }
}
