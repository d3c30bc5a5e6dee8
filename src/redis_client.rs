use redis::{aio::MultiplexedConnection, Client};

/// One multiplexed Redis connection behind a cheap `Clone`; every cache call
/// clones the handle instead of pooling.
#[derive(Clone)]
pub struct RedisClient {
    pub conn: MultiplexedConnection,
}

impl RedisClient {
    pub async fn new(redis_url: &str) -> redis::RedisResult<Self> {
        let client = Client::open(redis_url)?;
        let mut conn = client.get_multiplexed_tokio_connection().await?;

        // Fail at startup on a bad URL rather than at the first cache read.
        let _: () = redis::cmd("PING").query_async(&mut conn).await?;

        Ok(RedisClient { conn })
    }
}
