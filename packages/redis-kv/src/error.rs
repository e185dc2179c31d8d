#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Unknown pool tag: {tag}")]
    UnknownTag { tag: String },

    #[error("Pool checkout error: {0}")]
    Checkout(#[from] r2d2::Error),

    #[error("Redis command error: {0}")]
    Command(#[from] redis::RedisError),
}
