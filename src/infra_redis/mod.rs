mod redis_kv_store;

pub use redis_kv_store::*;
