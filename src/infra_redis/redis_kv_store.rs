use crate::domain_port::*;
use redis::{Commands, Connection};
use std::sync::Mutex;

/// [`KvStore`] on a Redis server, shared by every process using the same prefix.
pub struct RedisKvStore {
    conn: Mutex<Connection>,
    prefix: String,
}

impl RedisKvStore {
    pub fn new(conn: Connection, prefix: impl Into<String>) -> Self {
        RedisKvStore {
            conn: Mutex::new(conn),
            prefix: prefix.into(),
        }
    }

    pub fn connect(dsn: &str, prefix: impl Into<String>) -> anyhow::Result<Self> {
        let client = redis::Client::open(dsn)?;
        let conn = client.get_connection()?;
        Ok(Self::new(conn, prefix))
    }

    fn key(&self, key: &str) -> String {
        format!("{}:{}", self.prefix, key)
    }
}

impl KvStore for RedisKvStore {
    fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        let key = self.key(key);
        let mut conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        let val: Option<String> = conn
            .get(&key)
            .map_err(|e| KvError::Unavailable(e.to_string()))?;
        Ok(val)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), KvError> {
        let key = self.key(key);
        let mut conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        let _: () = conn
            .set(&key, value)
            .map_err(|e| KvError::Unavailable(e.to_string()))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), KvError> {
        let key = self.key(key);
        let mut conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        let _: () = conn
            .del(&key)
            .map_err(|e| KvError::Unavailable(e.to_string()))?;
        Ok(())
    }
}
