#![allow(dead_code)]

use rolsa::config::{Config, HashingConfig};
use rolsa::db::{NewUser, User};
use rolsa::{PasswordHasher, Storage};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

/// A throwaway SQLite file with the schema already created.
pub struct TestDb {
    pub storage: Storage,
    pub database_url: String,
    path: PathBuf,
}

impl Drop for TestDb {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm", "-journal"] {
            let _ = std::fs::remove_file(format!("{}{suffix}", self.path.display()));
        }
    }
}

pub fn temp_database_url(tag: &str) -> (String, PathBuf) {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();

    let mut temp_path = std::env::temp_dir();
    temp_path.push(format!(
        "rolsa-{tag}-{}-{}.sqlite",
        std::process::id(),
        nanos
    ));
    (format!("sqlite:{}", temp_path.display()), temp_path)
}

pub async fn test_db(tag: &str) -> TestDb {
    let (database_url, path) = temp_database_url(tag);
    let storage = Storage::connect(&database_url)
        .await
        .expect("failed to open test database");
    storage.create_all().await.expect("failed to create schema");
    TestDb {
        storage,
        database_url,
        path,
    }
}

/// Cheap Argon2 parameters so tests stay fast.
pub fn fast_hashing() -> HashingConfig {
    HashingConfig {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    }
}

pub fn hasher() -> PasswordHasher {
    PasswordHasher::from_config(&fast_hashing()).expect("valid hashing params")
}

pub fn test_config(database_url: &str) -> Config {
    let mut cfg = Config::default();
    cfg.basic.database_url = database_url.to_string();
    cfg.hashing = fast_hashing();
    cfg
}

pub fn new_user(email: &str) -> NewUser {
    let mut user = NewUser::new("Test Customer", email);
    user.set_password(&hasher(), "secret123")
        .expect("hashing should succeed");
    user
}

pub async fn insert_user(storage: &Storage, email: &str) -> User {
    storage
        .create_user(new_user(email))
        .await
        .expect("failed to create user")
}
