#![allow(dead_code)]

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use liminaldb::auth::{AuthError, Credential, PollClock, TokenStore};

#[derive(Default)]
pub struct InMemoryTokenStore {
    credential: Mutex<Option<Credential>>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, credential: Credential) {
        *self.credential.lock().expect("store lock poisoned") = Some(credential);
    }

    pub fn get(&self) -> Option<Credential> {
        self.credential.lock().expect("store lock poisoned").clone()
    }
}

impl TokenStore for InMemoryTokenStore {
    fn load(&self) -> Result<Option<Credential>, AuthError> {
        Ok(self.get())
    }

    fn save(&self, credential: &Credential) -> Result<(), AuthError> {
        self.seed(credential.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), AuthError> {
        *self.credential.lock().expect("store lock poisoned") = None;
        Ok(())
    }
}

/// Virtual clock: `sleep` records the duration and advances `now` instantly.
pub struct FakeClock {
    now: Mutex<DateTime<Utc>>,
    sleeps: Mutex<Vec<Duration>>,
}

impl FakeClock {
    pub fn new() -> Self {
        Self::starting_at(epoch())
    }

    pub fn starting_at(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
            sleeps: Mutex::new(Vec::new()),
        }
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().expect("clock lock poisoned").clone()
    }

    pub fn total_slept(&self) -> Duration {
        self.sleeps().iter().sum()
    }
}

#[async_trait]
impl PollClock for FakeClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock lock poisoned")
    }

    async fn sleep(&self, duration: Duration) {
        self.sleeps
            .lock()
            .expect("clock lock poisoned")
            .push(duration);
        let mut now = self.now.lock().expect("clock lock poisoned");
        *now += chrono::Duration::from_std(duration).expect("duration in range");
    }
}

/// Fixed starting instant for virtual clocks.
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
}

pub fn credential(access_token: &str) -> Credential {
    Credential {
        access_token: access_token.to_string(),
        refresh_token: None,
        expires_at: None,
    }
}

pub fn credential_expiring(access_token: &str, expires_at: DateTime<Utc>) -> Credential {
    Credential {
        expires_at: Some(expires_at),
        ..credential(access_token)
    }
}
