//! Shared test utilities for habit-streak integration tests

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::thread::JoinHandle;

use chrono::{TimeZone, Utc};
use tempfile::TempDir;

use habit_streak::progress::FixedClock;
use habit_streak::server::{ApiServer, ApiState, ShutdownHandle};
use habit_streak::store::HabitDb;
use habit_streak::{HabitTracker, HabitView, NewHabit, NewUser, UserProfile};

/// "Today" for every test tracker
pub const TODAY: &str = "2024-03-15";

/// Tracker over an on-disk database in a temp dir.
///
/// Keep the `TempDir` alive for as long as the tracker is used.
pub fn test_tracker() -> (TempDir, HabitTracker) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let tracker = open_tracker(&dir);
    (dir, tracker)
}

/// Open (or reopen) the tracker database inside `dir`
pub fn open_tracker(dir: &TempDir) -> HabitTracker {
    let db = HabitDb::open(&dir.path().join("habits.db")).expect("Failed to open habit db");
    let noon = Utc
        .with_ymd_and_hms(2024, 3, 15, 12, 0, 0)
        .single()
        .expect("valid instant");
    HabitTracker::new(db, Arc::new(FixedClock::new(noon))).with_bcrypt_cost(4)
}

pub fn register(tracker: &HabitTracker, username: &str) -> UserProfile {
    tracker
        .register(NewUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password: "secret123".to_string(),
        })
        .expect("Failed to register user")
}

pub fn create_habit(tracker: &HabitTracker, user_id: i64, name: &str) -> HabitView {
    tracker
        .create_habit(NewHabit {
            user_id,
            name: name.to_string(),
            description: None,
            category: None,
            color: None,
        })
        .expect("Failed to create habit")
}

/// API server on a free local port
pub struct TestServer {
    pub addr: SocketAddr,
    shutdown: ShutdownHandle,
    thread: Option<JoinHandle<()>>,
}

impl TestServer {
    pub fn start(tracker: HabitTracker, api_token: &str) -> Self {
        let state = ApiState {
            tracker: Arc::new(tracker),
            api_token: api_token.to_string(),
            allowed_origin: "http://localhost:4200".to_string(),
        };
        let server = ApiServer::bind("127.0.0.1:0", state).expect("Failed to bind test server");
        let addr = server.local_addr().expect("Server has no IP address");
        let shutdown = server.shutdown_handle();
        let thread = Some(server.spawn());
        Self {
            addr,
            shutdown,
            thread,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.shutdown();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
