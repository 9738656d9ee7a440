#![allow(dead_code)]

use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use smarty_core::{
    Category, Config, ConfigManager, Insight, InsightGateway, MockGateway, NewExpense, Tracker,
};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Allocates an isolated base directory and writes a config pointing at it.
pub fn setup_test_env() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);

    let config = Config {
        data_dir: Some(base.clone()),
        ..Config::default()
    };
    ConfigManager::with_base_dir(base.clone())
        .expect("create config manager for temp dir")
        .save(&config)
        .expect("save test config");
    base
}

/// Opens a tracker over the on-disk store under `base`, as a fresh process would.
pub fn open_tracker(base: &Path) -> Tracker {
    open_tracker_with(base, Arc::new(MockGateway::ready(sample_insight())))
}

pub fn open_tracker_with(base: &Path, gateway: Arc<dyn InsightGateway>) -> Tracker {
    let config = ConfigManager::with_base_dir(base.to_path_buf())
        .expect("config manager")
        .load()
        .expect("load test config");
    Tracker::open_on_disk(&config, gateway).expect("open tracker")
}

pub fn signed_in_tracker(base: &Path) -> Tracker {
    let mut tracker = open_tracker(base);
    tracker
        .login("student@example.com", "Student")
        .expect("login");
    tracker
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub fn expense(amount: f64, category: Category, on: NaiveDate) -> NewExpense {
    NewExpense::new(amount, category, format!("{category} spend"), on)
}

pub fn sample_insight() -> Insight {
    Insight {
        score: 8.0,
        summary: "Spending is on track".into(),
        tips: vec!["Plan meals ahead".into(), "Buy used books".into()],
    }
}
