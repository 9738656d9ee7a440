pub mod budget_store;
pub mod record_store;
pub mod services;
pub mod session;
pub mod tracker;
pub mod utils;

pub use budget_store::BudgetStore;
pub use record_store::RecordStore;
pub use session::Session;
pub use tracker::{Dashboard, Tracker};
