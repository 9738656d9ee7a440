pub mod budget;
pub mod category;
pub mod common;
pub mod expense;
pub mod insight;
pub mod settings;
pub mod user;

pub use budget::{default_budgets, Budget};
pub use category::{Category, CATEGORIES};
pub use common::{Amounted, Displayable, Identifiable, Period, PeriodError};
pub use expense::{parse_amount, parse_date, validate_amount, Expense, NewExpense};
pub use insight::Insight;
pub use settings::{Currency, Language, Settings};
pub use user::User;
