//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod budget;
pub mod error;
pub mod expense;
pub mod user;

pub use budget::BudgetRepository;
pub use error::RepositoryError;
pub use expense::{ExpensePage, ExpenseRepository};
pub use user::{CreateUserInput, UserRepository};
