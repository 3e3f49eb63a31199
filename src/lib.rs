pub mod config;
pub mod driver;
pub mod error;
pub mod library;
pub mod quiz;
pub mod storage;

pub use error::{Error, Result};
pub use quiz::{AdvanceDelay, Question, Session};
