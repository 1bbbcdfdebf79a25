//! Test data fixtures

mod fixtures;

pub use fixtures::{StudyClock, TestDataFactory};
