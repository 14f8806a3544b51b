pub mod common;
pub mod parallel;
pub mod sequential;
