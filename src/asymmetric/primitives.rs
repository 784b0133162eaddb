//! 建立在单值运算之上的批量原语

#[cfg(feature = "parallel")]
pub mod parallel;
