//! 门限秘密共享：在 GF(2^8) 上逐字节拆分与恢复秘密

pub mod errors;
pub(crate) mod field;
pub mod sharer;
