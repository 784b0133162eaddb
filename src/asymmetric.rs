//! 非对称加密模块：大整数运算、教科书 RSA 以及密钥上下文

pub mod arithmetic;
pub mod errors;
pub mod primitives;
pub mod rotation;
pub mod systems;
pub mod traits;
