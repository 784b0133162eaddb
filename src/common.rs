//! 通用模块，包含配置与共享的工具函数

pub mod config;
pub mod utils;

pub use self::config::{ConfigFile, CryptoConfig, SharingConfig};
pub use self::utils::{constant_time_eq, from_base64, to_base64};
