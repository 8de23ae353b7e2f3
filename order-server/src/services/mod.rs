//! 服务层：设置解析器与过期清理

pub mod cleanup;
pub mod settings;

pub use settings::SettingsService;
