pub mod config;
pub mod i18n;
pub mod license;
