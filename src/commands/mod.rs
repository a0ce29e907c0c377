/// `--config` updates to the persisted settings.
pub mod config;
/// The directory listing driver.
pub mod list;
