//! Configuration for keygrid.
//!
//! This crate provides the trigger grammar, option types and a loader that
//! merges defaults, a JSON config file, `.env` files and environment variables.

pub mod constants;
pub mod keybind;
mod loader;
pub mod types;

pub use keybind::{KeybindError, Trigger, parse_key, parse_trigger};
pub use loader::{ConfigError, ConfigLoader, default_config_path, env_var_or_none};
pub use types::{
    ActionTriggers, EngineConfig, GridConfig, HotkeyAction, HotkeyTiming, MovementTriggers,
    SearchOptions, SearchTriggers,
};

#[cfg(test)]
pub(crate) mod test_util {
    use std::sync::{Mutex, OnceLock};

    pub fn global_test_lock() -> &'static Mutex<()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
    }
}
