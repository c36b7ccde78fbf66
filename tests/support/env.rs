use std::{
    path::PathBuf,
    sync::{Mutex, OnceLock},
};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

const CONFIG_HOME: &str = "BUNKMATE_CONFIG_HOME";
const KEY_VARS: [&str; 2] = ["BUNKMATE_API_KEY", "GEMINI_API_KEY"];

/// Points the app config home at a temp directory and clears any ambient
/// API-key variables so settings resolution is hermetic.
pub struct BunkmateEnvGuard {
    previous_home: Option<String>,
    previous_keys: Vec<(&'static str, Option<String>)>,
    _lock: std::sync::MutexGuard<'static, ()>,
}

impl BunkmateEnvGuard {
    pub fn set_config_home(path: PathBuf) -> Self {
        let lock = ENV_LOCK
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(|err| err.into_inner());
        let previous_home = std::env::var(CONFIG_HOME).ok();
        let previous_keys = KEY_VARS
            .iter()
            .map(|name| (*name, std::env::var(name).ok()))
            .collect();
        // SAFETY: tests run under a global lock to prevent concurrent env mutations.
        unsafe {
            std::env::set_var(CONFIG_HOME, path);
            for name in KEY_VARS {
                std::env::remove_var(name);
            }
        }
        Self {
            previous_home,
            previous_keys,
            _lock: lock,
        }
    }
}

impl Drop for BunkmateEnvGuard {
    fn drop(&mut self) {
        // SAFETY: tests run under a global lock to prevent concurrent env mutations.
        unsafe {
            match self.previous_home.take() {
                Some(value) => std::env::set_var(CONFIG_HOME, value),
                None => std::env::remove_var(CONFIG_HOME),
            }
            for (name, previous) in self.previous_keys.drain(..) {
                match previous {
                    Some(value) => std::env::set_var(name, value),
                    None => std::env::remove_var(name),
                }
            }
        }
    }
}
