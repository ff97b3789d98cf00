use std::env;

pub const ENV_KEY: &str = "ENV";

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

/// Decide the runtime environment from the `ENV` variable.
/// Anything other than "production" falls back to development.
pub fn which() -> Environment {
    #[cfg(debug_assertions)]
    let default_env = Environment::Development;
    #[cfg(not(debug_assertions))]
    let default_env = Environment::Production;

    match env::var(ENV_KEY) {
        Err(_) => default_env,
        Ok(v) if v.eq_ignore_ascii_case("production") => Environment::Production,
        Ok(_) => Environment::Development,
    }
}
