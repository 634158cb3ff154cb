#[macro_export]
macro_rules! env_lazy {
    ($( $vis:vis $name:ident : $ty:ty = ($key:literal, $default:expr); )* ) => {
        $(
            $vis static $name: ::std::sync::LazyLock<$ty> = ::std::sync::LazyLock::new(|| {
                $crate::libs::config::load_env();
                $crate::libs::config::Config::get_var_t::<$ty>($key, $default)
            });
        )*
    };
}

env_lazy! {
    pub RPC_TIMEOUT_SECS: u64    = ("RPC_TIMEOUT_SECS", 30);
    pub LOG_RESULT_CHARS: usize  = ("LOG_RESULT_CHARS", 160);
    pub DEBUG_LOGS: bool         = ("DEBUG_LOGS", false);
}

pub const LOG_DIR: &str = "logs";

/// Name the client's root module answers to.
pub const ROOT_MODULE: &str = "root";

/// Module defaults read by the built-in mungers.
pub const DEFAULT_BLOCK_KEY: &str = "default_block";
pub const DEFAULT_ACCOUNT_KEY: &str = "default_account";
pub const DEFAULT_BLOCK: &str = "latest";

pub const BLOCK_TAGS: [&str; 5] = ["latest", "earliest", "pending", "safe", "finalized"];
