pub mod cc {
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const CYAN: &str = "\x1b[36m";
    pub const BOLD: &str = "\x1b[1m";
    pub const RESET: &str = "\x1b[0m";
    pub const ORANGE: &str = "\x1b[38;5;208m";
    pub const LIGHT_GRAY: &str = "\x1b[38;5;245m";
    pub const LIGHT_GREEN: &str = "\x1b[92m";
    pub const LIGHT_BLUE: &str = "\x1b[94m";
}

/// Write one timestamped, colored line to stderr.
///
/// Shared backend of [`log!`](crate::log) and [`warn!`](crate::warn); stdout
/// stays free for results.
pub fn emit(color: &str, line: std::fmt::Arguments<'_>) {
    use std::io::Write;

    let time = chrono::Utc::now().format("%H:%M:%S%.3f");
    let mut stderr = std::io::stderr().lock();
    let _ = writeln!(
        stderr,
        "{}{time} | {}{color}{line}{}",
        cc::LIGHT_GRAY,
        cc::RESET,
        cc::RESET
    );
}

#[macro_export]
macro_rules! log {
    // log!("plain: {}", x);
    // Must come first: a leading literal would otherwise be taken as a color.
    ($fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::libs::writing::emit(
            $crate::libs::writing::cc::LIGHT_GRAY,
            format_args!($fmt $(, $arg)*),
        )
    };
    // log!(cc::GREEN, "chain id: {}", id);
    ($color:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::libs::writing::emit($color, format_args!($fmt $(, $arg)*))
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::libs::writing::emit($crate::libs::writing::cc::ORANGE, format_args!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn smoke_log_variants_compile() {
        crate::log!(crate::libs::writing::cc::GREEN, "colored no args");
        crate::log!(crate::libs::writing::cc::GREEN, "colored with arg: {}", 123);
        crate::log!("plain no args");
        crate::log!("plain with arg: {}", 456);
        crate::warn!("warned: {}", "careful");
    }
}
