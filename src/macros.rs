/// Compile a regex literal once and hand out a `&'static Regex`.
#[macro_export]
macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).unwrap());
        &*RE
    }};
}

/// Print an engine trace line when `DURFMT_DEBUG` is set.
macro_rules! trace {
    ($($arg:tt)*) => {
        if std::env::var_os("DURFMT_DEBUG").is_some() {
            eprintln!($($arg)*);
        }
    };
}
