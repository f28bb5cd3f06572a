//! Terminal display helpers, mirroring the teacher's `cli/display.rs` idiom
//! (TTY detection via `atty`, plain ANSI constants) but scaled to what two
//! small CLIs need rather than the teacher's full box-drawing/theme system.

pub const BOLD: &str = "\x1b[1m";
pub const RESET: &str = "\x1b[0m";
pub const DIM: &str = "\x1b[2m";

/// Whether stdout is a TTY that should receive color/bold escapes.
pub fn use_color() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    atty::is(atty::Stream::Stdout)
}

/// Wrap `text` in `style` only when `use_color()` holds.
pub fn styled(style: &str, text: &str) -> String {
    if use_color() {
        format!("{style}{text}{RESET}")
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn styled_is_a_no_op_helper_shape() {
        // use_color() depends on the test harness's stdout, so only check
        // that styling never panics and always contains the plain text.
        assert!(styled(BOLD, "malloc").contains("malloc"));
    }
}
