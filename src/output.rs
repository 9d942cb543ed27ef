//! User-facing console lines for the binary.
//!
//! Diagnostics (`warn:`, `error:`) go to stderr with a colored label when
//! stderr is a terminal. Results go to stdout unadorned so they can be piped.

use owo_colors::{AnsiColors, OwoColorize};

fn label(text: &str, color: AnsiColors, tty: bool) -> String {
    if tty {
        text.color(color).bold().to_string()
    } else {
        text.to_string()
    }
}

fn diagnostic(text: &str, color: AnsiColors, msg: &str) {
    let tty = atty::is(atty::Stream::Stderr);
    eprintln!("{} {msg}", label(text, color, tty));
}

pub fn print_warn(msg: &str) {
    diagnostic("warn:", AnsiColors::Yellow, msg);
}

pub fn print_error(msg: &str) {
    diagnostic("error:", AnsiColors::Red, msg);
}

/// One result line (a path, a name) on stdout.
pub fn print_user(msg: &str) {
    println!("{msg}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_label_without_tty() {
        assert_eq!(label("warn:", AnsiColors::Yellow, false), "warn:");
    }

    #[test]
    fn colored_label_on_tty() {
        let s = label("error:", AnsiColors::Red, true);
        assert!(s.contains("error:"));
        assert!(s.starts_with('\u{1b}'), "expected ANSI escape, got {s:?}");
    }
}
