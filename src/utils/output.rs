//! Colored status lines for the terminal.
//!
//! Every function writes to the given sink so the setup flow can be driven
//! against a buffer in tests.

use console::style;
use std::fmt::Display;
use std::io::{self, Write};

pub fn banner(out: &mut dyn Write, message: &str) -> io::Result<()> {
    writeln!(out, "{}", style(message).green())
}

/// Start a step line; the marker is appended to the same line later.
pub fn step(out: &mut dyn Write, message: &str) -> io::Result<()> {
    write!(out, "{message} ")?;
    out.flush()
}

pub fn success(out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "{}", style("Success").green())
}

pub fn failure(out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "{}", style("Error").red())
}

pub fn info(out: &mut dyn Write, message: &str) -> io::Result<()> {
    writeln!(out, "{message}")
}

/// White on red, like a terminal error block.
pub fn error_line(out: &mut dyn Write, error: &dyn Display) -> io::Result<()> {
    writeln!(out, "{}", style(error).white().on_red())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(f: impl FnOnce(&mut dyn Write) -> io::Result<()>) -> String {
        let mut buffer = Vec::new();
        f(&mut buffer).unwrap();
        console::strip_ansi_codes(&String::from_utf8(buffer).unwrap()).into_owned()
    }

    #[test]
    fn test_step_then_marker_share_a_line() {
        let text = render(|out| {
            step(out, "Downloading release file...")?;
            success(out)
        });
        assert_eq!(text, "Downloading release file... Success\n");
    }

    #[test]
    fn test_failure_and_error_line() {
        let text = render(|out| {
            failure(out)?;
            error_line(out, &"Release file not found")
        });
        assert_eq!(text, "Error\nRelease file not found\n");
    }
}
