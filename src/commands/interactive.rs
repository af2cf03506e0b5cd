//! Interactive prompts for commands that need a human decision

use std::io::{self, IsTerminal, Write};

use crate::error::Result;

/// Whether stdin is attached to a terminal
pub fn is_stdin_tty() -> bool {
    io::stdin().is_terminal()
}

/// Prompt for yes/no confirmation.
///
/// `prompt` is printed as is, followed by ` [y/N] `. Only `y` or `Y`
/// confirms.
pub fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(is_yes(&input))
}

fn is_yes(input: &str) -> bool {
    input.trim().eq_ignore_ascii_case("y")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" Y "));
        assert!(!is_yes("yes"));
        assert!(!is_yes(""));
        assert!(!is_yes("n"));
    }
}
