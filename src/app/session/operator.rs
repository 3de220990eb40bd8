//! Operator seam between the session controller and whoever drives it
//!
//! The controller never reads stdin or writes stdout itself. It asks an
//! [`Operator`] for proposal identifiers and yes/no answers, and hands it
//! printable status lines.

use crate::errors::SessionResult;

/// Interactive collaborator of the session controller
pub trait Operator {
    /// Show `message` and return the operator's free-text answer
    fn prompt(&mut self, message: &str) -> SessionResult<String>;

    /// Ask a yes/no question; anything not starting with `y` means no
    fn confirm(&mut self, message: &str) -> SessionResult<bool> {
        let answer = self.prompt(message)?;
        Ok(answer.trim().to_lowercase().starts_with('y'))
    }

    /// Deliver one status line
    fn report(&mut self, line: &str);

    /// A remote call is about to block
    fn busy(&mut self, _message: &str) {}

    /// The blocking call finished
    fn idle(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(&'static str);

    impl Operator for Fixed {
        fn prompt(&mut self, _message: &str) -> SessionResult<String> {
            Ok(self.0.to_string())
        }

        fn report(&mut self, _line: &str) {}
    }

    #[test]
    fn test_confirm_answers() {
        assert!(Fixed("y").confirm("?").unwrap());
        assert!(Fixed("Yes\n").confirm("?").unwrap());
        assert!(!Fixed("n").confirm("?").unwrap());
        assert!(!Fixed("").confirm("?").unwrap());
        assert!(!Fixed("sure").confirm("?").unwrap());
    }
}
