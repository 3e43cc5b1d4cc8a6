//! Error types for panelkit
//!
//! Layout problems, terminal I/O failures and child-process failures are the
//! only things that can go wrong; bad keys and overlong input are absorbed by
//! the widgets themselves and never surface here.

use thiserror::Error;

/// Main error type for dialog operations
#[derive(Error, Debug)]
pub enum Error {
    /// The parent surface cannot hold even a single cell
    #[error("layout infeasible: parent surface is {height}x{width}")]
    LayoutInfeasible { height: u16, width: u16 },

    /// Terminal or pty I/O failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The shell child process could not be started
    #[error("failed to spawn process: {0}")]
    Spawn(String),

    /// Raised by a caller's own exit action to unwind every open dialog
    #[error("aborted by user")]
    Aborted,
}

/// Result type alias for dialog operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_message_names_size() {
        let err = Error::LayoutInfeasible { height: 0, width: 80 };
        assert_eq!(err.to_string(), "layout infeasible: parent surface is 0x80");
    }

    #[test]
    fn test_io_errors_convert() {
        fn fails() -> Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone"))?;
            Ok(())
        }
        assert!(matches!(fails(), Err(Error::Io(_))));
    }
}
