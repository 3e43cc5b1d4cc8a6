//! Child processes behind a pseudo-terminal
//!
//! The shell box talks to its child through [`Process`]. [`PtyProcess`] is
//! the real implementation: `portable-pty` for the terminal pair and a
//! reader thread that drains the master side into a bounded channel, so
//! the dialog loop can wait on output with a timeout.

use std::io::{Read, Write};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use portable_pty::{Child, ChildKiller, CommandBuilder, MasterPty, NativePtySystem, PtySize, PtySystem};
use tracing::{debug, info, trace, warn};

use crate::error::{Error, Result};

/// Chunks buffered between the reader thread and the dialog
const OUTPUT_QUEUE: usize = 64;

const READ_CHUNK: usize = 4096;

/// Result of waiting for child output
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReadOutcome {
    Data(Vec<u8>),
    /// Nothing arrived before the timeout
    Idle,
    /// The output stream has ended
    Closed,
}

/// A running child the shell box can feed and read
pub trait Process {
    fn is_alive(&mut self) -> bool;

    fn write(&mut self, bytes: &[u8]) -> Result<()>;

    /// Wait up to `timeout` for the next chunk of output
    fn read(&mut self, timeout: Duration) -> ReadOutcome;

    /// The box showing the output changed size
    fn resize(&mut self, _rows: u16, _cols: u16) -> Result<()> {
        Ok(())
    }
}

/// A command running on its own pseudo-terminal
pub struct PtyProcess {
    master: Box<dyn MasterPty + Send>,
    child: Box<dyn Child + Send + Sync>,
    writer: Box<dyn Write + Send>,
    output: Receiver<Vec<u8>>,
}

impl PtyProcess {
    /// Start `command` (program then arguments) on a `rows` x `cols` pty
    pub fn spawn(command: &[String], rows: u16, cols: u16) -> Result<Self> {
        let (program, args) = command
            .split_first()
            .ok_or_else(|| Error::Spawn("empty command".into()))?;

        let pty_system = NativePtySystem::default();
        let pair = pty_system
            .openpty(pty_size(rows, cols))
            .map_err(|e| Error::Spawn(format!("failed to open pty: {e}")))?;

        let mut cmd = CommandBuilder::new(program);
        cmd.args(args);
        let child = pair
            .slave
            .spawn_command(cmd)
            .map_err(|e| Error::Spawn(format!("{program}: {e}")))?;
        // only the child keeps the slave side open, so its exit ends the stream
        drop(pair.slave);

        let reader = pair
            .master
            .try_clone_reader()
            .map_err(|e| Error::Spawn(format!("failed to clone pty reader: {e}")))?;
        let writer = pair
            .master
            .take_writer()
            .map_err(|e| Error::Spawn(format!("failed to take pty writer: {e}")))?;

        let (tx, output) = mpsc::sync_channel(OUTPUT_QUEUE);
        thread::Builder::new()
            .name("pty-reader".into())
            .spawn(move || pump(reader, tx))?;

        info!(%program, rows, cols, "child spawned");
        Ok(Self {
            master: pair.master,
            child,
            writer,
            output,
        })
    }
}

fn pty_size(rows: u16, cols: u16) -> PtySize {
    PtySize {
        rows: rows.max(1),
        cols: cols.max(1),
        pixel_width: 0,
        pixel_height: 0,
    }
}

/// Copy everything the child prints into the channel until either side goes away
fn pump(mut reader: Box<dyn Read + Send>, tx: mpsc::SyncSender<Vec<u8>>) {
    let mut buffer = vec![0u8; READ_CHUNK];
    loop {
        match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => {
                trace!(bytes = n, "pty output");
                if tx.send(buffer[..n].to_vec()).is_err() {
                    break;
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            // EIO once the child has gone on Linux
            Err(e) => {
                debug!(%e, "pty read ended");
                break;
            }
        }
    }
}

impl Process for PtyProcess {
    fn is_alive(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer.write_all(bytes)?;
        self.writer.flush()?;
        Ok(())
    }

    fn read(&mut self, timeout: Duration) -> ReadOutcome {
        match self.output.recv_timeout(timeout) {
            Ok(data) => ReadOutcome::Data(data),
            Err(RecvTimeoutError::Timeout) => ReadOutcome::Idle,
            Err(RecvTimeoutError::Disconnected) => ReadOutcome::Closed,
        }
    }

    fn resize(&mut self, rows: u16, cols: u16) -> Result<()> {
        debug!(rows, cols, "pty resized");
        self.master
            .resize(pty_size(rows, cols))
            .map_err(|e| Error::Io(std::io::Error::other(e.to_string())))
    }
}

impl Drop for PtyProcess {
    fn drop(&mut self) {
        if self.is_alive() {
            if let Err(e) = self.child.kill() {
                warn!(%e, "failed to kill child");
            }
        }
        match self.child.try_wait() {
            Ok(Some(status)) => info!(?status, "child exited"),
            Ok(None) => debug!("child still running after kill"),
            Err(e) => warn!(%e, "failed to reap child"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_command_is_rejected() {
        let err = PtyProcess::spawn(&[], 24, 80).err().unwrap();
        assert!(matches!(err, Error::Spawn(msg) if msg == "empty command"));
    }

    #[test]
    fn test_pty_size_never_zero() {
        let size = pty_size(0, 0);
        assert_eq!((size.rows, size.cols), (1, 1));
    }
}
