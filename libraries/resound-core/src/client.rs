//! Reporting results and errors to a client session
//!
//! The command protocol itself lives elsewhere; this module is the narrow
//! surface the core writes to: response lines and one error per failed
//! command, tagged with a protocol `Ack` code.

use crate::error::{ResoundError, Result};

/// Protocol error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Ack {
    NotList = 1,
    Arg = 2,
    Password = 3,
    Permission = 4,
    Unknown = 5,
    NoExist = 50,
    PlaylistMax = 51,
    System = 52,
    PlaylistLoad = 53,
    UpdateAlready = 54,
    PlayerSync = 55,
    Exist = 56,
}

impl Ack {
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Outcome of a command handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandReturn {
    /// The command succeeded
    Ok,
    /// The command failed and the error was reported
    Error,
}

/// A client session that receives response lines and errors
pub trait Response {
    /// Send one response line (without the trailing newline)
    fn write_line(&mut self, line: &str) -> Result<()>;

    /// Report a command failure
    fn error(&mut self, ack: Ack, message: &str);
}

impl ResoundError {
    /// Protocol code a client sees for this error
    pub fn ack(&self) -> Ack {
        match self {
            Self::NotFound { .. } => Ack::NoExist,
            Self::Config(_) | Self::Plugin(_) | Self::FormatNegotiation(_) => Ack::Arg,
            Self::Processing(_) | Self::Database(_) | Self::Io(_) => Ack::System,
        }
    }
}

/// Send an error to the client
pub fn print_error(client: &mut dyn Response, error: &ResoundError) -> CommandReturn {
    let ack = error.ack();
    if ack == Ack::System {
        tracing::error!(error = %error, "Command failed");
    }

    client.error(ack, &error.to_string());
    CommandReturn::Error
}

/// In-memory client that records everything it is sent
#[derive(Debug, Default)]
pub struct TextResponse {
    pub lines: Vec<String>,
    pub errors: Vec<(Ack, String)>,
}

impl TextResponse {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Response for TextResponse {
    fn write_line(&mut self, line: &str) -> Result<()> {
        self.lines.push(line.to_owned());
        Ok(())
    }

    fn error(&mut self, ack: Ack, message: &str) {
        self.errors.push((ack, message.to_owned()));
    }
}
