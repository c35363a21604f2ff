//! RequirementCollector: asks the operator for a role, then for that role's fields.
//!
//! Works over any `BufRead` / `Write` pair so tests can drive it with byte
//! buffers. Field answers are trimmed and otherwise taken as-is.

use std::io::{self, BufRead, Write};

use thiserror::Error;
use tracing::debug;

use crate::models::requirements::{Requirements, Role};

pub const BANNER: &str = "\n--- Football Player & Coach Recommendation System ---\n";
pub const ROLE_PROMPT: &str = "Do you need a player or a coach? (player/coach): ";
pub const INVALID_ROLE_NOTICE: &str = "Invalid choice. Please enter 'player' or 'coach'.";

#[derive(Debug, Error)]
pub enum IntakeError {
    /// End of input or an empty answer at the role prompt.
    #[error("no role chosen (empty input or end of input)")]
    Aborted,

    /// End of input while answering the role's fields.
    #[error("input ended before all requirements were collected")]
    Interrupted,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// States of the role prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleState {
    Prompting,
    Valid(Role),
    Aborted,
}

impl RoleState {
    /// Transition from `Prompting` given one line of input (`None` = end of input).
    pub fn next(input: Option<&str>) -> RoleState {
        match input.map(str::trim) {
            None | Some("") => RoleState::Aborted,
            Some(answer) => match answer.parse::<Role>() {
                Ok(role) => RoleState::Valid(role),
                Err(_) => RoleState::Prompting,
            },
        }
    }
}

pub struct RequirementCollector<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> RequirementCollector<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn collect(&mut self) -> Result<Requirements, IntakeError> {
        writeln!(self.output, "{BANNER}")?;

        let role = self.collect_role()?;
        debug!("Role selected: {role}");

        Requirements::try_from_fields(role, |field| -> Result<String, IntakeError> {
            self.ask(field.prompt)?.ok_or(IntakeError::Interrupted)
        })
    }

    fn collect_role(&mut self) -> Result<Role, IntakeError> {
        let mut state = RoleState::Prompting;

        loop {
            match state {
                RoleState::Prompting => {
                    let answer = self.ask(ROLE_PROMPT)?;
                    state = RoleState::next(answer.as_deref());
                    if state == RoleState::Prompting {
                        writeln!(self.output, "{INVALID_ROLE_NOTICE}")?;
                    }
                }
                RoleState::Valid(role) => return Ok(role),
                RoleState::Aborted => return Err(IntakeError::Aborted),
            }
        }
    }

    /// Writes `prompt`, reads one line. `None` on end of input.
    fn ask(&mut self, prompt: &str) -> Result<Option<String>, IntakeError> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}
