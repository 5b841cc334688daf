// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::error::Error;
use std::fmt::Display;
use std::fmt::Formatter;

#[derive(Debug, PartialEq)]
pub struct ErrorReport {
    message: String,
}

impl ErrorReport {
    pub fn new(msg: impl Into<String>) -> Self {
        ErrorReport {
            message: msg.into(),
        }
    }
}

impl From<std::io::Error> for ErrorReport {
    fn from(value: std::io::Error) -> Self {
        ErrorReport {
            message: format!("I/O error: {value:#?}"),
        }
    }
}

impl From<serde_json::Error> for ErrorReport {
    fn from(value: serde_json::Error) -> Self {
        ErrorReport {
            message: format!("JSON error: {value:#?}"),
        }
    }
}

impl From<toml::de::Error> for ErrorReport {
    fn from(value: toml::de::Error) -> Self {
        ErrorReport {
            message: format!("TOML error: {value}"),
        }
    }
}

impl Display for ErrorReport {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "error: {}", self.message)
    }
}

impl Error for ErrorReport {}

pub type Fallible<T> = Result<T, ErrorReport>;

pub fn fail<T>(msg: impl Into<String>) -> Fallible<T> {
    Err(ErrorReport {
        message: msg.into(),
    })
}

/// Why an engine operation left the state untouched.
///
/// None of these are faults: the engines absorb them and report them back
/// so that a caller can log or assert on them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ignored {
    /// The operation is not valid in the current phase, e.g. answering a
    /// question twice or ticking a quiz that is not running.
    InvalidTransition,
    /// There is nothing to operate on: an empty category or an empty deck.
    EmptyInput,
    /// The session cursor does not point at a card.
    OutOfRange,
}

impl Display for Ignored {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            Ignored::InvalidTransition => write!(f, "invalid transition"),
            Ignored::EmptyInput => write!(f, "nothing to do"),
            Ignored::OutOfRange => write!(f, "no card at the current position"),
        }
    }
}

/// The result of feeding an event to one of the engines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Ignored(Ignored),
}

impl Outcome {
    pub fn is_applied(self) -> bool {
        matches!(self, Outcome::Applied)
    }

    pub(crate) fn ignored(reason: Ignored, operation: &str) -> Self {
        log::debug!("Ignoring {operation}: {reason}");
        Outcome::Ignored(reason)
    }
}
