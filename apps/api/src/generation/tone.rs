//! Tone personas: the three voices a draft can be rewritten in.
//!
//! The behavioural description of each tone is prompt material only; nothing
//! else in the service branches on it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tone {
    Builder,
    Student,
    Founder,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Tone must be one of Builder, Student, Founder (got '{0}')")]
pub struct UnknownTone(pub String);

impl Tone {
    pub const ALL: [Tone; 3] = [Tone::Builder, Tone::Student, Tone::Founder];

    /// Wire label, also embedded in the prompt.
    pub fn label(self) -> &'static str {
        match self {
            Tone::Builder => "Builder",
            Tone::Student => "Student",
            Tone::Founder => "Founder",
        }
    }

    /// How the persona writes. Consumed only by the prompt builder.
    pub fn description(self) -> &'static str {
        match self {
            Tone::Builder => {
                "\"how\", craft, tools, challenges, problem-solving. Humble but competent."
            }
            Tone::Student => {
                "curiosity, \"today I learned\", admitting knowledge gaps, asking for advice."
            }
            Tone::Founder => {
                "journey, hard lessons, pivots, building in public, team appreciation."
            }
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Tone {
    type Err = UnknownTone;

    /// Case-insensitive so CLI users can type `builder`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Tone::ALL
            .into_iter()
            .find(|tone| tone.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownTone(s.to_string()))
    }
}
