//! Requirements: the operator's free-text preferences for one pipeline run.
//!
//! Values are never parsed or range-checked here. "20-25" and "young-ish" are
//! both acceptable ages; interpreting them is left to the generation stages.

use std::fmt;
use std::str::FromStr;

use serde::ser::{Serialize, SerializeMap, Serializer};
use thiserror::Error;

/// The discriminant selecting which field set and instruction variants apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Player,
    Coach,
}

/// A role-specific field: its mapping key and the question put to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub key: &'static str,
    pub prompt: &'static str,
}

const PLAYER_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        key: "position",
        prompt: "Playing position (Goalkeeper, Defender, Midfielder, Forward): ",
    },
    FieldSpec {
        key: "age_range",
        prompt: "Preferred age range (e.g., 20-25): ",
    },
    FieldSpec {
        key: "experience",
        prompt: "Years of experience (e.g., 3+ years): ",
    },
    FieldSpec {
        key: "style",
        prompt: "Playing style or strengths (e.g., defensive, attacking, playmaker): ",
    },
];

const COACH_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        key: "style",
        prompt: "Coaching style (offensive, defensive, balanced): ",
    },
    FieldSpec {
        key: "experience",
        prompt: "Experience level (e.g., 5+ years, former player): ",
    },
    FieldSpec {
        key: "age_range",
        prompt: "Preferred age range (e.g., 40-50): ",
    },
    FieldSpec {
        key: "focus",
        prompt: "Team development focus (youth development, professional level, etc.): ",
    },
];

/// Key under which the role itself is stored.
pub const TYPE_KEY: &str = "type";

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Player => "player",
            Role::Coach => "coach",
        }
    }

    /// Fields asked for this role, in the order they are asked.
    pub fn fields(&self) -> &'static [FieldSpec] {
        match self {
            Role::Player => PLAYER_FIELDS,
            Role::Coach => COACH_FIELDS,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role '{0}', expected 'player' or 'coach'")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    /// Case-insensitive, surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "player" => Ok(Role::Player),
            "coach" => Ok(Role::Coach),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{role} requires {expected} answers, got {actual}")]
pub struct AnswerCountMismatch {
    pub role: Role,
    pub expected: usize,
    pub actual: usize,
}

/// Immutable mapping from field name to operator-supplied value.
///
/// Always contains `type`; the remaining keys are exactly `role.fields()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirements {
    role: Role,
    values: Vec<(&'static str, String)>,
}

impl Requirements {
    /// Pairs `answers` positionally with `role.fields()`.
    pub fn from_answers(role: Role, answers: Vec<String>) -> Result<Self, AnswerCountMismatch> {
        let fields = role.fields();
        if answers.len() != fields.len() {
            return Err(AnswerCountMismatch {
                role,
                expected: fields.len(),
                actual: answers.len(),
            });
        }

        let mut answers = answers.into_iter();
        Self::try_from_fields(role, |_| Ok(answers.next().unwrap_or_default()))
    }

    /// Asks `answer` for each of the role's fields in order. Stops at the
    /// first error.
    pub fn try_from_fields<E, F>(role: Role, mut answer: F) -> Result<Self, E>
    where
        F: FnMut(&FieldSpec) -> Result<String, E>,
    {
        let fields = role.fields();
        let mut values = Vec::with_capacity(fields.len());
        for field in fields {
            values.push((field.key, answer(field)?));
        }
        Ok(Self { role, values })
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        if key == TYPE_KEY {
            return Some(self.role.as_str());
        }
        self.values
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// All entries, `type` first, then the role fields in asking order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        std::iter::once((TYPE_KEY, self.role.as_str()))
            .chain(self.values.iter().map(|(k, v)| (*k, v.as_str())))
    }

    pub fn keys(&self) -> Vec<&'static str> {
        self.iter().map(|(k, _)| k).collect()
    }
}

impl Serialize for Requirements {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len() + 1))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
