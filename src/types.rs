#![forbid(unsafe_code)]

//! Core domain types for formrules
//!
//! This module defines the fundamental types used throughout the formrules system.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

/// An input event that can fire a validator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerEvent {
    Change,
    Blur,
}

impl TriggerEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerEvent::Change => "change",
            TriggerEvent::Blur => "blur",
        }
    }
}

impl fmt::Display for TriggerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TriggerEvent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "change" => Ok(TriggerEvent::Change),
            "blur" => Ok(TriggerEvent::Blur),
            other => Err(format!(
                "unknown trigger event '{}', expected 'change' or 'blur'",
                other
            )),
        }
    }
}

/// One or more events that fire a validator
///
/// Serialized as a single event string (`"blur"`) or a list of events
/// (`["change", "blur"]`). A trigger never holds an empty event list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "TriggerRepr", into = "TriggerRepr")]
pub struct Trigger(Vec<TriggerEvent>);

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum TriggerRepr {
    One(TriggerEvent),
    Many(Vec<TriggerEvent>),
}

impl Trigger {
    /// Creates a trigger firing on a single event
    pub fn new(event: TriggerEvent) -> Self {
        Trigger(vec![event])
    }

    /// Creates a trigger firing on every listed event
    ///
    /// Returns None if the list is empty. Duplicate events are dropped.
    pub fn any_of(events: impl IntoIterator<Item = TriggerEvent>) -> Option<Self> {
        let mut unique = Vec::new();
        for event in events {
            if !unique.contains(&event) {
                unique.push(event);
            }
        }
        if unique.is_empty() {
            None
        } else {
            Some(Trigger(unique))
        }
    }

    /// Decodes a trigger from a dynamic value (`"blur"` or `["change", "blur"]`)
    pub fn from_value(value: &serde_json::Value) -> Result<Self, String> {
        serde_json::from_value(value.clone()).map_err(|e| e.to_string())
    }

    /// Returns the events of this trigger
    pub fn events(&self) -> &[TriggerEvent] {
        &self.0
    }

    /// Returns true if this trigger fires on `event`
    pub fn fires_on(&self, event: TriggerEvent) -> bool {
        self.0.contains(&event)
    }
}

impl Default for Trigger {
    fn default() -> Self {
        Trigger::new(TriggerEvent::Blur)
    }
}

impl From<TriggerEvent> for Trigger {
    fn from(event: TriggerEvent) -> Self {
        Trigger::new(event)
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.0.iter().map(TriggerEvent::as_str).collect();
        write!(f, "{}", names.join(","))
    }
}

impl TryFrom<TriggerRepr> for Trigger {
    type Error = String;

    fn try_from(repr: TriggerRepr) -> Result<Self, Self::Error> {
        match repr {
            TriggerRepr::One(event) => Ok(Trigger::new(event)),
            TriggerRepr::Many(events) => {
                Trigger::any_of(events).ok_or_else(|| "trigger list cannot be empty".to_string())
            }
        }
    }
}

impl From<Trigger> for TriggerRepr {
    fn from(trigger: Trigger) -> Self {
        match trigger.0.as_slice() {
            [single] => TriggerRepr::One(*single),
            _ => TriggerRepr::Many(trigger.0),
        }
    }
}

/// A validated rule name
///
/// Rule names must be non-empty and contain only alphanumeric characters, hyphens, and underscores.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RuleName(String);

impl RuleName {
    /// Creates a new RuleName, validating the input
    ///
    /// Returns None if the input is empty or contains invalid characters
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        if name.is_empty() {
            return None;
        }
        if !name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
        {
            return None;
        }
        Some(RuleName(name))
    }

    /// Returns the rule name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for RuleName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for RuleName {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        RuleName::new(value).ok_or_else(|| "Invalid rule name".to_string())
    }
}

impl From<RuleName> for String {
    fn from(name: RuleName) -> Self {
        name.0
    }
}
