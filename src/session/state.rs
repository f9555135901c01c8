//! Per-user session context
//!
//! Holds the credential and UI selections for one browser session. Handlers
//! receive a `Session` value, act on it, and hand it back to the store.

use crate::core::pipeline::ToolOutcome;
use crate::tools::{ToolKind, ToolParams};
use std::fmt;

/// API key entered by the user, never logged or displayed
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Accept a non-blank key
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into().trim().to_string();
        if key.is_empty() { None } else { Some(Self(key)) }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Whether tool operations are reachable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Ready,
}

/// Severity of a message shown above the tool form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    credential: Option<Credential>,
    pub selected_tool: ToolKind,
    /// Text area contents from the last submission
    pub input_text: String,
    /// Control positions from the last submission of the selected tool
    pub params: Option<ToolParams>,
    pub outcome: Option<ToolOutcome>,
    pub notice: Option<Notice>,
    pub fun_fact: Option<&'static str>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        if self.credential.is_some() {
            SessionState::Ready
        } else {
            SessionState::Unauthenticated
        }
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    /// Store the key if it is non-blank; returns whether the session is Ready
    ///
    /// A blank submission never removes a key already held.
    pub fn set_credential(&mut self, key: &str) -> bool {
        if let Some(credential) = Credential::new(key) {
            self.credential = Some(credential);
        }
        self.state() == SessionState::Ready
    }

    /// Switch tools, dropping results that belonged to the previous one
    pub fn select_tool(&mut self, kind: ToolKind) {
        if self.selected_tool != kind {
            self.selected_tool = kind;
            self.params = None;
            self.outcome = None;
            self.notice = None;
        }
    }

    /// Current control positions for the selected tool
    pub fn current_params(&self) -> ToolParams {
        self.params
            .filter(|params| params.kind() == self.selected_tool)
            .unwrap_or_else(|| ToolParams::defaults_for(self.selected_tool))
    }

    /// Discard everything except the credential
    pub fn clear_all(&mut self) {
        let credential = self.credential.take();
        *self = Session {
            credential,
            ..Session::default()
        };
    }

    pub fn show_fun_fact(&mut self, fact: &'static str) {
        self.fun_fact = Some(fact);
    }
}
