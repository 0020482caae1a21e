//! Per-document parser context and the diagnostics sink.
//!
//! The [`Environment`] carries every piece of mutable state a single document
//! parse accumulates: the link table, the anonymous-reference stack, named
//! variables set by directives, the underline-letter to heading-level mapping,
//! and the list of files the document depends on. The link and variable tables
//! outlive the parse: renderers read them when substituting span tokens.
//!
//! Diagnostics are collected by an [`ErrorManager`] that is shared (via `Rc`)
//! between the environment, the reference registry and the renderers. It is a
//! plain collaborator passed through context, never a global.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::nodes::Node;

/// Severity attached to a collected diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Collecting diagnostics sink.
///
/// Markup problems never abort a parse; they are recorded here and the parser
/// degrades gracefully. Interior mutability lets renderers log through a
/// shared `&ErrorManager` at render time.
#[derive(Debug, Default)]
pub struct ErrorManager {
    messages: RefCell<Vec<(Severity, String)>>,
}

impl ErrorManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&self, message: impl Into<String>) {
        self.messages
            .borrow_mut()
            .push((Severity::Error, message.into()));
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.messages
            .borrow_mut()
            .push((Severity::Warning, message.into()));
    }

    pub fn log(&self, severity: Severity, message: impl Into<String>) {
        self.messages.borrow_mut().push((severity, message.into()));
    }

    /// All collected errors, in the order they were logged.
    pub fn errors(&self) -> Vec<String> {
        self.messages
            .borrow()
            .iter()
            .filter(|(severity, _)| *severity == Severity::Error)
            .map(|(_, message)| message.clone())
            .collect()
    }

    pub fn error_count(&self) -> usize {
        self.messages
            .borrow()
            .iter()
            .filter(|(severity, _)| *severity == Severity::Error)
            .count()
    }

    pub fn messages(&self) -> Vec<(Severity, String)> {
        self.messages.borrow().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.borrow().is_empty()
    }
}

/// Mutable state for one document parse.
pub struct Environment {
    error_manager: Rc<ErrorManager>,
    current_file_name: String,
    initial_header_level: usize,

    /// Underline letters in order of first appearance; index + 1 is the level.
    title_letters: Vec<char>,

    variables: HashMap<String, Node>,
    links: HashMap<String, String>,
    anonymous: Vec<String>,
    dependencies: Vec<String>,
}

impl Environment {
    pub fn new(error_manager: Rc<ErrorManager>) -> Self {
        Self {
            error_manager,
            current_file_name: String::new(),
            initial_header_level: 1,
            title_letters: Vec::new(),
            variables: HashMap::new(),
            links: HashMap::new(),
            anonymous: Vec::new(),
            dependencies: Vec::new(),
        }
    }

    /// Clear the per-document heading state before a fresh top-level parse.
    /// Links and variables survive fragment parses on purpose.
    pub fn reset(&mut self) {
        self.title_letters.clear();
    }

    pub fn error_manager(&self) -> &Rc<ErrorManager> {
        &self.error_manager
    }

    pub fn add_error(&self, message: impl Into<String>) {
        self.error_manager.error(message);
    }

    pub fn set_current_file_name(&mut self, name: impl Into<String>) {
        self.current_file_name = name.into();
    }

    pub fn current_file_name(&self) -> &str {
        &self.current_file_name
    }

    pub fn set_initial_header_level(&mut self, level: usize) {
        self.initial_header_level = level.max(1);
    }

    pub fn initial_header_level(&self) -> usize {
        self.initial_header_level
    }

    /// Heading level for an underline letter.
    ///
    /// Each distinct letter maps to the next free level the first time it is
    /// seen; afterwards the same letter always yields the same level.
    pub fn level_for(&mut self, letter: char) -> usize {
        if let Some(index) = self.title_letters.iter().position(|l| *l == letter) {
            return index + 1;
        }

        self.title_letters.push(letter);
        self.title_letters.len()
    }

    pub fn title_letters(&self) -> &[char] {
        &self.title_letters
    }

    pub fn set_variable(&mut self, name: impl Into<String>, value: Node) {
        self.variables.insert(name.into(), value);
    }

    pub fn variable(&self, name: &str) -> Option<&Node> {
        self.variables.get(name)
    }

    /// Record a named link target. The reserved name `_` assigns the url to
    /// the oldest pending anonymous reference instead.
    pub fn set_link(&mut self, name: &str, url: &str) {
        let mut name = name.trim().to_lowercase();

        if name == "_" {
            if self.anonymous.is_empty() {
                return;
            }

            name = self.anonymous.remove(0);
        }

        self.links.insert(name, url.trim().to_string());
    }

    pub fn link(&self, name: &str) -> Option<&str> {
        self.links.get(&name.trim().to_lowercase()).map(String::as_str)
    }

    pub fn links(&self) -> &HashMap<String, String> {
        &self.links
    }

    pub fn reset_anonymous_stack(&mut self) {
        self.anonymous.clear();
    }

    pub fn push_anonymous(&mut self, name: &str) {
        self.anonymous.push(name.trim().to_lowercase());
    }

    pub fn add_dependency(&mut self, file: &str) {
        if self.dependencies.iter().any(|d| d == file) {
            return;
        }

        self.dependencies.push(file.to_string());
    }

    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    /// Turn arbitrary text into an anchor-safe slug.
    pub fn slugify(text: &str) -> String {
        let mut slug = String::with_capacity(text.len());
        let mut previous_dash = true;

        for ch in text.chars() {
            if ch.is_ascii_alphanumeric() {
                slug.push(ch.to_ascii_lowercase());
                previous_dash = false;
            } else if !previous_dash {
                slug.push('-');
                previous_dash = true;
            }
        }

        while slug.ends_with('-') {
            slug.pop();
        }

        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn environment() -> Environment {
        Environment::new(Rc::new(ErrorManager::new()))
    }

    #[test]
    fn test_level_for_assigns_levels_in_first_seen_order() {
        let mut env = environment();
        assert_eq!(env.level_for('='), 1);
        assert_eq!(env.level_for('-'), 2);
        assert_eq!(env.level_for('='), 1);
        assert_eq!(env.level_for('~'), 3);
    }

    #[test]
    fn test_set_link_normalizes_name() {
        let mut env = environment();
        env.set_link("  My Link ", " https://example.com ");
        assert_eq!(env.link("my link"), Some("https://example.com"));
    }

    #[test]
    fn test_anonymous_links_resolve_in_fifo_order() {
        let mut env = environment();
        env.push_anonymous("first");
        env.push_anonymous("second");
        env.set_link("_", "https://one.example");
        env.set_link("_", "https://two.example");
        assert_eq!(env.link("first"), Some("https://one.example"));
        assert_eq!(env.link("second"), Some("https://two.example"));
    }

    #[test]
    fn test_slugify() {
        assert_eq!(Environment::slugify("Hello, World!"), "hello-world");
        assert_eq!(Environment::slugify("  a  b  "), "a-b");
        assert_eq!(Environment::slugify("---"), "");
    }

    #[test]
    fn test_error_manager_counts_only_errors() {
        let manager = ErrorManager::new();
        manager.warning("w");
        manager.error("e");
        assert_eq!(manager.error_count(), 1);
        assert_eq!(manager.errors(), vec!["e".to_string()]);
    }
}
