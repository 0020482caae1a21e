//! Cross-reference registry and render-time resolver.
//!
//! Role/cross-reference tokens (`` :doc:`page` ``, `` :ref:`anchor` ``) are
//! registered here while parsing and resolved while rendering. Resolution is
//! always best-effort: an unknown role or target logs one error, records an
//! invalid link and returns `None`, and the renderer falls back to the
//! reference's display text. Nothing in this module ever aborts a parse.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::environment::{Environment, ErrorManager};

/// A successfully resolved cross-reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedReference {
    /// Referenced file, when the target is another document.
    pub file: Option<String>,
    pub title: String,
    pub url: String,
}

/// A reference that could not be resolved, kept for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidLink {
    pub name: String,
}

/// Known reference targets, seeded by the external driver (or by anchors
/// found during parsing): target name to (title, url).
pub type TargetTable = HashMap<String, (String, String)>;

/// One role's resolution strategy.
pub trait ReferenceResolver {
    fn role(&self) -> &str;

    /// Called at parse time when a reference with this role is seen.
    fn found(&self, environment: &mut Environment, data: &str);

    /// Called at render time. `None` means the target is unknown.
    fn resolve(
        &self,
        environment: &Environment,
        data: &str,
        targets: &TargetTable,
    ) -> Option<ResolvedReference>;
}

/// `:doc:` - a reference to another document of the project.
pub struct DocResolver;

impl ReferenceResolver for DocResolver {
    fn role(&self) -> &str {
        "doc"
    }

    fn found(&self, environment: &mut Environment, data: &str) {
        environment.add_dependency(data);
    }

    fn resolve(
        &self,
        _environment: &Environment,
        data: &str,
        targets: &TargetTable,
    ) -> Option<ResolvedReference> {
        let (title, url) = targets.get(data)?;

        Some(ResolvedReference {
            file: Some(data.to_string()),
            title: title.clone(),
            url: url.clone(),
        })
    }
}

/// `:ref:` - a reference to a named anchor, either declared in the current
/// document (link table) or seeded by the driver (target table).
pub struct RefResolver;

impl ReferenceResolver for RefResolver {
    fn role(&self) -> &str {
        "ref"
    }

    fn found(&self, _environment: &mut Environment, _data: &str) {}

    fn resolve(
        &self,
        environment: &Environment,
        data: &str,
        targets: &TargetTable,
    ) -> Option<ResolvedReference> {
        if let Some(url) = environment.link(data) {
            return Some(ResolvedReference {
                file: None,
                title: data.to_string(),
                url: url.to_string(),
            });
        }

        let (title, url) = targets.get(data)?;

        Some(ResolvedReference {
            file: None,
            title: title.clone(),
            url: url.clone(),
        })
    }
}

/// Name-keyed resolver registry plus the shared target table.
pub struct ReferenceRegistry {
    resolvers: HashMap<String, Box<dyn ReferenceResolver>>,
    targets: TargetTable,
    invalid_links: RefCell<Vec<InvalidLink>>,
    error_manager: Rc<ErrorManager>,
}

impl ReferenceRegistry {
    /// Registry with the default `doc` and `ref` roles.
    pub fn new(error_manager: Rc<ErrorManager>) -> Self {
        let mut registry = Self {
            resolvers: HashMap::new(),
            targets: TargetTable::new(),
            invalid_links: RefCell::new(Vec::new()),
            error_manager,
        };

        registry.register(Box::new(DocResolver));
        registry.register(Box::new(RefResolver));
        registry
    }

    pub fn register(&mut self, resolver: Box<dyn ReferenceResolver>) {
        self.resolvers.insert(resolver.role().to_string(), resolver);
    }

    pub fn add_target(
        &mut self,
        name: impl Into<String>,
        title: impl Into<String>,
        url: impl Into<String>,
    ) {
        self.targets
            .insert(name.into(), (title.into(), url.into()));
    }

    /// Look up a seeded target without logging anything.
    pub fn target(&self, name: &str) -> Option<&(String, String)> {
        self.targets.get(name)
    }

    /// Record an unresolved cross-reference at parse time.
    pub fn found(
        &self,
        environment: &mut Environment,
        domain: Option<&str>,
        section: &str,
        data: &str,
    ) {
        let role = role_key(domain, section);

        match self.resolvers.get(&role) {
            Some(resolver) => resolver.found(environment, data),
            None => self.missing_section_error(environment, &role),
        }
    }

    /// Resolve a cross-reference at render time.
    ///
    /// Unknown roles and unknown targets both log exactly one error and
    /// return `None`; the caller substitutes the display text.
    pub fn resolve(
        &self,
        environment: &Environment,
        domain: Option<&str>,
        section: &str,
        data: &str,
    ) -> Option<ResolvedReference> {
        let role = role_key(domain, section);

        let resolver = match self.resolvers.get(&role) {
            Some(resolver) => resolver,
            None => {
                self.missing_section_error(environment, &role);
                return None;
            }
        };

        let resolved = resolver.resolve(environment, data, &self.targets);

        if resolved.is_none() {
            self.invalid_links.borrow_mut().push(InvalidLink {
                name: data.to_string(),
            });
            self.error_manager
                .error(format!("Reference \"{}\" could not be resolved", data));
        }

        resolved
    }

    pub fn add_invalid_link(&self, name: impl Into<String>) {
        self.invalid_links
            .borrow_mut()
            .push(InvalidLink { name: name.into() });
    }

    pub fn invalid_links(&self) -> Vec<InvalidLink> {
        self.invalid_links.borrow().clone()
    }

    fn missing_section_error(&self, environment: &Environment, role: &str) {
        let location = if environment.current_file_name().is_empty() {
            String::new()
        } else {
            format!(" in \"{}\"", environment.current_file_name())
        };

        self.error_manager
            .error(format!("Unknown reference section \"{}\"{}", role, location));
    }
}

fn role_key(domain: Option<&str>, section: &str) -> String {
    match domain {
        Some(domain) if !domain.is_empty() => format!("{}:{}", domain, section),
        _ => section.to_string(),
    }
}
