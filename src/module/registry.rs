//! Building module trees from declarative specs.
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::error::{Error, Result};
use super::manager::RequestManager;
use super::method::Method;
use super::namespace::Module;
use crate::constants::ROOT_MODULE;
use crate::libs::trail::save_log_to_file;

/// A kind of module: the built-in members and defaults every instance of it
/// starts with.
pub trait ModuleKind: Send + Sync {
    /// Short label used in logs and `Debug` output.
    fn kind(&self) -> &'static str;

    fn methods(&self) -> Vec<(&'static str, Method)> {
        Vec::new()
    }

    fn defaults(&self) -> Vec<(&'static str, Value)> {
        Vec::new()
    }
}

/// A module with nothing built in, to be filled through `attach_methods`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainModule;

impl ModuleKind for PlainModule {
    fn kind(&self) -> &'static str {
        "module"
    }
}

/// One node of a module tree: a bare kind, or a kind plus named children.
#[derive(Clone)]
pub enum ModuleSpec {
    Bare(Arc<dyn ModuleKind>),
    Nested(Arc<dyn ModuleKind>, Vec<(String, ModuleSpec)>),
}

impl ModuleSpec {
    pub fn bare(kind: impl ModuleKind + 'static) -> Self {
        Self::Bare(Arc::new(kind))
    }

    pub fn plain() -> Self {
        Self::bare(PlainModule)
    }

    pub fn nested<I, N>(kind: impl ModuleKind + 'static, children: I) -> Self
    where
        I: IntoIterator<Item = (N, ModuleSpec)>,
        N: Into<String>,
    {
        Self::Nested(
            Arc::new(kind),
            children.into_iter().map(|(n, s)| (n.into(), s)).collect(),
        )
    }

    pub fn kind(&self) -> &dyn ModuleKind {
        match self {
            Self::Bare(kind) | Self::Nested(kind, _) => kind.as_ref(),
        }
    }

    pub fn children(&self) -> &[(String, ModuleSpec)] {
        match self {
            Self::Bare(_) => &[],
            Self::Nested(_, children) => children,
        }
    }
}

impl fmt::Debug for ModuleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bare(kind) => write!(f, "Bare({})", kind.kind()),
            Self::Nested(kind, children) => f
                .debug_tuple("Nested")
                .field(&kind.kind())
                .field(children)
                .finish(),
        }
    }
}

/// Instantiate `root` and everything below it, all sharing `manager`.
///
/// The whole tree is validated first, so a malformed spec fails before any
/// module exists. Later `attach_methods` calls may shadow built-ins freely.
pub fn build(root: &ModuleSpec, manager: Arc<RequestManager>) -> Result<Arc<Module>> {
    validate("", root)?;
    let module = instantiate(ROOT_MODULE, String::new(), root, &manager)?;
    save_log_to_file(&format!(
        "[registry] built {} with {:?}",
        ROOT_MODULE,
        module.submodule_names()
    ));
    Ok(module)
}

/// Attach `specs` below an existing module (runtime `attach_modules`).
pub(crate) fn attach_specs(parent: &Module, specs: &[(String, ModuleSpec)]) -> Result<()> {
    let taken: HashSet<String> = parent
        .member_names()
        .into_iter()
        .chain(parent.submodule_names())
        .collect();
    validate_children(parent.path(), &taken, specs)?;
    for (name, spec) in specs {
        validate(&child_path(parent.path(), name), spec)?;
    }

    // instantiate everything first; a kind whose endpoint the transport
    // refuses must not leave earlier siblings attached
    let children = specs
        .iter()
        .map(|(name, spec)| {
            let child = instantiate(name, child_path(parent.path(), name), spec, parent.manager())?;
            Ok((name.clone(), child))
        })
        .collect::<Result<Vec<_>>>()?;
    for (name, child) in children {
        parent.insert_submodule(name, child)?;
    }
    save_log_to_file(&format!(
        "[registry] attached {:?} to {}",
        specs.iter().map(|(n, _)| n.as_str()).collect::<Vec<_>>(),
        parent.display_path()
    ));
    Ok(())
}

fn validate(path: &str, spec: &ModuleSpec) -> Result<()> {
    let builtins: HashSet<String> = spec
        .kind()
        .methods()
        .into_iter()
        .map(|(name, _)| name.to_string())
        .collect();
    validate_children(path, &builtins, spec.children())?;
    for (name, child) in spec.children() {
        validate(&child_path(path, name), child)?;
    }
    Ok(())
}

/// Sibling names must be identifiers, unique, and clear of `taken`.
fn validate_children(
    path: &str,
    taken: &HashSet<String>,
    children: &[(String, ModuleSpec)],
) -> Result<()> {
    let shown = if path.is_empty() { ROOT_MODULE } else { path };
    let mut seen = HashSet::new();
    for (name, _) in children {
        if !is_valid_name(name) {
            return Err(Error::SpecBuild(format!(
                "`{name}` under `{shown}` is not a valid module name"
            )));
        }
        if !seen.insert(name.as_str()) {
            return Err(Error::SpecBuild(format!(
                "`{shown}` lists submodule `{name}` more than once"
            )));
        }
        if taken.contains(name) {
            return Err(Error::SpecBuild(format!(
                "`{shown}` already has an attribute named `{name}`"
            )));
        }
    }
    Ok(())
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn child_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}.{name}")
    }
}

fn instantiate(
    name: &str,
    path: String,
    spec: &ModuleSpec,
    manager: &Arc<RequestManager>,
) -> Result<Arc<Module>> {
    let kind = spec.kind();
    let module = Module::new(name, path, kind.kind(), Arc::clone(manager));
    for (key, value) in kind.defaults() {
        module.set_default(key, value);
    }
    module.attach_methods(kind.methods())?;

    let module = Arc::new(module);
    for (child_name, child_spec) in spec.children() {
        let child = instantiate(
            child_name,
            child_path(module.path(), child_name),
            child_spec,
            manager,
        )?;
        module.insert_submodule(child_name.clone(), child)?;
    }
    Ok(module)
}
