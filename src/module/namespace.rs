use std::fmt;
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::{Error, Result};
use super::manager::RequestManager;
use super::member::{bind, Member};
use super::method::Method;
use super::munger::Params;
use super::registry::{attach_specs, ModuleSpec};
use crate::constants::ROOT_MODULE;
use crate::libs::trail::save_log_to_file;

/// What a name on a module resolves to: members win over submodules.
#[derive(Clone, Debug)]
pub enum Attr {
    Member(Member),
    Submodule(Arc<Module>),
}

/// A namespace in the client's module tree.
///
/// Members and submodules live in concurrent maps so a module can be extended
/// through `&self` while other tasks are calling into it. Lookups clone the
/// member out before any request is sent; no map guard is held across a
/// transport call, and a call already in flight keeps the member it resolved
/// even if the name is rebound meanwhile.
pub struct Module {
    name: String,
    path: String,
    kind: &'static str,
    manager: Arc<RequestManager>,
    members: DashMap<String, Member>,
    submodules: DashMap<String, Arc<Module>>,
    defaults: DashMap<String, Value>,
}

impl Module {
    pub(crate) fn new(
        name: impl Into<String>,
        path: String,
        kind: &'static str,
        manager: Arc<RequestManager>,
    ) -> Self {
        Self {
            name: name.into(),
            path,
            kind,
            manager,
            members: DashMap::new(),
            submodules: DashMap::new(),
            defaults: DashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Dotted path from the root, e.g. `module2.submodule1`. Empty for the root.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn manager(&self) -> &Arc<RequestManager> {
        &self.manager
    }

    pub(crate) fn display_path(&self) -> &str {
        if self.path.is_empty() {
            ROOT_MODULE
        } else {
            &self.path
        }
    }

    /// Bind and install every `(name, descriptor)` pair, replacing whatever was
    /// bound under the same name before.
    ///
    /// All descriptors are bound before any is installed, so a refused
    /// endpoint leaves the module exactly as it was.
    pub fn attach_methods<I, N>(&self, methods: I) -> Result<()>
    where
        I: IntoIterator<Item = (N, Method)>,
        N: Into<String>,
    {
        let bound = methods
            .into_iter()
            .map(|(name, method)| Ok((name.into(), bind(method, &self.manager)?)))
            .collect::<Result<Vec<(String, Member)>>>()?;

        for (name, member) in bound {
            save_log_to_file(&format!(
                "[module] {}.{name} -> {}{}",
                self.display_path(),
                member.descriptor().rpc_endpoint(),
                if member.is_property() { " (property)" } else { "" }
            ));
            self.members.insert(name, member);
        }
        Ok(())
    }

    pub fn attach_method(&self, name: impl Into<String>, method: Method) -> Result<()> {
        self.attach_methods([(name.into(), method)])
    }

    /// Instantiate `specs` as new submodules of this module, sharing its
    /// transport handle. Names already taken by a member or submodule fail
    /// the whole call before anything is attached.
    pub fn attach_modules<I, N>(&self, specs: I) -> Result<()>
    where
        I: IntoIterator<Item = (N, ModuleSpec)>,
        N: Into<String>,
    {
        let specs: Vec<(String, ModuleSpec)> =
            specs.into_iter().map(|(n, s)| (n.into(), s)).collect();
        attach_specs(self, &specs)
    }

    pub fn member(&self, name: &str) -> Result<Member> {
        self.members
            .get(name)
            .map(|m| m.value().clone())
            .ok_or_else(|| self.unknown(name))
    }

    pub fn get_submodule(&self, name: &str) -> Result<Arc<Module>> {
        self.submodules
            .get(name)
            .map(|m| Arc::clone(m.value()))
            .ok_or_else(|| self.unknown(name))
    }

    /// Attribute-style lookup: a member, else a submodule, else `UnknownMember`.
    pub fn attr(&self, name: &str) -> Result<Attr> {
        if let Some(member) = self.members.get(name) {
            return Ok(Attr::Member(member.value().clone()));
        }
        self.get_submodule(name).map(Attr::Submodule)
    }

    /// Walk a dotted submodule path. An empty path is this module.
    pub fn resolve(self: &Arc<Self>, path: &str) -> Result<Arc<Module>> {
        let mut current = Arc::clone(self);
        for segment in path.split('.').filter(|s| !s.is_empty()) {
            current = current.get_submodule(segment)?;
        }
        Ok(current)
    }

    /// Invoke method `name` with positional `args`.
    pub async fn call(&self, name: &str, args: Params) -> Result<Value> {
        match self.member(name)? {
            Member::Method(method) => method.call(self, args).await,
            Member::Property(_) => Err(Error::NotCallable {
                name: name.to_string(),
            }),
        }
    }

    /// Read property `name`. Each read is a fresh round trip.
    pub async fn get(&self, name: &str) -> Result<Value> {
        match self.member(name)? {
            Member::Property(property) => property.get(self).await,
            Member::Method(_) => Err(Error::NotProperty {
                name: name.to_string(),
            }),
        }
    }

    pub async fn call_as<T: DeserializeOwned>(&self, name: &str, args: Params) -> Result<T> {
        let value = self.call(name, args).await?;
        serde_json::from_value(value).map_err(|e| Error::decode(name, e))
    }

    pub async fn get_as<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let value = self.get(name).await?;
        serde_json::from_value(value).map_err(|e| Error::decode(name, e))
    }

    /// Module-scoped setting visible to leading mungers (e.g. `default_block`).
    pub fn set_default(&self, key: impl Into<String>, value: Value) {
        self.defaults.insert(key.into(), value);
    }

    pub fn default_value(&self, key: &str) -> Option<Value> {
        self.defaults
            .get(key)
            .map(|v| v.value().clone())
            .filter(|v| !v.is_null())
    }

    pub fn has_member(&self, name: &str) -> bool {
        self.members.contains_key(name)
    }

    pub fn has_submodule(&self, name: &str) -> bool {
        self.submodules.contains_key(name)
    }

    pub fn member_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.members.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    pub fn submodule_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.submodules.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    pub(crate) fn insert_submodule(&self, name: String, module: Arc<Module>) -> Result<()> {
        match self.submodules.entry(name) {
            Entry::Occupied(taken) => Err(Error::SpecBuild(format!(
                "`{}` already has a submodule named `{}`",
                self.display_path(),
                taken.key()
            ))),
            Entry::Vacant(slot) => {
                slot.insert(module);
                Ok(())
            }
        }
    }

    fn unknown(&self, name: &str) -> Error {
        Error::UnknownMember {
            module: self.display_path().to_string(),
            name: name.to_string(),
        }
    }
}

impl fmt::Debug for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Module")
            .field("path", &self.display_path())
            .field("kind", &self.kind)
            .field("members", &self.member_names())
            .field("submodules", &self.submodule_names())
            .finish()
    }
}
