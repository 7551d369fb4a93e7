//! Component classes - the result of extending a base element type.

use std::collections::BTreeSet;
use std::fmt;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::marker::PhantomData;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::engine::ComponentRegistry;

use super::{Component, Element};

/// Source of per-class scope tags for css class names.
static NEXT_SCOPE: AtomicU64 = AtomicU64::new(1);

struct ClassInfo {
    /// Advertised to the host, in order.
    observed: Vec<String>,
    /// Every name that got a property accessor on this base type.
    accessors: BTreeSet<String>,
    scope: u64,
}

/// A base element type `H` extended with observed attributes.
///
/// Cloning is cheap; clones share the attribute list.
pub struct ComponentClass<H: Element> {
    info: Rc<ClassInfo>,
    _host: PhantomData<fn() -> H>,
}

/// Extend the base element type `H` with property accessors for `attributes`.
///
/// ```ignore
/// let class = extend::<MyElement>(&["open", "items"]);
/// assert_eq!(class.observed_attributes(), ["open", "items"]);
/// ```
pub fn extend<H: Element>(attributes: &[&str]) -> ComponentClass<H> {
    let observed: Vec<String> = attributes.iter().map(|name| name.to_string()).collect();
    let accessors = observed.iter().cloned().collect();
    ComponentClass::from_info(ClassInfo {
        observed,
        accessors,
        scope: NEXT_SCOPE.fetch_add(1, Ordering::Relaxed),
    })
}

impl<H: Element> ComponentClass<H> {
    fn from_info(info: ClassInfo) -> Self {
        Self {
            info: Rc::new(info),
            _host: PhantomData,
        }
    }

    /// Attribute names the host should observe, in the order given.
    pub fn observed_attributes(&self) -> &[String] {
        &self.info.observed
    }

    /// Whether `name` has a property accessor.
    pub fn has_accessor(&self, name: &str) -> bool {
        self.info.accessors.contains(name)
    }

    /// Extend the same base type again.
    ///
    /// The observed list becomes `attributes`. Accessors installed by earlier
    /// calls stay usable; each accessor is independent of the others.
    pub fn extend(&self, attributes: &[&str]) -> Self {
        let observed: Vec<String> = attributes.iter().map(|name| name.to_string()).collect();
        let mut accessors = self.info.accessors.clone();
        accessors.extend(observed.iter().cloned());
        Self::from_info(ClassInfo {
            observed,
            accessors,
            scope: self.info.scope,
        })
    }

    /// Create a component on the default registry.
    pub fn instantiate(&self, host: H) -> Component<H> {
        self.instantiate_in(host, ComponentRegistry::global())
    }

    /// Create a component bound to a specific registry.
    pub fn instantiate_in(&self, host: H, registry: ComponentRegistry) -> Component<H> {
        Component::new(self.clone(), host, registry)
    }

    /// Class name scoped to this component class.
    ///
    /// Differs from `class` and is the same on every call for the same class.
    pub fn scoped_css_class(&self, class: &str) -> String {
        let mut hasher = DefaultHasher::new();
        class.hash(&mut hasher);
        self.info.scope.hash(&mut hasher);
        format!("{class}-{:08x}", hasher.finish() as u32)
    }
}

impl<H: Element> Clone for ComponentClass<H> {
    fn clone(&self) -> Self {
        Self {
            info: Rc::clone(&self.info),
            _host: PhantomData,
        }
    }
}

impl<H: Element> fmt::Debug for ComponentClass<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentClass")
            .field("host", &std::any::type_name::<H>())
            .field("observed", &self.info.observed)
            .field("accessors", &self.info.accessors)
            .finish()
    }
}
