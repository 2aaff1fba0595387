//! Hierarchy and declared member queries.
//!
//! The resolver never computes a type hierarchy itself; it asks an
//! [`InheritanceProvider`]. Front-ends that already know the hierarchy can
//! back one with a prebuilt table, see [`MapInheritanceProvider`].

use anyhow::Result;
use indexmap::IndexMap;
use crate::name::ClassName;
use crate::signature::MethodSignature;

/// One method declaration of a class, with both its declared and its erased
/// signature.
///
/// For non generic methods the two are the same.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredMethod {
	pub signature: MethodSignature,
	pub erased: MethodSignature,
}

/// Answers hierarchy and declared member queries for a class.
pub trait InheritanceProvider {
	/// The direct superclass.
	///
	/// `None` for `java/lang/Object`, for interfaces and for unknown classes.
	fn super_class(&self, class: &ClassName) -> Result<Option<ClassName>>;

	/// The directly implemented (or, for interfaces, extended) interfaces.
	fn interfaces(&self, class: &ClassName) -> Result<Vec<ClassName>>;

	fn is_interface(&self, class: &ClassName) -> Result<bool>;

	/// The methods the class declares itself, not the inherited ones.
	fn declared_methods(&self, class: &ClassName) -> Result<Vec<DeclaredMethod>>;
}

/// Collects all ancestors of `class` into one ordered list.
///
/// The order is a contract the resolver's hierarchy scan depends on: the
/// superclass comes first, directly followed by its own ancestors, then each
/// direct interface followed by its ancestors. `java/lang/Object` is never
/// part of the list. A class reachable along several paths (diamond interface
/// inheritance) appears once per path; callers that scan the whole list rely
/// on the position of the later occurrence.
pub fn collect_ancestors(provider: &impl InheritanceProvider, class: &ClassName) -> Result<Vec<ClassName>> {
	let mut ancestors = Vec::new();

	let mut stack = Vec::new();
	push_direct_supertypes(provider, class, &mut stack)?;

	while let Some(current) = stack.pop() {
		push_direct_supertypes(provider, &current, &mut stack)?;
		ancestors.push(current);
	}

	Ok(ancestors)
}

/// Pushes the direct supertypes in reverse, so that popping visits the
/// superclass before the interfaces, each in declaration order.
fn push_direct_supertypes(provider: &impl InheritanceProvider, class: &ClassName, stack: &mut Vec<ClassName>) -> Result<()> {
	let mut interfaces = provider.interfaces(class)?;
	interfaces.reverse();
	stack.extend(interfaces);

	if !provider.is_interface(class)? {
		if let Some(super_class) = provider.super_class(class)? {
			if !super_class.is_java_lang_object() {
				stack.push(super_class);
			}
		}
	}

	Ok(())
}

/// The facts [`MapInheritanceProvider`] stores per class.
#[derive(Debug, Clone, Default)]
pub struct ClassInfo {
	pub super_class: Option<ClassName>,
	pub interfaces: Vec<ClassName>,
	pub is_interface: bool,
	pub declared_methods: Vec<DeclaredMethod>,
}

/// An [`InheritanceProvider`] backed by a prebuilt table of class facts.
///
/// Classes missing from the table are treated as not introspectable: no
/// superclass, no interfaces, no declared methods.
#[derive(Debug, Clone, Default)]
pub struct MapInheritanceProvider {
	pub classes: IndexMap<ClassName, ClassInfo>,
}

impl InheritanceProvider for MapInheritanceProvider {
	fn super_class(&self, class: &ClassName) -> Result<Option<ClassName>> {
		Ok(self.classes.get(class).and_then(|info| info.super_class.clone()))
	}

	fn interfaces(&self, class: &ClassName) -> Result<Vec<ClassName>> {
		Ok(self.classes.get(class).map(|info| info.interfaces.clone()).unwrap_or_default())
	}

	fn is_interface(&self, class: &ClassName) -> Result<bool> {
		Ok(self.classes.get(class).is_some_and(|info| info.is_interface))
	}

	fn declared_methods(&self, class: &ClassName) -> Result<Vec<DeclaredMethod>> {
		Ok(self.classes.get(class).map(|info| info.declared_methods.clone()).unwrap_or_default())
	}
}

/// An [`InheritanceProvider`] that knows nothing.
pub struct NoInheritanceProvider;

impl NoInheritanceProvider {
	pub fn new() -> &'static NoInheritanceProvider {
		static INSTANCE: NoInheritanceProvider = NoInheritanceProvider;
		&INSTANCE
	}
}

impl InheritanceProvider for NoInheritanceProvider {
	fn super_class(&self, _class: &ClassName) -> Result<Option<ClassName>> {
		Ok(None)
	}

	fn interfaces(&self, _class: &ClassName) -> Result<Vec<ClassName>> {
		Ok(Vec::new())
	}

	fn is_interface(&self, _class: &ClassName) -> Result<bool> {
		Ok(false)
	}

	fn declared_methods(&self, _class: &ClassName) -> Result<Vec<DeclaredMethod>> {
		Ok(Vec::new())
	}
}
