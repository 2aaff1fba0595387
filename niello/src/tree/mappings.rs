//! The mapping tree: one renaming entry per class, field and method.
//!
//! Every class mapping node, top level or inner, lives in one flat map keyed
//! by its fully qualified obfuscated name; inner classes link back to their
//! enclosing class by name. This keeps lookups by binary name a single map
//! hit while still allowing walks over a class's inner classes.

use anyhow::{anyhow, bail, Context, Result};
use indexmap::map::Entry;
use indexmap::{IndexMap, IndexSet};
use java_string::{JavaStr, JavaString};
use log::trace;
use burin::inheritance::InheritanceProvider;
use burin::name::{ClassName, FieldName, MethodName};
use burin::signature::{FieldSignature, MethodSignature};

/// The root collection of class mappings.
#[derive(Debug, Clone, Default)]
pub struct MappingSet {
	classes: IndexMap<ClassName, ClassMapping>,
}

impl MappingSet {
	pub fn new() -> MappingSet {
		MappingSet::default()
	}

	/// Adds a class mapping for the given fully qualified obfuscated name.
	///
	/// For an inner class `deobf_name` is the simple inner name and the
	/// enclosing class must have been added before; for a top level class it
	/// is the fully qualified deobfuscated name.
	pub fn add_class(&mut self, name: ClassName, deobf_name: JavaString) -> Result<()> {
		let (parent, obf_name) = match name.split_inner_class() {
			Some((parent, inner)) => {
				let parent = ClassName::new(parent.to_owned())?;
				if !self.classes.contains_key(&parent) {
					bail!("cannot add class mapping {name:?}: enclosing class {parent:?} is unknown");
				}
				(Some(parent), inner.to_owned())
			},
			None => (None, name.as_inner().to_owned()),
		};

		match self.classes.entry(name) {
			Entry::Occupied(e) => {
				bail!("cannot add class mapping for key {:?}, as there's already one: {:?}", e.key(), e.get());
			},
			Entry::Vacant(e) => {
				e.insert(ClassMapping {
					obf_name: obf_name.clone(),
					deobf_name,
					parent: parent.clone(),
					fields: IndexMap::new(),
					methods: IndexMap::new(),
					inner_classes: IndexSet::new(),
					completed: false,
				});
			},
		}

		if let Some(parent) = parent {
			if let Some(parent_node) = self.classes.get_mut(&parent) {
				parent_node.inner_classes.insert(obf_name);
			}
		}

		Ok(())
	}

	pub fn get_class(&self, name: &ClassName) -> Option<&ClassMapping> {
		self.classes.get(name)
	}

	pub fn get_class_mut(&mut self, name: &ClassName) -> Option<&mut ClassMapping> {
		self.classes.get_mut(name)
	}

	/// Gets the class mapping for the given fully qualified obfuscated name,
	/// creating it and any missing enclosing classes as identity mappings
	/// (deobfuscated name equal to the obfuscated one).
	pub fn get_or_create_class(&mut self, name: &ClassName) -> Result<&mut ClassMapping> {
		if !self.classes.contains_key(name) {
			// enclosing classes first, so `a$b$c` synthesizes `a`, then `a$b`
			let mut prefix: Option<JavaString> = None;
			for segment in name.as_inner().split('$') {
				let fq = match prefix.take() {
					None => segment.to_owned(),
					Some(mut parent) => {
						parent.push('$');
						parent.push_java_str(segment);
						parent
					},
				};

				let fq_name = ClassName::new(fq.clone())?;
				if !self.classes.contains_key(&fq_name) {
					self.add_class(fq_name, segment.to_owned())?;
				}

				prefix = Some(fq);
			}
		}

		self.classes.get_mut(name)
			.with_context(|| anyhow!("class mapping {name:?} is missing right after its creation"))
	}

	/// Looks up a direct inner class of `parent` by its simple obfuscated
	/// name.
	pub fn inner_class_by_obf(&self, parent: &ClassName, obf_name: &JavaStr) -> Option<&ClassMapping> {
		self.classes.get(&ClassName::from_inner_class(parent, obf_name))
	}

	/// Looks up a direct inner class of `parent` by its simple deobfuscated
	/// name.
	///
	/// Deobfuscated names need not be unique among siblings (anonymous class
	/// numbers collide across differently obfuscated runs); the first match
	/// in insertion order is returned.
	pub fn inner_class_by_deobf(&self, parent: &ClassName, deobf_name: &JavaStr) -> Option<&ClassMapping> {
		let parent_node = self.classes.get(parent)?;
		parent_node.inner_classes.iter()
			.filter_map(|obf_name| self.classes.get(&ClassName::from_inner_class(parent, obf_name)))
			.find(|inner| inner.deobf_name == *deobf_name)
	}

	/// Completes the class mapping with the methods it inherits: walks the
	/// ancestors of `class` and copies their method mappings into vacant
	/// signature slots, closest ancestor first.
	///
	/// Completion is lazy, idempotent and monotonic: mappings already present
	/// are never overwritten, and a second call is a no-op. Completing a
	/// class that has no mapping does nothing.
	pub fn complete(&mut self, provider: &impl InheritanceProvider, class: &ClassName) -> Result<()> {
		match self.classes.get(class) {
			None => return Ok(()),
			Some(node) if node.completed => return Ok(()),
			Some(_) => {},
		}

		let mut inherited = Vec::new();
		for ancestor in burin::inheritance::collect_ancestors(provider, class)? {
			if let Some(ancestor_node) = self.classes.get(&ancestor) {
				inherited.extend(ancestor_node.methods.values().cloned());
			}
		}
		trace!("completing class mapping {class:?} with {} inherited method mapping candidates", inherited.len());

		let node = self.classes.get_mut(class)
			.with_context(|| anyhow!("class mapping {class:?} vanished during completion"))?;
		for method in inherited {
			node.methods.entry(method.signature.clone()).or_insert(method);
		}
		node.completed = true;

		Ok(())
	}

	pub fn classes(&self) -> impl Iterator<Item = &ClassMapping> {
		self.classes.values()
	}

	pub fn len(&self) -> usize {
		self.classes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.classes.is_empty()
	}
}

/// One class's renaming, plus its member and inner class mappings.
#[derive(Debug, Clone)]
pub struct ClassMapping {
	/// The simple obfuscated name for an inner class, the fully qualified
	/// one for a top level class.
	pub obf_name: JavaString,
	/// Same shape as `obf_name`: simple for inner, fully qualified for top
	/// level classes.
	pub deobf_name: JavaString,
	/// The fully qualified obfuscated name of the enclosing class; `None`
	/// for top level classes.
	pub parent: Option<ClassName>,
	pub fields: IndexMap<FieldSignature, FieldMapping>,
	pub methods: IndexMap<MethodSignature, MethodMapping>,
	/// The simple obfuscated names of the direct inner classes.
	pub(crate) inner_classes: IndexSet<JavaString>,
	/// Whether inherited method mappings have been filled in, see
	/// [`MappingSet::complete`].
	pub(crate) completed: bool,
}

impl ClassMapping {
	pub fn add_field(&mut self, field: FieldMapping) -> Result<()> {
		match self.fields.entry(field.signature.clone()) {
			Entry::Occupied(e) => {
				bail!("cannot add field mapping for key {:?}, as there's already one: {:?}", e.key(), e.get());
			},
			Entry::Vacant(e) => {
				e.insert(field);
			},
		}

		Ok(())
	}

	pub fn add_method(&mut self, method: MethodMapping) -> Result<()> {
		match self.methods.entry(method.signature.clone()) {
			Entry::Occupied(e) => {
				bail!("cannot add method mapping for key {:?}, as there's already one: {:?}", e.key(), e.get());
			},
			Entry::Vacant(e) => {
				e.insert(method);
			},
		}

		Ok(())
	}

	pub fn get_field(&self, signature: &FieldSignature) -> Option<&FieldMapping> {
		self.fields.get(signature)
	}

	pub fn get_method(&self, signature: &MethodSignature) -> Option<&MethodMapping> {
		self.methods.get(signature)
	}

	pub fn is_inner(&self) -> bool {
		self.parent.is_some()
	}

	/// Gets the simple deobfuscated name, i.e. how an identifier referring to
	/// this class is spelled in source.
	pub fn simple_deobf_name(&self) -> &JavaStr {
		self.deobf_name.rsplit_once('/').map_or(&*self.deobf_name, |(_, simple)| simple)
	}
}

/// A renaming entry for one field signature.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMapping {
	pub signature: FieldSignature,
	pub deobf_name: FieldName,
}

/// A renaming entry for one method signature.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodMapping {
	pub signature: MethodSignature,
	pub deobf_name: MethodName,
	/// Parameter renamings by index. Not consulted by identifier resolution,
	/// but part of what mapping files carry.
	pub parameters: IndexMap<usize, ParameterMapping>,
}

impl MethodMapping {
	pub fn new(signature: MethodSignature, deobf_name: MethodName) -> MethodMapping {
		MethodMapping {
			signature,
			deobf_name,
			parameters: IndexMap::new(),
		}
	}

	pub fn add_parameter(&mut self, parameter: ParameterMapping) -> Result<()> {
		match self.parameters.entry(parameter.index) {
			Entry::Occupied(e) => {
				bail!("cannot add parameter mapping for index {:?}, as there's already one: {:?}", e.key(), e.get());
			},
			Entry::Vacant(e) => {
				e.insert(parameter);
			},
		}

		Ok(())
	}
}

/// A renaming entry for one method parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterMapping {
	pub index: usize,
	pub deobf_name: JavaString,
}

#[cfg(test)]
mod testing {
	use pretty_assertions::assert_eq;
	use burin::inheritance::{ClassInfo, MapInheritanceProvider};
	use burin::signature::MethodDescriptor;
	use super::*;

	fn class(name: &str) -> ClassName {
		ClassName::new(name.to_owned()).expect("test class names are valid")
	}

	fn method(name: &str, desc: &str, deobf: &str) -> MethodMapping {
		MethodMapping::new(
			MethodSignature::new(
				MethodName::new(name.to_owned()).expect("test method names are valid"),
				MethodDescriptor::new(desc.to_owned()).expect("test method descriptors are valid"),
			),
			MethodName::new(deobf.to_owned()).expect("test method names are valid"),
		)
	}

	#[test]
	fn get_or_create_synthesizes_enclosing_classes() -> Result<()> {
		let mut mappings = MappingSet::new();
		mappings.get_or_create_class(&class("com/example/a$b$1"))?;

		let top_level = mappings.get_class(&class("com/example/a")).unwrap();
		assert_eq!(top_level.obf_name, "com/example/a");
		assert_eq!(top_level.deobf_name, "com/example/a");
		assert_eq!(top_level.parent, None);

		let inner = mappings.get_class(&class("com/example/a$b")).unwrap();
		assert_eq!(inner.obf_name, "b");
		assert_eq!(inner.deobf_name, "b");
		assert_eq!(inner.parent, Some(class("com/example/a")));

		let anonymous = mappings.get_class(&class("com/example/a$b$1")).unwrap();
		assert_eq!(anonymous.obf_name, "1");
		assert_eq!(anonymous.parent, Some(class("com/example/a$b")));

		// creating again must not disturb anything
		mappings.get_or_create_class(&class("com/example/a$b$1"))?;
		assert_eq!(mappings.len(), 3);
		Ok(())
	}

	#[test]
	fn add_class_rejects_duplicates_and_orphans() -> Result<()> {
		let mut mappings = MappingSet::new();
		mappings.add_class(class("a"), "com/example/A".to_owned().into())?;
		assert!(mappings.add_class(class("a"), "com/example/B".to_owned().into()).is_err());
		assert!(mappings.add_class(class("b$1"), "1".to_owned().into()).is_err());
		Ok(())
	}

	#[test]
	fn inner_class_queries() -> Result<()> {
		let mut mappings = MappingSet::new();
		mappings.add_class(class("p"), "com/example/P".to_owned().into())?;
		mappings.add_class(class("p$1"), "2".to_owned().into())?;
		mappings.add_class(class("p$2"), "1".to_owned().into())?;

		let by_obf = mappings.inner_class_by_obf(&class("p"), JavaStr::from_str("1")).unwrap();
		assert_eq!(by_obf.deobf_name, "2");

		let by_deobf = mappings.inner_class_by_deobf(&class("p"), JavaStr::from_str("1")).unwrap();
		assert_eq!(by_deobf.obf_name, "2");

		assert!(mappings.inner_class_by_obf(&class("p"), JavaStr::from_str("3")).is_none());
		assert!(mappings.inner_class_by_deobf(&class("p"), JavaStr::from_str("3")).is_none());
		Ok(())
	}

	#[test]
	fn complete_is_idempotent_and_never_overwrites() -> Result<()> {
		let mut mappings = MappingSet::new();
		mappings.add_class(class("a"), "com/example/A".to_owned().into())?;
		mappings.add_class(class("b"), "com/example/B".to_owned().into())?;
		mappings.get_class_mut(&class("a")).unwrap().add_method(method("m", "()V", "inherited"))?;
		mappings.get_class_mut(&class("b")).unwrap().add_method(method("n", "()V", "declared"))?;

		let provider = MapInheritanceProvider {
			classes: IndexMap::from([
				(class("b"), ClassInfo { super_class: Some(class("a")), ..ClassInfo::default() }),
			]),
		};

		mappings.complete(&provider, &class("b"))?;
		let b = mappings.get_class(&class("b")).unwrap();
		assert_eq!(b.methods.len(), 2);
		assert_eq!(b.get_method(&method("m", "()V", "inherited").signature).unwrap().deobf_name.as_inner(), "inherited");

		// adding a conflicting mapping on the ancestor afterwards must not
		// leak into the already completed class
		mappings.get_class_mut(&class("a")).unwrap().add_method(method("n", "()V", "shadowed"))?;
		mappings.complete(&provider, &class("b"))?;
		let b = mappings.get_class(&class("b")).unwrap();
		assert_eq!(b.methods.len(), 2);
		assert_eq!(b.get_method(&method("n", "()V", "declared").signature).unwrap().deobf_name.as_inner(), "declared");

		// completing something unknown is fine
		mappings.complete(&provider, &class("zzz"))?;
		Ok(())
	}
}
