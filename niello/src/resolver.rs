//! Resolving identifier occurrences against a [`MappingSet`].
//!
//! For each occurrence the resolver figures out the one deobfuscated
//! identifier it should be spelled as, and produces a [`Rewrite`] when the
//! current spelling differs. Method occurrences follow the inheritance
//! hierarchy: a call to an inherited or overridden method resolves against
//! the mapping declared on the class that actually declares the signature.
//!
//! "Mapping not found" is not an error, it is the normal terminal outcome:
//! the occurrence is left alone. The only other skip is an occurrence whose
//! declaring type cannot be introspected at all (types outside the analysed
//! source set); that is a known limitation of the binding information, not a
//! failure.

use anyhow::Result;
use java_string::JavaString;
use log::trace;
use burin::binding::{Binding, MethodBinding, TypeBinding, VariableBinding};
use burin::inheritance::{collect_ancestors, InheritanceProvider};
use burin::name::ClassName;
use burin::signature::MethodRef;
use crate::tree::mappings::{ClassMapping, MappingSet};

/// A byte range in the source text of a compilation unit.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Span {
	pub start: usize,
	pub end: usize,
}

/// One identifier occurrence: where it is, how it is currently spelled, and
/// what it refers to.
#[derive(Debug, Clone)]
pub struct Occurrence {
	pub span: Span,
	pub text: JavaString,
	pub binding: Binding,
}

/// An instruction to replace the text of one span.
///
/// Applying rewrites to the source text is up to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
	pub span: Span,
	pub replacement: JavaString,
}

/// Which identifiers get rewritten.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Mode {
	/// Rewrites method, constructor and field identifiers, plus type
	/// references.
	#[default]
	Full,
	/// Rewrites only method, constructor and field identifiers.
	Simple,
}

/// Resolves occurrences of one or more compilation units against a mapping
/// set.
///
/// Holds the mapping set mutably: resolution lazily creates missing class
/// mappings and completes inherited method views, but never deletes.
pub struct Resolver<'a, I> {
	mappings: &'a mut MappingSet,
	inheritance: &'a I,
	mode: Mode,
}

impl<'a, I: InheritanceProvider> Resolver<'a, I> {
	pub fn new(mappings: &'a mut MappingSet, inheritance: &'a I, mode: Mode) -> Resolver<'a, I> {
		Resolver { mappings, inheritance, mode }
	}

	/// Resolves every occurrence of a compilation unit, in order, and returns
	/// rewrites for the ones whose identifier changes.
	///
	/// Occurrences already spelled like their resolved name produce no
	/// rewrite, so a second pass over already rewritten text yields nothing.
	pub fn resolve_unit(&mut self, occurrences: &[Occurrence]) -> Result<Vec<Rewrite>> {
		let mut rewrites = Vec::new();

		for occurrence in occurrences {
			if let Some(replacement) = self.resolve_occurrence(occurrence)? {
				if occurrence.text != replacement {
					rewrites.push(Rewrite { span: occurrence.span, replacement });
				}
			}
		}

		Ok(rewrites)
	}

	fn resolve_occurrence(&mut self, occurrence: &Occurrence) -> Result<Option<JavaString>> {
		match &occurrence.binding {
			Binding::Method(binding) => self.resolve_method(binding),
			Binding::Variable(binding) => self.resolve_field(binding),
			Binding::Type(binding) if self.mode == Mode::Full => self.resolve_type(binding),
			Binding::Type(_) => Ok(None),
			Binding::Other => Ok(None),
		}
	}

	fn resolve_method(&mut self, binding: &MethodBinding) -> Result<Option<JavaString>> {
		let Some(declaring_class) = &binding.declaring_class else {
			trace!("skipping method occurrence {:?}: declaring type not introspectable", binding.signature);
			return Ok(None);
		};

		// a class nobody mapped still resolves, as an identity mapping
		let class_mapping = self.mappings.get_or_create_class(declaring_class)?;

		if binding.is_constructor {
			// a constructor is always spelled like its class, whichever
			// overload this is
			return Ok(Some(class_mapping.simple_deobf_name().to_owned()));
		}

		self.mappings.complete(self.inheritance, declaring_class)?;

		if let Some(mapping) = find_member_mapping(self.mappings, declaring_class, |class| class.get_method(&binding.signature)) {
			return Ok(Some(mapping.deobf_name.as_inner().to_owned()));
		}

		// The exact lookup missed: with generics involved, the signature at
		// the call site only matches an ancestor's declaration after erasure.
		// Scan the hierarchy for declarations this method overrides; the last
		// matching ancestor wins.
		let mut found = None;
		for ancestor in collect_ancestors(self.inheritance, declaring_class)? {
			if self.mappings.get_class(&ancestor).is_none() {
				continue;
			}

			for declared in self.inheritance.declared_methods(&ancestor)? {
				let declaration = MethodRef {
					class: ancestor.clone(),
					signature: declared.signature,
				};
				if binding.overrides(&declaration) {
					found = find_member_mapping(self.mappings, &ancestor, |class| class.get_method(&declared.erased))
						.map(|mapping| mapping.deobf_name.as_inner().to_owned());
				}
			}
		}

		Ok(found)
	}

	fn resolve_field(&mut self, binding: &VariableBinding) -> Result<Option<JavaString>> {
		if !binding.is_field {
			return Ok(None);
		}

		let Some(declaring_class) = &binding.declaring_class else {
			trace!("skipping field occurrence {:?}: declaring type not introspectable", binding.signature);
			return Ok(None);
		};

		// unlike methods there's no get-or-create and no hierarchy walk: a
		// field is only ever remapped against its exact declaring class
		Ok(find_member_mapping(self.mappings, declaring_class, |class| class.get_field(&binding.signature))
			.map(|mapping| mapping.deobf_name.as_inner().to_owned()))
	}

	fn resolve_type(&mut self, binding: &TypeBinding) -> Result<Option<JavaString>> {
		let Some(name) = &binding.name else {
			trace!("skipping type occurrence: type not introspectable");
			return Ok(None);
		};

		Ok(self.mappings.get_class(name).map(|class| class.simple_deobf_name().to_owned()))
	}
}

/// Looks up a member mapping on a class, falling back to the anonymous class
/// heuristics when the direct lookup finds nothing.
fn find_member_mapping<'m, M>(
	mappings: &'m MappingSet,
	class: &ClassName,
	lookup: impl Fn(&'m ClassMapping) -> Option<&'m M>,
) -> Option<&'m M> {
	let class_mapping = mappings.get_class(class)?;

	lookup(class_mapping)
		.or_else(|| find_member_mapping_anon_class(mappings, class_mapping, lookup))
}

/// Compensates for anonymous classes being numbered differently between two
/// obfuscation runs: the member mapping may live on a sibling that carries
/// this class's number.
///
/// Best effort identity recovery; a numerically coincident but unrelated
/// sibling can match. No further signal is consulted.
fn find_member_mapping_anon_class<'m, M>(
	mappings: &'m MappingSet,
	class_mapping: &'m ClassMapping,
	lookup: impl Fn(&'m ClassMapping) -> Option<&'m M>,
) -> Option<&'m M> {
	// if neither name is different, there's no renumbering to undo
	if class_mapping.obf_name == class_mapping.deobf_name {
		return None;
	}
	// anonymous classes must be inner classes...
	let parent = class_mapping.parent.as_ref()?;
	// ...and are named by a plain number
	if !class_mapping.obf_name.chars().all(|x| x.is_ascii_digit()) {
		return None;
	}

	// a sibling whose obfuscated name is our deobfuscated name
	if let Some(other) = mappings.inner_class_by_obf(parent, &class_mapping.deobf_name) {
		if let Some(mapping) = lookup(other) {
			return Some(mapping);
		}
	}

	// a sibling whose deobfuscated name is our obfuscated name
	let other = mappings.inner_class_by_deobf(parent, &class_mapping.obf_name)?;
	lookup(other)
}
