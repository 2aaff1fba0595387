//! Resolved bindings for identifier occurrences.
//!
//! A binding is a read-only semantic fact reported by an external front-end:
//! what one identifier occurrence refers to. The resolver never computes
//! bindings itself, it only consumes them.

use indexmap::IndexSet;
use crate::name::ClassName;
use crate::signature::{FieldSignature, MethodRef, MethodSignature};

/// What an identifier occurrence refers to.
///
/// This is a closed set: a resolver matches it exhaustively and treats
/// everything it doesn't rewrite as [`Binding::Other`].
#[derive(Debug, Clone)]
pub enum Binding {
	Method(MethodBinding),
	Variable(VariableBinding),
	Type(TypeBinding),
	/// Labels, packages, annotations and the like. Never rewritten.
	Other,
}

/// A resolved method or constructor occurrence.
#[derive(Debug, Clone)]
pub struct MethodBinding {
	/// The class declaring the method.
	///
	/// `None` when the declaring type cannot be introspected, which happens
	/// for types outside the analysed source set. Such occurrences are
	/// skipped, not failed on.
	pub declaring_class: Option<ClassName>,
	pub signature: MethodSignature,
	pub is_constructor: bool,
	/// The declarations this method overrides, direct and transitive, with
	/// their declared (pre erasure) signatures.
	pub overridden: IndexSet<MethodRef>,
}

impl MethodBinding {
	/// Does this method override the given declaration?
	pub fn overrides(&self, declaration: &MethodRef) -> bool {
		self.overridden.contains(declaration)
	}
}

/// A resolved variable occurrence: a field, a local or a parameter.
#[derive(Debug, Clone)]
pub struct VariableBinding {
	/// `false` for locals and parameters; only fields are remapped.
	pub is_field: bool,
	/// The class declaring the field, `None` when it cannot be introspected.
	pub declaring_class: Option<ClassName>,
	pub signature: FieldSignature,
}

/// A resolved type reference.
#[derive(Debug, Clone)]
pub struct TypeBinding {
	/// `None` when the type cannot be introspected.
	pub name: Option<ClassName>,
}
