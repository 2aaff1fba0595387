//! Descriptors and member signatures.
//!
//! A signature is what identifies a member within its declaring class: the
//! member name plus its descriptor. Signatures are the keys member mappings
//! are stored under.

use std::fmt::{Display, Formatter};
use anyhow::{bail, Result};
use java_string::{JavaStr, JavaString};
use crate::name::{ClassName, FieldName, MethodName};

/// Represents a field descriptor, such as `I` or `Ljava/lang/String;`.
///
/// See [section 4.3.2](https://docs.oracle.com/javase/specs/jvms/se21/html/jvms-4.html#jvms-4.3.2).
#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
pub struct FieldDescriptor(JavaString);

impl FieldDescriptor {
	pub fn new(inner: impl Into<JavaString>) -> Result<FieldDescriptor> {
		let inner = inner.into();
		if inner.is_empty() || inner.starts_with('(') {
			bail!("invalid field descriptor {inner:?}");
		}
		Ok(FieldDescriptor(inner))
	}

	pub fn as_inner(&self) -> &JavaStr {
		&self.0
	}
}

/// Represents a method descriptor, such as `(ILjava/lang/String;)V`.
///
/// See [section 4.3.3](https://docs.oracle.com/javase/specs/jvms/se21/html/jvms-4.html#jvms-4.3.3).
#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
pub struct MethodDescriptor(JavaString);

impl MethodDescriptor {
	pub fn new(inner: impl Into<JavaString>) -> Result<MethodDescriptor> {
		let inner = inner.into();
		if !inner.starts_with('(') || !inner.contains(')') {
			bail!("invalid method descriptor {inner:?}: must be of the form `(...)...`");
		}
		Ok(MethodDescriptor(inner))
	}

	pub fn as_inner(&self) -> &JavaStr {
		&self.0
	}
}

/// The signature of a field: its name and its type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldSignature {
	pub name: FieldName,
	pub desc: FieldDescriptor,
}

impl FieldSignature {
	pub fn new(name: FieldName, desc: FieldDescriptor) -> FieldSignature {
		FieldSignature { name, desc }
	}
}

impl Display for FieldSignature {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}:{}", self.name, DisplayJava(self.desc.as_inner()))
	}
}

/// The signature of a method: its name and its parameter/return descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodSignature {
	pub name: MethodName,
	pub desc: MethodDescriptor,
}

impl MethodSignature {
	pub fn new(name: MethodName, desc: MethodDescriptor) -> MethodSignature {
		MethodSignature { name, desc }
	}
}

impl Display for MethodSignature {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}{}", self.name, DisplayJava(self.desc.as_inner()))
	}
}

/// A method declaration pinpointed to the class declaring it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodRef {
	pub class: ClassName,
	pub signature: MethodSignature,
}

struct DisplayJava<'a>(&'a JavaStr);

impl Display for DisplayJava<'_> {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		self.0.as_str()
			.map_err(|_| std::fmt::Error)
			.and_then(|s| write!(f, "{s}"))
	}
}

#[cfg(test)]
mod testing {
	use super::*;

	#[test]
	fn descriptor_validity() {
		for i in ["I", "[I", "Ljava/lang/String;", "[[Lcom/example/Main;"] {
			assert!(FieldDescriptor::new(i).is_ok(), "{i:?} should be valid");
		}
		assert!(FieldDescriptor::new("").is_err());
		assert!(FieldDescriptor::new("()V").is_err());

		for i in ["()V", "(II)I", "(Ljava/lang/String;)Ljava/lang/Object;"] {
			assert!(MethodDescriptor::new(i).is_ok(), "{i:?} should be valid");
		}
		assert!(MethodDescriptor::new("I").is_err());
		assert!(MethodDescriptor::new("(I").is_err());
	}
}
