//! Names of classes and their members.

use std::fmt::{Display, Formatter};
use anyhow::{bail, Result};
use java_string::{JavaStr, JavaString};

fn fmt_java(inner: &JavaStr, f: &mut Formatter<'_>) -> std::fmt::Result {
	inner.as_str()
		.map_err(|_| std::fmt::Error)
		.and_then(|s| write!(f, "{s}"))
}

/// Represents a fully qualified class name.
///
/// Class names use the internal binary form: `/` separates package segments
/// and `$` separates an inner class from its enclosing class, as in
/// `com/example/Outer$Inner`.
#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
pub struct ClassName(JavaString);

impl ClassName {
	pub fn new(inner: impl Into<JavaString>) -> Result<ClassName> {
		let inner = inner.into();
		if !is_valid_class_name(&inner) {
			bail!("invalid class name {inner:?}: must be a binary name like `com/example/Outer$Inner`");
		}
		Ok(ClassName(inner))
	}

	pub fn as_inner(&self) -> &JavaStr {
		&self.0
	}

	pub fn into_inner(self) -> JavaString {
		self.0
	}

	/// Is this the universal root of the hierarchy, `java/lang/Object`?
	pub fn is_java_lang_object(&self) -> bool {
		self.0 == "java/lang/Object"
	}

	/// Gets the simple name, i.e. the part after the last `/`.
	///
	/// For an inner class this still contains the enclosing class, as in
	/// `Outer$Inner`.
	pub fn simple_name(&self) -> &JavaStr {
		self.0.rsplit_once('/').map_or(&*self.0, |(_, simple)| simple)
	}

	/// Splits an inner class name at the last `$`, into the name of the
	/// enclosing class and the simple inner name.
	///
	/// Returns `None` for top level classes.
	pub fn split_inner_class(&self) -> Option<(&JavaStr, &JavaStr)> {
		self.0.rsplit_once('$')
	}

	/// Joins the name of an enclosing class and a simple inner name with `$`.
	pub fn from_inner_class(parent: &ClassName, inner_name: &JavaStr) -> ClassName {
		let mut s = parent.0.clone();
		s.reserve(1 + inner_name.len());
		s.push('$');
		s.push_java_str(inner_name);
		ClassName(s)
	}
}

impl Display for ClassName {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		fmt_java(&self.0, f)
	}
}

fn is_valid_class_name(s: &JavaStr) -> bool {
	!s.is_empty()
		&& !s.contains('.') && !s.contains(';') && !s.contains('[')
		&& !s.split('/').any(|segment| segment.is_empty())
}

/// The name of a field.
#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
pub struct FieldName(JavaString);

impl FieldName {
	pub fn new(inner: impl Into<JavaString>) -> Result<FieldName> {
		let inner = inner.into();
		if !is_valid_member_name(&inner) || inner.contains('<') {
			bail!("invalid field name {inner:?}");
		}
		Ok(FieldName(inner))
	}

	pub fn as_inner(&self) -> &JavaStr {
		&self.0
	}
}

impl Display for FieldName {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		fmt_java(&self.0, f)
	}
}

/// The name of a method.
///
/// Besides identifiers this permits the two special names `<init>` and
/// `<clinit>`.
#[derive(Debug, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
pub struct MethodName(JavaString);

impl MethodName {
	pub fn new(inner: impl Into<JavaString>) -> Result<MethodName> {
		let inner = inner.into();
		let special = inner == "<init>" || inner == "<clinit>";
		if !is_valid_member_name(&inner) || (!special && inner.contains('<')) {
			bail!("invalid method name {inner:?}");
		}
		Ok(MethodName(inner))
	}

	pub fn as_inner(&self) -> &JavaStr {
		&self.0
	}
}

impl Display for MethodName {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		fmt_java(&self.0, f)
	}
}

fn is_valid_member_name(s: &JavaStr) -> bool {
	!s.is_empty()
		&& !s.contains('.') && !s.contains(';') && !s.contains('/') && !s.contains('[')
}

#[cfg(test)]
mod testing {
	use pretty_assertions::assert_eq;
	use super::*;

	#[test]
	fn class_name_validity() {
		for i in ["com/example/Main", "Main", "com/example/Outer$Inner", "a$1", "java/lang/Object"] {
			assert!(ClassName::new(i).is_ok(), "{i:?} should be valid");
		}
		for i in ["", "com.example.Main", "Lcom/example/Main;", "[I", "com//Main", "/Main", "Main/"] {
			assert!(ClassName::new(i).is_err(), "{i:?} should be invalid");
		}
	}

	#[test]
	fn simple_and_inner_names() -> anyhow::Result<()> {
		let name = ClassName::new("com/example/Outer$Inner$1")?;
		assert_eq!(name.simple_name(), "Outer$Inner$1");
		let (parent, inner) = name.split_inner_class().unwrap();
		assert_eq!(parent, "com/example/Outer$Inner");
		assert_eq!(inner, "1");

		let top_level = ClassName::new("com/example/Main")?;
		assert_eq!(top_level.simple_name(), "Main");
		assert_eq!(top_level.split_inner_class(), None);

		let joined = ClassName::from_inner_class(&top_level, inner);
		assert_eq!(joined, ClassName::new("com/example/Main$1")?);
		Ok(())
	}

	#[test]
	fn method_name_specials() {
		assert!(MethodName::new("<init>").is_ok());
		assert!(MethodName::new("<clinit>").is_ok());
		assert!(MethodName::new("<foo>").is_err());
		assert!(MethodName::new("run").is_ok());
	}
}
