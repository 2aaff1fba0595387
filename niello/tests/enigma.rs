use anyhow::Result;
use pretty_assertions::assert_eq;
use burin::name::{ClassName, FieldName, MethodName};
use burin::signature::{FieldDescriptor, FieldSignature, MethodDescriptor, MethodSignature};

fn class(name: &str) -> ClassName {
	ClassName::new(name.to_owned()).expect("test class names are valid")
}

fn method_sig(name: &str, desc: &str) -> MethodSignature {
	MethodSignature::new(
		MethodName::new(name.to_owned()).expect("test method names are valid"),
		MethodDescriptor::new(desc.to_owned()).expect("test method descriptors are valid"),
	)
}

fn field_sig(name: &str, desc: &str) -> FieldSignature {
	FieldSignature::new(
		FieldName::new(name.to_owned()).expect("test field names are valid"),
		FieldDescriptor::new(desc.to_owned()).expect("test field descriptors are valid"),
	)
}

#[test]
fn reads_nested_structure() -> Result<()> {
	let input = concat!(
		"# a heading comment\n",
		"\n",
		"CLASS a com/example/Main ACC:PUBLIC\n",
		"\tFIELD b greeting Ljava/lang/String;\n",
		"\tMETHOD c run ()V ACC:PRIVATE\n",
		"\t\tARG 0 ticks\n",
		"\t\tARG 1 partial\n",
		"\tCLASS 1\n",
		"\t\tMETHOD d accept (Ljava/lang/Object;)V\n",
		"CLASS e\n",
	);
	let mappings = niello::enigma::read(input.as_bytes())?;

	assert_eq!(mappings.len(), 3);

	let a = mappings.get_class(&class("a")).expect("class `a` was read");
	assert_eq!(a.deobf_name, "com/example/Main");
	assert_eq!(a.parent, None);

	let field = a.get_field(&field_sig("b", "Ljava/lang/String;")).expect("field `b` was read");
	assert_eq!(field.deobf_name.as_inner(), "greeting");

	let method = a.get_method(&method_sig("c", "()V")).expect("method `c` was read");
	assert_eq!(method.deobf_name.as_inner(), "run");
	assert_eq!(method.parameters.len(), 2);
	assert_eq!(method.parameters[&0].deobf_name, "ticks");
	assert_eq!(method.parameters[&1].deobf_name, "partial");

	let inner = mappings.get_class(&class("a$1")).expect("inner class was read under its outer class");
	assert_eq!(inner.obf_name, "1");
	assert_eq!(inner.parent, Some(class("a")));
	let method = inner.get_method(&method_sig("d", "(Ljava/lang/Object;)V")).expect("method `d` was read");
	assert_eq!(method.deobf_name.as_inner(), "accept");

	Ok(())
}

#[test]
fn missing_deobf_names_default_to_identity() -> Result<()> {
	let input = concat!(
		"CLASS a\n",
		"\tFIELD b I\n",
		"\tMETHOD c ()V\n",
		"\tCLASS 1\n",
	);
	let mappings = niello::enigma::read(input.as_bytes())?;

	let a = mappings.get_class(&class("a")).unwrap();
	assert_eq!(a.deobf_name, "a");
	assert_eq!(a.get_field(&field_sig("b", "I")).unwrap().deobf_name.as_inner(), "b");
	assert_eq!(a.get_method(&method_sig("c", "()V")).unwrap().deobf_name.as_inner(), "c");

	// inner classes default to their simple name, not a qualified one
	let inner = mappings.get_class(&class("a$1")).unwrap();
	assert_eq!(inner.deobf_name, "1");

	Ok(())
}

#[test]
fn trailing_comments_are_stripped() -> Result<()> {
	let input = concat!(
		"CLASS a com/example/Main # renamed in 1.2\n",
		"\tMETHOD c run ()V# no space needed\n",
	);
	let mappings = niello::enigma::read(input.as_bytes())?;

	let a = mappings.get_class(&class("a")).unwrap();
	assert_eq!(a.deobf_name, "com/example/Main");
	assert_eq!(a.get_method(&method_sig("c", "()V")).unwrap().deobf_name.as_inner(), "run");

	Ok(())
}

#[test]
fn rejects_unknown_mapping_targets() {
	let err = niello::enigma::read("FIELD a b I\n".as_bytes()).unwrap_err();
	assert!(format!("{err:#}").contains("unknown mapping target"), "got: {err:#}");

	let input = concat!(
		"CLASS a\n",
		"\tCOMMENT this tree has no javadoc\n",
	);
	let err = niello::enigma::read(input.as_bytes()).unwrap_err();
	assert!(format!("{err:#}").contains("unknown mapping target"), "got: {err:#}");
}

#[test]
fn rejects_over_indented_lines() {
	let input = concat!(
		"CLASS a\n",
		"\t\tFIELD b c I\n",
	);
	let err = niello::enigma::read(input.as_bytes()).unwrap_err();
	assert!(format!("{err:#}").contains("expected an indentation"), "got: {err:#}");
}

#[test]
fn rejects_duplicate_classes() {
	let input = concat!(
		"CLASS a com/example/First\n",
		"CLASS a com/example/Second\n",
	);
	assert!(niello::enigma::read(input.as_bytes()).is_err());
}

#[test]
fn rejects_wrong_argument_counts() {
	let err = niello::enigma::read("CLASS\n".as_bytes()).unwrap_err();
	assert!(format!("{err:#}").contains("illegal number of arguments"), "got: {err:#}");

	let input = concat!(
		"CLASS a\n",
		"\tMETHOD c run ()V\n",
		"\t\tARG nope name\n",
	);
	let err = niello::enigma::read(input.as_bytes()).unwrap_err();
	assert!(format!("{err:#}").contains("illegal parameter index"), "got: {err:#}");
}
