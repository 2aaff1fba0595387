//! Reading Enigma format (`.mapping`) files into a [`MappingSet`].
//!
//! The format is line based, with tab indentation carrying the nesting:
//! ```txt
//! CLASS a com/example/Main
//! 	FIELD b greeting Ljava/lang/String;
//! 	METHOD c run ()V
//! 		ARG 0 ticks
//! 	CLASS 1
//! ```
//! Access modifier fields (`ACC:...`) are tolerated and skipped, `#` starts
//! a comment. `COMMENT` records (javadoc) are rejected: this tree has no
//! representation for them.

use std::cmp::Ordering;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::iter::Peekable;
use std::path::Path;
use anyhow::{anyhow, bail, Context, Result};
use java_string::{JavaStr, JavaString};
use burin::name::{ClassName, FieldName, MethodName};
use burin::signature::{FieldDescriptor, FieldSignature, MethodDescriptor, MethodSignature};
use crate::tree::mappings::{FieldMapping, MappingSet, MethodMapping, ParameterMapping};

const CLASS: &str = "CLASS";
const FIELD: &str = "FIELD";
const METHOD: &str = "METHOD";
const PARAMETER: &str = "ARG";

pub fn read_file(path: impl AsRef<Path>) -> Result<MappingSet> {
	read(File::open(&path)?)
		.with_context(|| anyhow!("failed to read mappings file {:?} as enigma file", path.as_ref()))
}

pub fn read(reader: impl Read) -> Result<MappingSet> {
	let mut mappings = MappingSet::new();

	let mut lines = BufReader::new(reader)
		.lines()
		.enumerate()
		.filter_map(|(line_number, line)| match line {
			Ok(line) => EnigmaLine::new(line_number + 1, &line).transpose(),
			Err(e) => Some(Err(e.into())),
		})
		.peekable();

	while let Some(line) = next_at_depth(&mut lines, 0) {
		let line = line?;
		let line_number = line.line_number;

		let result = match line.first_field.as_str() {
			CLASS => parse_class(&mut mappings, &mut lines, line, None, 0),
			tag => Err(anyhow!("unknown mapping target {tag:?} at the root, allowed are: `CLASS`")),
		};
		result.with_context(|| anyhow!("in line {line_number}"))?;
	}

	Ok(mappings)
}

/// Gives back the next line if it belongs to the scope at `depth`.
///
/// A line with less indentation ends the scope (and is left for the outer
/// one), deeper indentation than expected is an error.
fn next_at_depth(lines: &mut Peekable<impl Iterator<Item = Result<EnigmaLine>>>, depth: usize) -> Option<Result<EnigmaLine>> {
	match lines.peek()? {
		Ok(line) => match line.indent.cmp(&depth) {
			Ordering::Less => None,
			Ordering::Equal => lines.next(),
			Ordering::Greater => Some(Err(anyhow!("expected an indentation of {} for line {}: {:#?}", depth, line.line_number, line))),
		},
		Err(_) => lines.next(),
	}
}

fn parse_class(
	mappings: &mut MappingSet,
	lines: &mut Peekable<impl Iterator<Item = Result<EnigmaLine>>>,
	line: EnigmaLine,
	parent: Option<&ClassName>,
	depth: usize,
) -> Result<()> {
	let (obf, deobf) = match line.fields.as_slice() {
		[obf] => (obf, None),
		[obf, modifier] if is_modifier(modifier) => (obf, None),
		[obf, deobf] => (obf, Some(deobf)),
		[obf, deobf, _modifier] => (obf, Some(deobf)),
		slice => bail!("illegal number of arguments ({}) for class mapping, expected 1-3, got {slice:?}", slice.len()),
	};

	let name = match parent {
		Some(parent) => {
			let mut fq = parent.as_inner().to_owned();
			fq.push('$');
			fq.push_java_str(JavaStr::from_str(obf));
			ClassName::new(fq)?
		},
		None => ClassName::new(obf.clone())?,
	};

	// a class without a deobfuscated name maps to itself
	let deobf_name = match deobf {
		Some(deobf) => JavaString::from(deobf.clone()),
		None => match parent {
			Some(_) => JavaString::from(obf.clone()),
			None => name.as_inner().to_owned(),
		},
	};

	mappings.add_class(name.clone(), deobf_name)?;

	while let Some(sub) = next_at_depth(lines, depth + 1) {
		let sub = sub?;
		let line_number = sub.line_number;

		let result = match sub.first_field.as_str() {
			CLASS => parse_class(mappings, lines, sub, Some(&name), depth + 1),
			FIELD => parse_field(mappings, &name, sub),
			METHOD => parse_method(mappings, lines, &name, sub, depth + 1),
			tag => Err(anyhow!("unknown mapping target {tag:?} inside a class, allowed are: `CLASS`, `FIELD`, `METHOD`")),
		};
		result.with_context(|| anyhow!("in line {line_number}"))?;
	}

	Ok(())
}

fn parse_field(mappings: &mut MappingSet, class: &ClassName, line: EnigmaLine) -> Result<()> {
	let (obf, deobf, desc) = match line.fields.as_slice() {
		[obf, desc] => (obf, None, desc),
		[obf, desc, modifier] if is_modifier(modifier) => (obf, None, desc),
		[obf, deobf, desc] => (obf, Some(deobf), desc),
		[obf, deobf, desc, _modifier] => (obf, Some(deobf), desc),
		slice => bail!("illegal number of arguments ({}) for field mapping, expected 2-4, got {slice:?}", slice.len()),
	};

	let signature = FieldSignature::new(
		FieldName::new(obf.clone())?,
		FieldDescriptor::new(desc.clone())?,
	);
	let deobf_name = match deobf {
		Some(deobf) => FieldName::new(deobf.clone())?,
		None => signature.name.clone(),
	};

	mappings.get_class_mut(class)
		.with_context(|| anyhow!("class mapping {class:?} is missing"))?
		.add_field(FieldMapping { signature, deobf_name })
}

fn parse_method(
	mappings: &mut MappingSet,
	lines: &mut Peekable<impl Iterator<Item = Result<EnigmaLine>>>,
	class: &ClassName,
	line: EnigmaLine,
	depth: usize,
) -> Result<()> {
	let (obf, deobf, desc) = match line.fields.as_slice() {
		[obf, desc] => (obf, None, desc),
		[obf, desc, modifier] if is_modifier(modifier) => (obf, None, desc),
		[obf, deobf, desc] => (obf, Some(deobf), desc),
		[obf, deobf, desc, _modifier] => (obf, Some(deobf), desc),
		slice => bail!("illegal number of arguments ({}) for method mapping, expected 2-4, got {slice:?}", slice.len()),
	};

	let signature = MethodSignature::new(
		MethodName::new(obf.clone())?,
		MethodDescriptor::new(desc.clone())?,
	);
	let deobf_name = match deobf {
		Some(deobf) => MethodName::new(deobf.clone())?,
		None => signature.name.clone(),
	};
	let mut method = MethodMapping::new(signature, deobf_name);

	while let Some(sub) = next_at_depth(lines, depth + 1) {
		let sub = sub?;
		let line_number = sub.line_number;

		let result = match sub.first_field.as_str() {
			PARAMETER => parse_parameter(&mut method, sub),
			tag => Err(anyhow!("unknown mapping target {tag:?} inside a method, allowed are: `ARG`")),
		};
		result.with_context(|| anyhow!("in line {line_number}"))?;
	}

	mappings.get_class_mut(class)
		.with_context(|| anyhow!("class mapping {class:?} is missing"))?
		.add_method(method)
}

fn parse_parameter(method: &mut MethodMapping, line: EnigmaLine) -> Result<()> {
	let (raw_index, deobf) = match line.fields.as_slice() {
		[raw_index, deobf] => (raw_index, deobf),
		slice => bail!("illegal number of arguments ({}) for parameter mapping, expected 2, got {slice:?}", slice.len()),
	};

	let index: usize = raw_index.parse()
		.with_context(|| anyhow!("illegal parameter index {raw_index:?}, must be a non negative number"))?;

	method.add_parameter(ParameterMapping {
		index,
		deobf_name: JavaString::from(deobf.clone()),
	})
}

fn is_modifier(s: &str) -> bool {
	const MODIFIER: &str = "ACC:";
	s.starts_with(MODIFIER)
}

#[derive(Debug)]
struct EnigmaLine {
	line_number: usize,
	indent: usize,
	first_field: String,
	fields: Vec<String>,
}

impl EnigmaLine {
	/// Returns `None` for lines that are blank or comments only.
	fn new(line_number: usize, line: &str) -> Result<Option<EnigmaLine>> {
		let indent = line.chars().take_while(|x| *x == '\t').count();
		// indexing by the count is fine, a tab is one byte
		let line = &line[indent..];

		let line = line.split_once('#').map_or(line, |(non_comment, _)| non_comment);

		const JAVA_WHITESPACE: [char; 6] = [' ', '\t', '\n', '\x0b', '\x0c', '\x0d'];
		let mut fields = line.split(JAVA_WHITESPACE).filter(|x| !x.is_empty()).map(|x| x.to_owned());

		Ok(match fields.next() {
			Some(first_field) => Some(EnigmaLine {
				line_number,
				indent,
				first_field,
				fields: fields.collect(),
			}),
			None => None,
		})
	}
}
