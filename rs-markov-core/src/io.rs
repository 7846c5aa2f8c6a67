use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Reads an entire stream into a `String`.
///
/// The training text is consumed in full before a model is built.
pub fn read_text<R: Read>(mut reader: R) -> io::Result<String> {
	let mut contents = String::new();
	reader.read_to_string(&mut contents)?;
	Ok(contents)
}

/// Reads an entire text file into a `String`.
pub fn read_file<P: AsRef<Path>>(filename: P) -> io::Result<String> {
	read_text(File::open(filename)?)
}
