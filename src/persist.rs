//! JSON file helpers for saving and reloading notebook state.
//!
//! [`save_dict`] writes to the exact file name it is given, while [`load_dict`] takes a base
//! name and appends `.json`, so `save_dict(&d, "run.json")` pairs with `load_dict("run")`.

// std
use std::{
	ffi::OsString,
	fs::{self, File},
	io::{self, Write},
};
// crates.io
use serde_json::{Map, Serializer, Value, ser::PrettyFormatter};
// self
use crate::{_prelude::*, error::PersistError, ident};

/// String-keyed JSON object.
pub type Dict = Map<String, Value>;

const INDENT: &[u8] = b"    ";

/// Serializes `dict` as 4-space indented JSON and replaces `filename` with it.
///
/// The JSON is written to a uniquely named sibling `.tmp` file first and renamed into place,
/// so readers never observe a half-written file. The temp file is removed if the write fails.
pub fn save_dict<T>(dict: &T, filename: impl AsRef<Path>) -> Result<(), PersistError>
where
	T: ?Sized + Serialize,
{
	let path = filename.as_ref();
	let mut buf = Vec::new();
	let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));

	dict.serialize(&mut ser)
		.map_err(|source| PersistError::Serialize { path: path.to_path_buf(), source })?;

	write_replacing(path, &buf)
}

/// Reads `{base}.json` into a [`Dict`].
///
/// Fails when the file is missing or does not hold a JSON object.
pub fn load_dict(base: impl AsRef<Path>) -> Result<Dict, PersistError> {
	load_json(base)
}

/// Reads `{base}.json` into any deserializable type.
pub fn load_json<T>(base: impl AsRef<Path>) -> Result<T, PersistError>
where
	T: DeserializeOwned,
{
	let path = json_path(base.as_ref());
	let bytes = fs::read(&path).map_err(|source| PersistError::Io { path: path.clone(), source })?;
	let mut de = serde_json::Deserializer::from_slice(&bytes);

	serde_path_to_error::deserialize(&mut de).map_err(|source| PersistError::Parse { path, source })
}

fn json_path(base: &Path) -> PathBuf {
	let mut raw = base.as_os_str().to_os_string();

	raw.push(".json");

	PathBuf::from(raw)
}

fn write_replacing(path: &Path, bytes: &[u8]) -> Result<(), PersistError> {
	let io_err = |source: io::Error| PersistError::Io { path: path.to_path_buf(), source };
	// Concurrent saves to one target must not share a temp file.
	let tmp_path = match path.file_name() {
		Some(name) => {
			let mut tmp_name = OsString::from(name);

			tmp_name.push(format!(".{}.tmp", ident::generate_identifier()));

			path.with_file_name(tmp_name)
		},
		None => return Err(io_err(io::Error::new(io::ErrorKind::InvalidInput, "not a file path"))),
	};
	let result = write_synced(&tmp_path, bytes).and_then(|()| fs::rename(&tmp_path, path));

	if result.is_err() {
		let _ = fs::remove_file(&tmp_path);
	}

	result.map_err(io_err)
}

fn write_synced(path: &Path, bytes: &[u8]) -> io::Result<()> {
	let mut file = File::create(path)?;

	file.write_all(bytes)?;
	file.sync_all()
}

#[cfg(test)]
mod tests {
	// std
	use std::{env, process};
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	fn temp_base(label: &str) -> PathBuf {
		let unique = format!(
			"notebook_helpers_{label}_{}_{}",
			process::id(),
			OffsetDateTime::now_utc().unix_timestamp_nanos(),
		);

		env::temp_dir().join(unique)
	}

	fn remove(path: &Path) {
		fs::remove_file(path).unwrap_or_else(|e| {
			panic!("Failed to remove temporary JSON file {}: {e}", path.display())
		});
	}

	#[test]
	fn save_then_load_round_trips_nested_values() {
		let base = temp_base("round_trip");
		let file = json_path(&base);
		let value = json!({
			"run": "a1",
			"scores": [0.5, 1, null],
			"nested": { "ok": true, "label": "caf\u{e9}" },
		});
		let dict = value.as_object().expect("Fixture should be an object.").clone();

		save_dict(&dict, &file).expect("Dict should save.");

		let loaded = load_dict(&base).expect("Saved dict should load.");

		assert_eq!(loaded, dict);

		remove(&file);
	}

	#[test]
	fn saved_json_uses_four_space_indent_and_overwrites() {
		let base = temp_base("indent");
		let file = json_path(&base);

		save_dict(&json!({ "stale": true }), &file).expect("First save should succeed.");
		save_dict(&json!({ "a": { "b": 1 } }), &file).expect("Second save should succeed.");

		let text = fs::read_to_string(&file).expect("Saved file should be readable.");

		assert_eq!(text, "{\n    \"a\": {\n        \"b\": 1\n    }\n}");

		remove(&file);
	}

	#[test]
	fn missing_file_is_an_io_error() {
		let err = load_dict(temp_base("missing")).expect_err("Missing files should fail to load.");

		assert!(matches!(err, PersistError::Io { ref source, .. } if source.kind() == io::ErrorKind::NotFound));
	}

	#[test]
	fn non_object_json_is_a_parse_error() {
		let base = temp_base("array");
		let file = json_path(&base);

		fs::write(&file, "[1, 2, 3]").expect("Fixture file should be writable.");

		let err = load_dict(&base).expect_err("Arrays should not load as dicts.");

		assert!(matches!(err, PersistError::Parse { .. }));

		remove(&file);
	}

	#[test]
	fn failed_replace_leaves_no_temp_file_behind() {
		let dir = temp_base("failed_replace");
		let target = dir.join("occupied");

		fs::create_dir_all(&target).expect("Fixture directory should be creatable.");

		let err = save_dict(&json!({ "a": 1 }), &target)
			.expect_err("Renaming over a directory should fail.");

		assert!(matches!(err, PersistError::Io { .. }));

		let names = fs::read_dir(&dir)
			.expect("Fixture directory should be readable.")
			.map(|entry| entry.expect("Directory entry should be readable.").file_name())
			.collect::<Vec<_>>();

		assert_eq!(names, vec![OsString::from("occupied")]);

		fs::remove_dir_all(&dir).expect("Fixture directory should be removable.");
	}
}
