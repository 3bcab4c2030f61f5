use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Creates every file of `files` (path, content) below `root`.
#[allow(dead_code)]
pub fn write_tree(root: &Path, files: &[(&str, &str)]) {
    for (path, content) in files {
        let file = root.join(path);
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(file, content).unwrap();
    }
}

/// Writes a zip archive. Entries ending in `/` become directory entries.
#[allow(dead_code)]
pub fn write_zip(path: &Path, entries: &[&str]) {
    let mut zip = ZipWriter::new(File::create(path).unwrap());
    let options = SimpleFileOptions::default();
    for entry in entries {
        if let Some(dir) = entry.strip_suffix('/') {
            zip.add_directory(dir, options).unwrap();
        } else {
            zip.start_file(*entry, options).unwrap();
            zip.write_all(entry.as_bytes()).unwrap();
        }
    }
    zip.finish().unwrap();
}

/// `/`-separated rendering of a native path.
#[allow(dead_code)]
pub fn slash(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Sorted file names of resolved resources.
#[allow(dead_code)]
pub fn names<'a>(resources: impl IntoIterator<Item = &'a rescope_core::Resource>) -> Vec<String> {
    let mut names: Vec<String> = resources
        .into_iter()
        .filter_map(rescope_core::Resource::filename)
        .collect();
    names.sort();
    names
}
