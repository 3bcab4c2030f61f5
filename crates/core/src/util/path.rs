use std::borrow::Cow;
use std::collections::VecDeque;
use std::path::Path;

pub const FOLDER_SEPARATOR: &str = "/";

const CURRENT_PATH: &str = ".";
const TOP_PATH: &str = "..";

/// Normalizes a `/`-separated path: backslashes become slashes, `.` elements
/// are dropped and `..` elements consume their predecessor. A scheme-like
/// prefix (`file:`) is kept out of the element analysis.
///
/// `file:core/../core/io/Resource.class` becomes `file:core/io/Resource.class`.
pub fn clean_path(path: &str) -> Cow<'_, str> {
    if path.is_empty() {
        return Cow::Borrowed(path);
    }

    let normalized: Cow<'_, str> = if path.contains('\\') {
        Cow::Owned(path.replace("\\\\", "\\").replace('\\', "/"))
    } else {
        Cow::Borrowed(path)
    };

    if !normalized.contains('.') {
        return normalized;
    }

    let mut path_to_use: &str = &normalized;
    let mut prefix = String::new();
    if let Some(idx) = path_to_use.find(':') {
        let candidate = &path_to_use[..=idx];
        if !candidate.contains(FOLDER_SEPARATOR) {
            prefix.push_str(candidate);
            path_to_use = &path_to_use[idx + 1..];
        }
    }
    if let Some(rest) = path_to_use.strip_prefix(FOLDER_SEPARATOR) {
        prefix.push_str(FOLDER_SEPARATOR);
        path_to_use = rest;
    }

    let elements: Vec<&str> = path_to_use.split(FOLDER_SEPARATOR).collect();
    let mut kept: VecDeque<&str> = VecDeque::with_capacity(elements.len());
    let mut tops = 0usize;
    for element in elements.iter().rev() {
        match *element {
            CURRENT_PATH => {}
            TOP_PATH => tops += 1,
            other => {
                if tops > 0 {
                    tops -= 1;
                } else {
                    kept.push_front(other);
                }
            }
        }
    }

    if kept.len() == elements.len() {
        return normalized;
    }

    for _ in 0..tops {
        kept.push_front(TOP_PATH);
    }
    if kept.len() == 1 && kept.back().is_some_and(|e| e.is_empty()) && !prefix.ends_with('/') {
        kept.push_front(CURRENT_PATH);
    }

    let joined = kept.into_iter().collect::<Vec<_>>().join(FOLDER_SEPARATOR);
    Cow::Owned(format!("{prefix}{joined}"))
}

/// Resolves `relative` against `path`: everything after the last separator
/// of `path` is replaced. `dir/` + `x` gives `dir/x`, `dir` + `x` gives `x`.
pub fn apply_relative_path(path: &str, relative: &str) -> String {
    match path.rfind(FOLDER_SEPARATOR) {
        Some(idx) => {
            let mut new_path = path[..idx].to_string();
            if !relative.starts_with(FOLDER_SEPARATOR) {
                new_path.push_str(FOLDER_SEPARATOR);
            }
            new_path.push_str(relative);
            new_path
        }
        None => relative.to_string(),
    }
}

/// Last element of a `/`-separated path, `None` when the path ends with a
/// separator or is empty.
pub fn filename(path: &str) -> Option<&str> {
    let name = path.rsplit(FOLDER_SEPARATOR).next().unwrap_or(path);
    (!name.is_empty()).then_some(name)
}

pub fn strip_leading_separator(path: &str) -> &str {
    path.strip_prefix(FOLDER_SEPARATOR).unwrap_or(path)
}

/// `/`-separated rendering of a native path.
pub fn to_slash(path: &Path) -> String {
    let rendered = path.to_string_lossy();
    if std::path::MAIN_SEPARATOR == '/' {
        rendered.into_owned()
    } else {
        rendered.replace(std::path::MAIN_SEPARATOR, FOLDER_SEPARATOR)
    }
}

/// Upper-cases a leading `c:` style drive letter so that two spellings of
/// the same Windows path compare equal.
pub fn capitalize_drive(path: &str) -> Cow<'_, str> {
    let mut chars = path.chars();
    match (chars.next(), chars.next()) {
        (Some(drive), Some(':')) if drive.is_ascii_lowercase() => {
            Cow::Owned(format!("{}{}", drive.to_ascii_uppercase(), &path[1..]))
        }
        _ => Cow::Borrowed(path),
    }
}
