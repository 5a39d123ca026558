//! URL and path helpers

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use url::Url;

/// Build the metadata endpoint URL
///
/// `<base>/cat?width=<size>&json=true`, or `<base>/cat/gif?...` for animations.
pub fn metadata_url(base: &str, size_hint: u32, animated: bool) -> Result<Url> {
    let endpoint = if animated { "cat/gif" } else { "cat" };
    let mut url = parse_base(base)?.join(endpoint).map_err(|e| Error::InvalidUrl {
        url: format!("{base}/{endpoint}"),
        reason: e.to_string(),
    })?;
    url.query_pairs_mut()
        .append_pair("width", &size_hint.to_string())
        .append_pair("json", "true");
    Ok(url)
}

/// Resolve the resource URL from the envelope against the API base
///
/// Absolute URLs are used as they are; relative paths are appended to the base
/// (including any path prefix the base carries).
pub fn resolve_resource_url(base: &str, resource: &str) -> Result<Url> {
    let resource = resource.trim();
    if resource.is_empty() {
        return Err(Error::InvalidUrl {
            url: resource.to_string(),
            reason: "empty resource path".to_string(),
        });
    }
    if let Ok(absolute) = Url::parse(resource) {
        return Ok(absolute);
    }

    let joined = format!(
        "{}/{}",
        base.trim_end_matches('/'),
        resource.trim_start_matches('/')
    );
    Url::parse(&joined).map_err(|e| Error::InvalidUrl {
        url: joined,
        reason: e.to_string(),
    })
}

/// Last path segment of a URL (absolute or relative), percent-decoded
///
/// The decoded segment is reduced with [`safe_file_name`], so an encoded
/// `..%2F` cannot smuggle a directory in. Falls back to "cat" when the URL has
/// no usable segment.
pub fn file_name_from_url(url: &str) -> String {
    let parsed = Url::parse(url).or_else(|_| {
        Url::parse("http://localhost/").and_then(|root| root.join(url))
    });

    if let Ok(parsed) = parsed
        && let Some(mut segments) = parsed.path_segments()
        && let Some(last) = segments.next_back()
        && !last.is_empty()
    {
        let decoded = match urlencoding::decode(last) {
            Ok(decoded) => decoded.into_owned(),
            Err(_) => last.to_string(),
        };
        if let Some(name) = safe_file_name(&decoded) {
            return name;
        }
    }

    "cat".to_string()
}

/// Reduce a name received from the network to a bare file name
///
/// Keeps only the text after the last `/`, `\` or `:`, so absolute paths,
/// parent references and drive prefixes never reach `Path::join`. Returns
/// `None` when nothing usable is left (empty, `.` or `..`).
pub fn safe_file_name(candidate: &str) -> Option<String> {
    let last = candidate
        .rsplit(['/', '\\', ':'])
        .next()
        .unwrap_or_default()
        .trim();
    match last {
        "" | "." | ".." => None,
        name => Some(name.to_string()),
    }
}

/// Path the save dialog is pre-filled with
///
/// `<folder>/<file>` when a project folder is set, `<fallback>/<file>` when a
/// fallback directory is configured, otherwise just the file name.
pub fn suggested_save_path(folder: &str, fallback_dir: Option<&Path>, file_name: &str) -> PathBuf {
    let folder = folder.trim();
    if !folder.is_empty() {
        return Path::new(folder).join(file_name);
    }
    match fallback_dir {
        Some(dir) => dir.join(file_name),
        None => PathBuf::from(file_name),
    }
}

fn parse_base(base: &str) -> Result<Url> {
    // A trailing slash keeps `join` from replacing the last path segment.
    let normalized = format!("{}/", base.trim_end_matches('/'));
    Url::parse(&normalized).map_err(|e| Error::InvalidUrl {
        url: base.to_string(),
        reason: e.to_string(),
    })
}
