//! Stored file naming.

/// Last path component of a client-supplied name, split on `/` and `\\`.
pub fn base_name(filename: &str) -> &str {
    filename.rsplit(['/', '\\']).next().unwrap_or_default()
}

/// Reduce an uploaded file name to a safe, flat name.
///
/// Directory components are dropped, whitespace becomes `_`, and anything
/// outside `[A-Za-z0-9._-]` is removed. Leading dots are stripped so the
/// result can never be hidden or refer to a parent directory. A stem that
/// cleans away to nothing becomes `"upload"`; the extension is kept.
pub fn sanitize_filename(filename: &str) -> String {
    let base = base_name(filename);
    let (stem, ext) = match base.rsplit_once('.') {
        Some((stem, ext)) => (stem, clean(ext)),
        None => (base, String::new()),
    };

    let stem = clean(stem);
    let stem = stem.trim_start_matches(['.', '_']);
    let stem = if stem.is_empty() { "upload" } else { stem };

    if ext.is_empty() {
        stem.to_string()
    } else {
        format!("{stem}.{ext}")
    }
}

fn clean(part: &str) -> String {
    part.chars()
        .filter_map(|c| match c {
            c if c.is_ascii_alphanumeric() => Some(c),
            '.' | '-' | '_' => Some(c),
            c if c.is_whitespace() => Some('_'),
            _ => None,
        })
        .collect()
}

/// Name a file is stored under: batch index prefix plus sanitized name.
pub fn stored_name(index: usize, filename: &str) -> String {
    format!("{index:04}_{}", sanitize_filename(filename))
}
