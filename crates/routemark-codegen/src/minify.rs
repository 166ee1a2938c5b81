//! Whitespace and comment minification of generated source
//!
//! Works line by line on printer output, where comments always sit on their
//! own line, so `//` inside a string literal is never touched.

/// Comment lines containing any of these survive minification
const KEPT_COMMENT_MARKERS: [&str; 2] = ["@generated", "DO NOT EDIT"];

/// Minify generated source
///
/// Strips comment lines other than the generated-file banner, trims trailing
/// whitespace, collapses runs of blank lines, and merges consecutive plain
/// `use` items into one.
pub fn minify(source: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut pending_uses: Vec<String> = Vec::new();
    let mut previous_blank = false;

    for line in source.lines() {
        let line = line.trim_end();
        let trimmed = line.trim_start();

        if trimmed.starts_with("//") && !KEPT_COMMENT_MARKERS.iter().any(|m| trimmed.contains(m)) {
            continue;
        }

        if let Some(path) = plain_use(trimmed) {
            pending_uses.push(path.to_string());
            continue;
        }
        flush_uses(&mut pending_uses, &mut lines);

        if line.is_empty() {
            if previous_blank {
                continue;
            }
            previous_blank = true;
        } else {
            previous_blank = false;
        }
        lines.push(line.to_string());
    }
    flush_uses(&mut pending_uses, &mut lines);

    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// The path of a top-level `use path;` item without braces or visibility
fn plain_use(line: &str) -> Option<&str> {
    let path = line.strip_prefix("use ")?.strip_suffix(';')?;
    if path.contains(['{', '}']) {
        return None;
    }
    Some(path.trim())
}

fn flush_uses(pending: &mut Vec<String>, lines: &mut Vec<String>) {
    match pending.len() {
        0 => {}
        1 => lines.push(format!("use {};", pending[0])),
        _ => lines.push(format!("use {{{}}};", pending.join(", "))),
    }
    pending.clear();
}

#[cfg(test)]
#[path = "minify/minify_tests.rs"]
mod minify_tests;
