//! Automatic `id` attributes for headings.

use std::collections::HashSet;
use std::collections::VecDeque;

use markdown::mdast::Node;

/// Hands out heading ids that are unique within one document.
#[derive(Debug, Default)]
pub struct IdGenerator {
    used: HashSet<String>,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slug for `text`, suffixed with `-1`, `-2`, ... if already taken.
    pub fn generate(&mut self, text: &str) -> String {
        let mut base = slugify(text);
        if base.is_empty() {
            base = "heading".to_string();
        }

        if self.used.insert(base.clone()) {
            return base;
        }

        let mut n = 1;
        loop {
            let candidate = format!("{base}-{n}");
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}

/// Lowercase ASCII alphanumerics; each whitespace, `-` or `_` becomes `-`;
/// everything else is dropped. Surrounding whitespace is ignored.
pub fn slugify(text: &str) -> String {
    text.trim_matches(|c: char| c.is_ascii_whitespace())
        .chars()
        .filter_map(|c| {
            if c.is_ascii_alphanumeric() {
                Some(c.to_ascii_lowercase())
            } else if c.is_ascii_whitespace() || c == '-' || c == '_' {
                Some('-')
            } else {
                None
            }
        })
        .collect()
}

/// A heading found in the syntax tree, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingId {
    pub depth: u8,
    pub id: String,
}

/// Ids for every heading under `root`, in document order.
pub fn collect(root: &Node) -> Vec<HeadingId> {
    let mut ids = IdGenerator::new();
    let mut headings = Vec::new();
    walk(root, &mut ids, &mut headings);
    headings
}

fn walk(node: &Node, ids: &mut IdGenerator, out: &mut Vec<HeadingId>) {
    if let Node::Heading(heading) = node {
        let mut text = String::new();
        for child in &heading.children {
            push_text(child, &mut text);
        }
        out.push(HeadingId {
            depth: heading.depth,
            id: ids.generate(&text),
        });
        return;
    }

    if let Some(children) = node.children() {
        for child in children {
            walk(child, ids, out);
        }
    }
}

fn push_text(node: &Node, text: &mut String) {
    match node {
        Node::Text(t) => text.push_str(&t.value),
        Node::InlineCode(c) => text.push_str(&c.value),
        _ => {
            if let Some(children) = node.children() {
                for child in children {
                    push_text(child, text);
                }
            }
        }
    }
}

/// Add `id="..."` to the bare `<hN>` open tags of `html`.
///
/// Rendered markdown escapes raw HTML, so every bare heading tag in `html`
/// comes from a heading node and they appear in tree order. A tag whose level
/// disagrees with the next collected heading is left untouched.
pub fn inject(html: &str, headings: Vec<HeadingId>) -> String {
    let mut pending: VecDeque<HeadingId> = headings.into();
    let mut out = String::with_capacity(html.len() + pending.len() * 16);
    let mut rest = html;

    while let Some(pos) = rest.find("<h") {
        let (before, tag) = rest.split_at(pos);
        out.push_str(before);

        let bytes = tag.as_bytes();
        let level = bytes.get(2).copied().filter(|b| (b'1'..=b'6').contains(b));
        let closed = bytes.get(3) == Some(&b'>');

        match level {
            Some(level) if closed => {
                let depth = level - b'0';
                out.push_str(&tag[..3]);
                if pending.front().map(|h| h.depth) == Some(depth) {
                    if let Some(heading) = pending.pop_front() {
                        out.push_str(&format!(" id=\"{}\"", heading.id));
                    }
                }
                rest = &tag[3..];
            }
            _ => {
                out.push_str("<h");
                rest = &tag[2..];
            }
        }
    }

    out.push_str(rest);
    out
}
