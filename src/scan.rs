// Defect scanner: pattern-based pre-pass over raw markup.
//
// The delegate parser silently repairs casing, quoting and void-element
// syntax, so these defects are only visible in the source text. Four
// independent pattern classes run in a fixed order; within a class each
// original substring is reported once.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::dom::is_void_element;

/// Start or end tag, tolerating quoted attribute values that contain `>`.
static TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<(/?)([A-Za-z][A-Za-z0-9-]*)((?:"[^"]*"|'[^']*'|[^"'>])*)>"#)
        .expect("tag pattern is valid")
});

/// One attribute inside a start tag. Group 1 is the name, group 2 the value
/// when it is written without quotes.
static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([^\s"'<>/=]+)(?:\s*=\s*(?:"[^"]*"|'[^']*'|([^\s"'<>=`]+)))?"#)
        .expect("attribute pattern is valid")
});

/// Category of a textual defect, in scan order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DefectKind {
    UppercaseTag,
    UppercaseAttribute,
    UnquotedAttribute,
    UnclosedVoidElement,
}

impl DefectKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DefectKind::UppercaseTag => "uppercase-tag",
            DefectKind::UppercaseAttribute => "uppercase-attribute",
            DefectKind::UnquotedAttribute => "unquoted-attribute",
            DefectKind::UnclosedVoidElement => "unclosed-void-element",
        }
    }

    /// Rule the defect breaks.
    pub fn message(self) -> &'static str {
        match self {
            DefectKind::UppercaseTag => "Tag must be lowercase",
            DefectKind::UppercaseAttribute => "Attribute must be lowercase",
            DefectKind::UnquotedAttribute => "Attribute value must be quoted",
            DefectKind::UnclosedVoidElement => "Void element must be self-closing",
        }
    }
}

impl fmt::Display for DefectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A textual XHTML-strict violation found before parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Defect {
    pub kind: DefectKind,
    /// 1-based line of the first occurrence.
    pub line: usize,
    /// 1-based column (in characters) of the first occurrence.
    pub column: usize,
    /// Offending substring.
    pub original: String,
    /// Conformant replacement.
    pub fixed: String,
}

impl Defect {
    pub fn message(&self) -> &'static str {
        self.kind.message()
    }
}

impl fmt::Display for Defect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.message(), self.original)
    }
}

/// A tag located by [`TAG`].
struct TagMatch<'a> {
    start: usize,
    end_tag: bool,
    name: &'a str,
    name_start: usize,
    body: &'a str,
    body_start: usize,
    text: &'a str,
}

/// Scan raw markup for defects.
///
/// Order: uppercase tags, uppercase attribute names, unquoted attribute
/// values, unclosed void elements; document order within each class.
pub fn scan(input: &str) -> Vec<Defect> {
    let tags = find_tags(input);
    let mut scanner = Collector::new(input);

    for tag in &tags {
        if has_uppercase(tag.name) {
            scanner.push(
                DefectKind::UppercaseTag,
                tag.name_start,
                tag.name,
                tag.name.to_lowercase(),
            );
        }
    }

    for tag in tags.iter().filter(|t| !t.end_tag) {
        for attr in ATTRIBUTE.captures_iter(tag.body) {
            let name = &attr[1];
            if has_uppercase(name) {
                let offset = tag.body_start + attr.get(1).map_or(0, |m| m.start());
                scanner.push(DefectKind::UppercaseAttribute, offset, name, name.to_lowercase());
            }
        }
    }

    for tag in tags.iter().filter(|t| !t.end_tag) {
        for attr in ATTRIBUTE.captures_iter(tag.body) {
            if let Some(value) = attr.get(2) {
                let whole = attr.get(0).unwrap_or(value);
                let fixed = format!("{}=\"{}\"", &attr[1], value.as_str());
                scanner.push(
                    DefectKind::UnquotedAttribute,
                    tag.body_start + whole.start(),
                    whole.as_str(),
                    fixed,
                );
            }
        }
    }

    for tag in tags.iter().filter(|t| !t.end_tag) {
        let name = tag.name.to_lowercase();
        if !is_void_element(&name) || tag.body.trim_end().ends_with('/') {
            continue;
        }
        // `<br>` and `<br class="x">` only; `<brx>` is another element.
        if !tag.body.is_empty() && !tag.body.starts_with(char::is_whitespace) {
            continue;
        }
        let fixed = format!("<{}{} />", name, tag.body.trim_end());
        scanner.push(DefectKind::UnclosedVoidElement, tag.start, tag.text, fixed);
    }

    scanner.defects
}

/// Tally defects per kind.
pub fn count_by_kind(defects: &[Defect]) -> BTreeMap<DefectKind, usize> {
    let mut counts = BTreeMap::new();
    for defect in defects {
        *counts.entry(defect.kind).or_insert(0) += 1;
    }
    counts
}

/// Elements whose content is raw text rather than markup.
const RAW_TEXT_ELEMENTS: [&str; 2] = ["script", "style"];

/// Every tag in `input`, in document order. Comment bodies and the content
/// of `<script>` and `<style>` are not markup and are skipped.
fn find_tags(input: &str) -> Vec<TagMatch<'_>> {
    let mut tags = Vec::new();
    let mut pos = 0;

    while let Some(caps) = TAG.captures_at(input, pos) {
        let (Some(whole), Some(name), Some(body)) = (caps.get(0), caps.get(2), caps.get(3))
        else {
            break;
        };
        if let Some(open) = input[pos..whole.start()].find("<!--") {
            let after = pos + open + 2;
            pos = input[after..]
                .find("-->")
                .map_or(input.len(), |close| after + close + 3);
            continue;
        }

        let end_tag = !caps[1].is_empty();
        tags.push(TagMatch {
            start: whole.start(),
            end_tag,
            name: name.as_str(),
            name_start: name.start(),
            body: body.as_str(),
            body_start: body.start(),
            text: whole.as_str(),
        });
        pos = whole.end();

        let lower = name.as_str().to_ascii_lowercase();
        if !end_tag && RAW_TEXT_ELEMENTS.contains(&lower.as_str()) {
            // Resume at the end tag so its own casing is still checked.
            let closing = format!("</{lower}");
            pos = input[pos..]
                .to_ascii_lowercase()
                .find(&closing)
                .map_or(input.len(), |at| pos + at);
        }
    }
    tags
}

fn has_uppercase(s: &str) -> bool {
    s.chars().any(char::is_uppercase)
}

/// Accumulates defects, dropping repeats of the same kind and substring.
struct Collector<'a> {
    input: &'a str,
    seen: HashSet<(DefectKind, String)>,
    defects: Vec<Defect>,
}

impl<'a> Collector<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            seen: HashSet::new(),
            defects: Vec::new(),
        }
    }

    fn push(&mut self, kind: DefectKind, offset: usize, original: &str, fixed: String) {
        if !self.seen.insert((kind, original.to_string())) {
            return;
        }
        let (line, column) = position(self.input, offset);
        self.defects.push(Defect {
            kind,
            line,
            column,
            original: original.to_string(),
            fixed,
        });
    }
}

/// 1-based line and column of a byte offset.
fn position(input: &str, offset: usize) -> (usize, usize) {
    let before = &input[..offset];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}
