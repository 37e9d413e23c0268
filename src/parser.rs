use crate::{
    config::{ExtensionlessPolicy, IndentUnit, ParseOptions},
    tree::{Directory, File, Node},
};

/// Everything after this marker on a line is a comment, not structure.
const COMMENT_MARKER: &str = "//";
/// A comment starting with this keyword seeds the file with the rest of the comment.
const CONTENT_KEYWORD: &str = "content:";
/// Metadata files dropped by file browsers; never part of a tree.
const IGNORED_ARTIFACTS: &[&str] = &[".DS_Store", "Thumbs.db", "desktop.ini"];
const CONNECTOR_GLYPHS: &[char] = &['├', '└', '│'];
const VERTICAL_GLYPH: char = '│';
const PATH_SEPARATOR: char = '/';

lazy_static::lazy_static! {
    static ref CONNECTOR_REGEX: regex::Regex = regex::Regex::new(
        r"(?x)
        ^(?P<prefix>.*?)      # vertical continuations and padding
        [├└]─+\s*             # branch or last-branch token
        (?P<name>.*)$"
    )
    .expect("a valid regex pattern");
}

/// The two syntaxes a tree can be drawn in. Decided once per input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Connector,
    Indentation,
}
impl Format {
    /// Connector format as soon as a single line carries a box-drawing glyph.
    pub fn detect<'a>(mut lines: impl Iterator<Item = &'a str>) -> Self {
        if lines.any(|line| line.contains(CONNECTOR_GLYPHS)) {
            Self::Connector
        } else {
            Self::Indentation
        }
    }
}

/// A line that survived preprocessing: comment removed, content captured.
#[derive(Debug)]
struct Line {
    number: usize,
    text: String,
    content: Option<String>,
}

/// A line with its nesting depth worked out, not yet classified.
#[derive(Debug)]
struct Entry {
    number: usize,
    depth: usize,
    name: String,
    content: Option<String>,
}

/// Parses a drawn tree into its root [`Directory`].
///
/// Returns `None` when no line yields a usable root name. Malformed lines are
/// skipped and logged at debug level; parsing never fails outright.
pub fn parse(raw: &str, options: &ParseOptions) -> Option<Directory> {
    let lines = preprocess(raw);

    let format = Format::detect(lines.iter().map(|line| line.text.as_str()));
    log::debug!("detected {:?} format over {} lines", format, lines.len());

    let mut lines = lines.into_iter();

    let root = lines.by_ref().find_map(|line| {
        let name = line.text.trim().trim_end_matches(PATH_SEPARATOR).trim_end();
        if name.is_empty() {
            log::debug!("line {}: skipping root candidate without a name", line.number);
            None
        } else {
            Some(Directory::new(name))
        }
    })?;

    let rest: Vec<Line> = lines.collect();

    let entries = match format {
        Format::Connector => connector_entries(rest),
        Format::Indentation => indentation_entries(rest, options.indent_unit),
    };

    Some(assemble(root, entries, options.extensionless))
}

/// Normalizes line endings, drops blank lines and browser artifacts, and splits off comments.
fn preprocess(raw: &str) -> Vec<Line> {
    let normalized = raw.replace("\r\n", "\n").replace('\r', "\n");

    normalized
        .split('\n')
        .enumerate()
        .filter_map(|(index, line)| {
            let number = index + 1;

            if line.trim().is_empty() {
                return None;
            }

            let (structure, content) = split_comment(line);

            if structure.trim().is_empty() {
                log::debug!("line {}: skipping comment-only line", number);
                return None;
            }

            if is_ignored_artifact(structure) {
                log::debug!("line {}: skipping file browser artifact", number);
                return None;
            }

            Some(Line {
                number,
                text: structure.trim_end().to_string(),
                content: content.map(str::to_string),
            })
        })
        .collect()
}

/// Splits a line at the first comment marker, capturing `content:` comments.
fn split_comment(line: &str) -> (&str, Option<&str>) {
    match line.split_once(COMMENT_MARKER) {
        Some((structure, comment)) => {
            let content = comment
                .trim_start()
                .strip_prefix(CONTENT_KEYWORD)
                .map(str::trim)
                .filter(|content| !content.is_empty());

            (structure, content)
        }
        None => (line, None),
    }
}

/// Compares the whole entry name, after any connector and without a trailing `/`.
fn is_ignored_artifact(structure: &str) -> bool {
    let name = CONNECTOR_REGEX
        .captures(structure)
        .and_then(|captures| captures.name("name"))
        .map_or(structure, |name| name.as_str());

    let name = name.trim().trim_end_matches(PATH_SEPARATOR).trim_end();

    IGNORED_ARTIFACTS.contains(&name)
}

/// Depth is the number of vertical continuations before the branch token, plus one.
fn connector_entries(lines: Vec<Line>) -> Vec<Entry> {
    lines
        .into_iter()
        .filter_map(|line| {
            let Some(captures) = CONNECTOR_REGEX.captures(&line.text) else {
                log::debug!("line {}: skipping line without a connector", line.number);
                return None;
            };

            let depth = captures["prefix"]
                .chars()
                .filter(|&c| c == VERTICAL_GLYPH)
                .count()
                + 1;

            Some(Entry {
                number: line.number,
                depth,
                name: captures["name"].trim().to_string(),
                content: line.content,
            })
        })
        .collect()
}

/// Depth is the leading-space count divided by the indent unit, rounded down.
fn indentation_entries(lines: Vec<Line>, unit: IndentUnit) -> Vec<Entry> {
    let unit = unit.resolve(lines.iter().map(|line| leading_spaces(&line.text)));
    log::debug!("using an indent unit of {} spaces", unit);

    lines
        .into_iter()
        .map(|line| Entry {
            number: line.number,
            depth: leading_spaces(&line.text) / unit,
            name: line.text.trim().to_string(),
            content: line.content,
        })
        .collect()
}

fn leading_spaces(text: &str) -> usize {
    text.len() - text.trim_start_matches(' ').len()
}

/// Decides between directory and file, stripping the trailing separator.
fn classify(entry: Entry, extensionless: ExtensionlessPolicy) -> Option<Node> {
    let has_separator = entry.name.ends_with(PATH_SEPARATOR);
    let name = entry.name.trim_end_matches(PATH_SEPARATOR).trim_end();

    if name.is_empty() {
        log::debug!("line {}: skipping entry without a name", entry.number);
        return None;
    }

    let is_directory = has_separator
        || (!name.contains('.') && extensionless == ExtensionlessPolicy::Directory);

    if is_directory {
        if entry.content.is_some() {
            log::debug!(
                "line {}: dropping content for directory '{}'",
                entry.number,
                name
            );
        }

        Some(Node::Directory(Directory::new(name)))
    } else {
        Some(Node::File(File {
            name: name.to_string(),
            content: entry.content,
        }))
    }
}

/// Builds the hierarchy in one pass with a stack of open directories keyed by depth.
///
/// A directory is attached to its parent when it is popped, which keeps children in
/// source order. The root sits below the stack, so anything shallower than depth 1
/// lands directly under it.
fn assemble(
    mut root: Directory,
    entries: Vec<Entry>,
    extensionless: ExtensionlessPolicy,
) -> Directory {
    let mut stack: Vec<(usize, Directory)> = Vec::new();

    for entry in entries {
        let depth = entry.depth;

        let Some(node) = classify(entry, extensionless) else {
            continue;
        };

        while stack.last().is_some_and(|(top, _)| *top >= depth) {
            close_top(&mut root, &mut stack);
        }

        match node {
            Node::Directory(dir) => stack.push((depth, dir)),
            Node::File(file) => innermost(&mut root, &mut stack).push(file),
        }
    }

    while !stack.is_empty() {
        close_top(&mut root, &mut stack);
    }

    root
}

/// The open directory new entries attach to; the root once the stack is empty.
fn innermost<'a>(
    root: &'a mut Directory,
    stack: &'a mut [(usize, Directory)],
) -> &'a mut Directory {
    match stack.last_mut() {
        Some((_, dir)) => dir,
        None => root,
    }
}

fn close_top(root: &mut Directory, stack: &mut Vec<(usize, Directory)>) {
    if let Some((_, finished)) = stack.pop() {
        innermost(root, stack).push(finished);
    }
}
