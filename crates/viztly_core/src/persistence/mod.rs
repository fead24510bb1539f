//! Line-oriented outline text format.
//!
//! One item per line, nested by [`INDENT_WIDTH`] spaces per level. The root
//! is implicit. A line may end with `/board` and `/closed` tokens in any
//! order; `/closed` is only written for items that have children. A title
//! that itself ends in a token gets a backslash before the token's slash.

pub mod snapshot;

pub use snapshot::{ItemSnapshot, SnapshotStore};

use std::borrow::Cow;

use crate::constants::{BOARD_TOKEN, CLOSED_TOKEN, INDENT_WIDTH};
use crate::error::OutlineError;
use crate::tree::{ItemId, Outline, View};

/// Byte offset of a trailing token and the backslashes before it, when
/// that run follows a space or starts the title.
fn token_suffix_start(title: &str) -> Option<usize> {
    [BOARD_TOKEN, CLOSED_TOKEN].iter().find_map(|token| {
        let stem = title.strip_suffix(token)?.trim_end_matches('\\');
        (stem.is_empty() || stem.ends_with(' ')).then_some(stem.len())
    })
}

fn write_line(out: &mut String, outline: &Outline, id: ItemId, depth: usize) {
    let item = &outline[id];
    out.extend(std::iter::repeat(' ').take(depth * INDENT_WIDTH));
    match token_suffix_start(&item.title) {
        Some(at) => {
            out.push_str(&item.title[..at]);
            out.push('\\');
            out.push_str(&item.title[at..]);
        }
        None => out.push_str(&item.title),
    }
    if item.view == View::Board {
        out.push(' ');
        out.push_str(BOARD_TOKEN);
    }
    if item.has_children() && !item.is_open {
        out.push(' ');
        out.push_str(CLOSED_TOKEN);
    }
    out.push('\n');
}

/// Render every item below the root.
pub fn serialize(outline: &Outline) -> String {
    let mut out = String::new();
    for top in outline[outline.root()].children() {
        for (id, depth) in outline.subtree(*top) {
            write_line(&mut out, outline, id, depth);
        }
    }
    out
}

/// Render `id` and its descendants with `id` at depth 0.
pub fn serialize_subtree(outline: &Outline, id: ItemId) -> String {
    let mut out = String::new();
    for (node, depth) in outline.subtree(id) {
        write_line(&mut out, outline, node, depth);
    }
    out
}

#[derive(Debug, Default, PartialEq, Eq)]
struct ParsedLine<'a> {
    depth: usize,
    title: Cow<'a, str>,
    board: bool,
    closed: bool,
}

fn strip_token<'a>(content: &'a str, token: &str) -> Option<&'a str> {
    if content == token {
        return Some("");
    }
    content
        .strip_suffix(token)
        .and_then(|rest| rest.strip_suffix(' '))
}

fn parse_line(raw: &str, line: usize) -> Result<Option<ParsedLine<'_>>, OutlineError> {
    let raw = raw.strip_suffix('\r').unwrap_or(raw);
    if raw.trim().is_empty() {
        return Ok(None);
    }
    let content = raw.trim_start_matches(' ');
    if content.starts_with('\t') {
        return Err(OutlineError::parse(line, "tabs are not valid indentation"));
    }
    let mut parsed = ParsedLine {
        depth: (raw.len() - content.len()) / INDENT_WIDTH,
        ..ParsedLine::default()
    };
    let mut title = content;
    loop {
        if let Some(rest) = strip_token(title, BOARD_TOKEN) {
            parsed.board = true;
            title = rest;
        } else if let Some(rest) = strip_token(title, CLOSED_TOKEN) {
            parsed.closed = true;
            title = rest;
        } else {
            break;
        }
    }
    parsed.title = match token_suffix_start(title) {
        Some(at) if title[at..].starts_with('\\') => {
            Cow::Owned(format!("{}{}", &title[..at], &title[at + 1..]))
        }
        _ => Cow::Borrowed(title),
    };
    Ok(Some(parsed))
}

/// Build items from `text` as children of `parent`.
///
/// A line indented deeper than one level past its predecessor attaches to
/// the deepest item available.
///
/// # Returns
/// The handles of the new top-level items, in order.
fn build_under(outline: &mut Outline, parent: ItemId, text: &str) -> Result<Vec<ItemId>, OutlineError> {
    let mut chain = vec![parent];
    let mut created: Vec<(ItemId, bool)> = Vec::new();
    let mut top_level = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let Some(line) = parse_line(raw, index + 1)? else {
            continue;
        };
        let depth = line.depth.min(chain.len() - 1);
        chain.truncate(depth + 1);
        let id = outline.create_item(line.title.into_owned());
        if line.board {
            outline[id].view = View::Board;
        }
        outline.insert_as_last_child(chain[depth], id)?;
        if depth == 0 {
            top_level.push(id);
        }
        chain.push(id);
        created.push((id, line.closed));
    }

    for (id, closed) in created {
        let item = &mut outline[id];
        item.is_open = item.has_children() && !closed;
    }
    Ok(top_level)
}

/// Parse a whole document into a fresh outline.
///
/// # Errors
/// Returns [`OutlineError::Parse`] for tab indentation.
pub fn parse(text: &str) -> Result<Outline, OutlineError> {
    let mut outline = Outline::new();
    let root = outline.root();
    let top_level = build_under(&mut outline, root, text)?;
    outline[root].is_open = !top_level.is_empty();
    tracing::debug!(items = outline.live_count() - 1, "parsed outline text");
    Ok(outline)
}

/// Parse `text` into detached items inside an existing outline.
///
/// Used for pasting: the caller attaches and records each returned item.
pub fn parse_detached(outline: &mut Outline, text: &str) -> Result<Vec<ItemId>, OutlineError> {
    let holder = outline.create_item("");
    let top_level = match build_under(outline, holder, text) {
        Ok(top_level) => top_level,
        Err(err) => {
            for child in outline[holder].children().to_vec() {
                outline.remove(child)?;
                outline.release(child)?;
            }
            outline.release(holder)?;
            return Err(err);
        }
    };
    for id in &top_level {
        outline.remove(*id)?;
    }
    outline.release(holder)?;
    Ok(top_level)
}
