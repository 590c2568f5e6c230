//! Scanner for the sentinel-delimited managed block.

use crate::core::constants::{BLOCK_BEGIN, BLOCK_END};
use crate::core::table::Line;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Outside,
    Inside,
}

fn trim_end(line: &[u8]) -> &[u8] {
    let len = line
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(0, |i| i + 1);
    &line[..len]
}

fn trim(line: &[u8]) -> &[u8] {
    let line = trim_end(line);
    let start = line
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(line.len());
    &line[start..]
}

fn is_begin(line: &[u8]) -> bool {
    trim_end(line) == BLOCK_BEGIN.as_bytes()
}

fn is_end(line: &[u8]) -> bool {
    trim_end(line) == BLOCK_END.as_bytes()
}

/// Split a schedule into lines outside the managed block and lines inside it.
///
/// A BEGIN opens the block and the next END closes it; sentinel lines
/// themselves belong to neither side. A BEGIN seen while already inside is
/// swallowed, so nesting collapses into the outer region. A BEGIN without an
/// END runs to the end of input, and an END seen outside is ordinary content.
/// Should a schedule somehow hold several regions, all of them are treated
/// as managed, so the next rewrite leaves exactly one.
pub fn partition(lines: &[Line]) -> (Vec<Line>, Option<Vec<Line>>) {
    let mut state = State::Outside;
    let mut seen = false;
    let mut outside = Vec::with_capacity(lines.len());
    let mut inside = Vec::new();

    for line in lines {
        match state {
            State::Outside if is_begin(line) => {
                state = State::Inside;
                seen = true;
            }
            State::Outside => outside.push(line.clone()),
            State::Inside if is_end(line) => state = State::Outside,
            State::Inside => {
                if !is_begin(line) {
                    inside.push(line.clone());
                }
            }
        }
    }

    (outside, seen.then_some(inside))
}

/// Every line outside the managed block, in original order.
pub fn strip_managed(lines: &[Line]) -> Vec<Line> {
    partition(lines).0
}

/// Contents of the managed block, or `None` if the schedule has none.
pub fn managed_lines(lines: &[Line]) -> Option<Vec<Line>> {
    partition(lines).1
}

/// Number of job entries in a managed block, skipping `NAME=value` lines.
pub fn job_count(block: &[Line]) -> usize {
    block
        .iter()
        .filter(|line| {
            line.split(u8::is_ascii_whitespace)
                .find(|token| !token.is_empty())
                .is_some_and(|first| !is_assignment(first))
        })
        .count()
}

fn is_assignment(token: &[u8]) -> bool {
    match token.iter().position(|&b| b == b'=') {
        Some(eq) => {
            let name = &token[..eq];
            !name.is_empty() && name.iter().all(|&b| b.is_ascii_alphanumeric() || b == b'_')
        }
        None => false,
    }
}

/// Drop comments and blank lines from a hand-edited template.
pub fn normalize_template(template: &[Line]) -> Vec<Line> {
    template
        .iter()
        .filter(|line| {
            let trimmed = trim(line);
            !trimmed.is_empty() && !trimmed.starts_with(b"#")
        })
        .cloned()
        .collect()
}
