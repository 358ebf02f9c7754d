//! Line-oriented unified diff.
//!
//! Output follows the classic `diff -u` layout with `old`/`new` file labels,
//! three lines of context and no trailing newline. Hunk ranges use the short
//! form (`-5` instead of `-5,1`) for single-line ranges and `start-1,0` for
//! empty ones.

/// Lines of context around each change.
const CONTEXT: usize = 3;

/// Largest LCS table before falling back to a whole-block replacement.
const MAX_TABLE_CELLS: usize = 4_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Equal,
    Change,
}

/// A run of lines: `old[i1..i2]` against `new[j1..j2]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Opcode {
    tag: Tag,
    i1: usize,
    i2: usize,
    j1: usize,
    j2: usize,
}

/// Unified diff of `old` against `new`; empty when the texts have the same lines.
pub fn unified_diff(old: &str, new: &str) -> String {
    let old_lines = split_lines(old);
    let new_lines = split_lines(new);

    let opcodes = opcodes(&old_lines, &new_lines);
    let groups = grouped(opcodes);
    if groups.is_empty() {
        return String::new();
    }

    let mut out = vec!["--- old".to_string(), "+++ new".to_string()];
    for group in groups {
        let (first, last) = (group[0], group[group.len() - 1]);
        out.push(format!(
            "@@ -{} +{} @@",
            format_range(first.i1, last.i2),
            format_range(first.j1, last.j2)
        ));
        for op in group {
            match op.tag {
                Tag::Equal => {
                    out.extend(old_lines[op.i1..op.i2].iter().map(|l| format!(" {}", l)));
                }
                Tag::Change => {
                    out.extend(old_lines[op.i1..op.i2].iter().map(|l| format!("-{}", l)));
                    out.extend(new_lines[op.j1..op.j2].iter().map(|l| format!("+{}", l)));
                }
            }
        }
    }
    out.join("\n")
}

/// Split on `\n`, `\r\n` or a lone `\r`, dropping the terminators. A
/// trailing terminator does not start an extra empty line.
fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let bytes = text.as_bytes();
    let mut start = 0;
    let mut idx = 0;
    while idx < bytes.len() {
        match bytes[idx] {
            b'\n' => {
                lines.push(&text[start..idx]);
                start = idx + 1;
            }
            b'\r' => {
                lines.push(&text[start..idx]);
                if bytes.get(idx + 1) == Some(&b'\n') {
                    idx += 1;
                }
                start = idx + 1;
            }
            _ => {}
        }
        idx += 1;
    }
    if start < bytes.len() {
        lines.push(&text[start..]);
    }
    lines
}

fn format_range(start: usize, stop: usize) -> String {
    let length = stop - start;
    match length {
        1 => format!("{}", start + 1),
        0 => format!("{},0", start),
        _ => format!("{},{}", start + 1, length),
    }
}

/// Opcodes covering both sequences, alternating equal and changed runs.
fn opcodes(old: &[&str], new: &[&str]) -> Vec<Opcode> {
    let prefix = old
        .iter()
        .zip(new.iter())
        .take_while(|(a, b)| a == b)
        .count();
    let suffix = old[prefix..]
        .iter()
        .rev()
        .zip(new[prefix..].iter().rev())
        .take_while(|(a, b)| a == b)
        .count();

    let old_mid = &old[prefix..old.len() - suffix];
    let new_mid = &new[prefix..new.len() - suffix];

    let steps = align(old_mid, new_mid);

    let mut codes: Vec<Opcode> = Vec::new();
    let mut push = |tag: Tag, i1: usize, i2: usize, j1: usize, j2: usize| {
        if i1 == i2 && j1 == j2 {
            return;
        }
        if let Some(last) = codes.last_mut() {
            if last.tag == tag && last.i2 == i1 && last.j2 == j1 {
                last.i2 = i2;
                last.j2 = j2;
                return;
            }
        }
        codes.push(Opcode { tag, i1, i2, j1, j2 });
    };

    push(Tag::Equal, 0, prefix, 0, prefix);
    let (mut i, mut j) = (prefix, prefix);
    for step in steps {
        let (di, dj, tag) = match step {
            Step::Keep => (1, 1, Tag::Equal),
            Step::Delete => (1, 0, Tag::Change),
            Step::Insert => (0, 1, Tag::Change),
        };
        push(tag, i, i + di, j, j + dj);
        i += di;
        j += dj;
    }
    push(Tag::Equal, i, i + suffix, j, j + suffix);

    codes
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Keep,
    Delete,
    Insert,
}

/// Longest-common-subsequence alignment of two line slices.
fn align(old: &[&str], new: &[&str]) -> Vec<Step> {
    let (n, m) = (old.len(), new.len());
    if n == 0 || m == 0 || (n + 1) * (m + 1) > MAX_TABLE_CELLS {
        let mut steps = vec![Step::Delete; n];
        steps.extend(std::iter::repeat(Step::Insert).take(m));
        return steps;
    }

    // table[i][j] = LCS length of old[i..] and new[j..]
    let width = m + 1;
    let mut table = vec![0u32; (n + 1) * width];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            table[i * width + j] = if old[i] == new[j] {
                table[(i + 1) * width + j + 1] + 1
            } else {
                table[(i + 1) * width + j].max(table[i * width + j + 1])
            };
        }
    }

    let mut steps = Vec::with_capacity(n + m);
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if old[i] == new[j] {
            steps.push(Step::Keep);
            i += 1;
            j += 1;
        } else if table[(i + 1) * width + j] >= table[i * width + j + 1] {
            steps.push(Step::Delete);
            i += 1;
        } else {
            steps.push(Step::Insert);
            j += 1;
        }
    }
    steps.extend(std::iter::repeat(Step::Delete).take(n - i));
    steps.extend(std::iter::repeat(Step::Insert).take(m - j));
    steps
}

/// Split opcodes into hunks with [`CONTEXT`] lines of surrounding context.
fn grouped(mut codes: Vec<Opcode>) -> Vec<Vec<Opcode>> {
    if !codes.iter().any(|c| c.tag == Tag::Change) {
        return Vec::new();
    }

    if let Some(first) = codes.first_mut() {
        if first.tag == Tag::Equal {
            first.i1 = first.i1.max(first.i2.saturating_sub(CONTEXT));
            first.j1 = first.j1.max(first.j2.saturating_sub(CONTEXT));
        }
    }
    if let Some(last) = codes.last_mut() {
        if last.tag == Tag::Equal {
            last.i2 = last.i2.min(last.i1 + CONTEXT);
            last.j2 = last.j2.min(last.j1 + CONTEXT);
        }
    }

    let mut groups = Vec::new();
    let mut group = Vec::new();
    for mut code in codes {
        if code.tag == Tag::Equal && code.i2 - code.i1 > 2 * CONTEXT {
            group.push(Opcode {
                i2: code.i2.min(code.i1 + CONTEXT),
                j2: code.j2.min(code.j1 + CONTEXT),
                ..code
            });
            groups.push(std::mem::take(&mut group));
            code.i1 = code.i1.max(code.i2.saturating_sub(CONTEXT));
            code.j1 = code.j1.max(code.j2.saturating_sub(CONTEXT));
        }
        group.push(code);
    }
    if !(group.len() == 1 && group[0].tag == Tag::Equal) && !group.is_empty() {
        groups.push(group);
    }

    // A leading equal-only group can appear when the first run is long
    groups.retain(|g| g.iter().any(|c| c.tag == Tag::Change));
    groups
}
