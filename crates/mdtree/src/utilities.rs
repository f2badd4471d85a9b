//! Text helpers shared by the lexical rules.

/// Length of the line terminator at the start of `s` (`\r\n`, `\r` or `\n`)
pub fn terminator_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    match bytes.first() {
        Some(b'\r') if bytes.get(1) == Some(&b'\n') => 2,
        Some(b'\r') | Some(b'\n') => 1,
        _ => 0,
    }
}

/// Split off the first line, returning it and the length of its terminator
pub fn split_line(s: &str) -> (&str, usize) {
    match s.find(['\r', '\n']) {
        Some(end) => (&s[..end], terminator_len(&s[end..])),
        None => (s, 0),
    }
}

/// Number of line terminators in `s`, counting `\r\n` once
pub fn count_terminators(s: &str) -> usize {
    let mut count = 0;
    let mut rest = s;
    while let Some(start) = rest.find(['\r', '\n']) {
        count += 1;
        rest = &rest[start + terminator_len(&rest[start..])..];
    }
    count
}

/// Length of a whitespace-only line at the start of `s`, terminator included
pub fn blank_line_len(s: &str) -> Option<usize> {
    let indent = leading_whitespace(s);
    match terminator_len(&s[indent..]) {
        0 => None,
        n => Some(indent + n),
    }
}

/// Byte length of the leading spaces and tabs of `s`
pub fn leading_whitespace(s: &str) -> usize {
    s.len() - s.trim_start_matches([' ', '\t']).len()
}

/// Join wrapped lines: every terminator and the whitespace around it becomes
/// a single space
pub fn fold_lines(s: &str) -> String {
    let mut folded = String::with_capacity(s.len());
    let mut rest = s;
    while !rest.is_empty() {
        let (line, terminator) = split_line(rest);
        if terminator == 0 {
            folded.push_str(line);
            break;
        }
        folded.push_str(line.trim_end_matches([' ', '\t']));
        folded.push(' ');
        rest = rest[line.len() + terminator..].trim_start_matches([' ', '\t']);
    }
    folded
}

/// Byte offset of the first `delimiter` in `s` that lies inside the current
/// paragraph.
///
/// The search stops at a blank line and at any line for which `opens_block`
/// holds; it is handed the input from the start of that line.
pub fn find_closing(
    s: &str,
    delimiter: &str,
    opens_block: impl Fn(&str) -> bool,
) -> Option<usize> {
    let mut offset = 0;
    while offset < s.len() {
        let rest = &s[offset..];
        if rest.starts_with(delimiter) {
            return Some(offset);
        }
        let terminator = terminator_len(rest);
        if terminator > 0 {
            let next = &rest[terminator..];
            if blank_line_len(next).is_some() || opens_block(next) {
                return None;
            }
            offset += terminator;
            continue;
        }
        offset += rest.chars().next().map_or(1, char::len_utf8);
    }
    None
}
