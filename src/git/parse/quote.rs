/// Undo git's C-style path quoting.
///
/// Unquoted input is returned as-is. Returns `None` for a malformed quoted
/// string (missing closing quote, unknown escape, short octal).
pub fn unquote(raw: &str) -> Option<String> {
    if !raw.starts_with('"') {
        return Some(raw.to_string());
    }
    let (value, rest) = split_quoted(raw)?;
    rest.is_empty().then_some(value)
}

/// Split a leading quoted token off `raw`, returning it unquoted along with
/// the remainder after the closing quote.
pub(super) fn split_quoted(raw: &str) -> Option<(String, &str)> {
    let body = raw.strip_prefix('"')?;
    let bytes = body.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'"' => {
                let value = String::from_utf8(out)
                    .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned());
                return Some((value, &body[i + 1..]));
            }
            b'\\' => {
                let escaped = *bytes.get(i + 1)?;
                let decoded = match escaped {
                    b'a' => 0x07,
                    b'b' => 0x08,
                    b'f' => 0x0c,
                    b'n' => b'\n',
                    b'r' => b'\r',
                    b't' => b'\t',
                    b'v' => 0x0b,
                    b'\\' => b'\\',
                    b'"' => b'"',
                    b'0'..=b'3' => {
                        let digits = bytes.get(i + 1..i + 4)?;
                        if !digits.iter().all(|d| (b'0'..=b'7').contains(d)) {
                            return None;
                        }
                        let value = digits
                            .iter()
                            .fold(0u8, |acc, d| acc.wrapping_mul(8).wrapping_add(d - b'0'));
                        out.push(value);
                        i += 4;
                        continue;
                    }
                    _ => return None,
                };
                out.push(decoded);
                i += 2;
            }
            other => {
                out.push(other);
                i += 1;
            }
        }
    }

    None
}
