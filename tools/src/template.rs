//! `$PROBE` expansion for working-directory templates.

/// Variable name replaced by the probe value.
pub const PROBE_VAR: &str = "PROBE";

/// Expand `$NAME` and `${NAME}` in `template`, with shell-style rules.
///
/// `PROBE` becomes `value`; every other name expands to the empty string,
/// including the one-character specials (`$$`, `$1`, `$?`, ...). A `$` not
/// followed by a name, or at the very end, is kept. Malformed braces (`${}`,
/// an unterminated `${`) are dropped.
#[must_use]
pub fn expand_probe_template(template: &str, value: &str) -> String {
    let lookup = |name: &str| if name == PROBE_VAR { value } else { "" };

    let mut out = String::with_capacity(template.len() + value.len());
    let mut rest = template;

    while let Some(pos) = rest.find('$') {
        let after = &rest[pos + 1..];
        if after.is_empty() {
            break;
        }
        out.push_str(&rest[..pos]);

        let (name, width) = shell_name(after);
        if !name.is_empty() {
            out.push_str(lookup(name));
        } else if width == 0 {
            out.push('$');
        }
        rest = &after[width..];
    }

    out.push_str(rest);
    out
}

fn is_special(byte: u8) -> bool {
    matches!(byte, b'*' | b'#' | b'$' | b'@' | b'!' | b'?' | b'-' | b'0'..=b'9')
}

/// Name following a `$` and the number of bytes it spans.
///
/// An empty name with a non-zero width is malformed syntax to be dropped.
fn shell_name(s: &str) -> (&str, usize) {
    let bytes = s.as_bytes();
    if bytes[0] == b'{' {
        if bytes.len() > 2 && is_special(bytes[1]) && bytes[2] == b'}' {
            return (&s[1..2], 3);
        }
        return match s[1..].find('}') {
            Some(0) => ("", 2),
            Some(end) => (&s[1..=end], end + 2),
            None => ("", 1),
        };
    }
    if is_special(bytes[0]) {
        return (&s[..1], 1);
    }
    let len = bytes
        .iter()
        .take_while(|b| b.is_ascii_alphanumeric() || **b == b'_')
        .count();
    (&s[..len], len)
}
