//! Document Normalizer — strips typesetting commands from a résumé source.
//!
//! Two single passes over the text:
//! 1. `\name{arg}` → `arg` (argument ends at the first `}`; nesting is not tracked)
//! 2. remaining `\name` → one space
//!
//! then the result is trimmed. Nested braces are out of scope; whatever the two
//! passes produce on them is accepted.

/// Returns plain prose from a typeset-markup document.
pub fn strip_markup(source: &str) -> String {
    let unwrapped = unwrap_bracketed_commands(source);
    blank_bare_commands(&unwrapped).trim().to_string()
}

/// Length in bytes of the ASCII-letter command name at the start of `s`.
fn command_name_len(s: &str) -> usize {
    s.bytes().take_while(u8::is_ascii_alphabetic).count()
}

fn unwrap_bracketed_commands(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut rest = source;

    while let Some(pos) = rest.find('\\') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];
        let name_len = command_name_len(after);

        if name_len > 0 {
            if let Some(arg) = after[name_len..].strip_prefix('{') {
                if let Some(close) = arg.find('}') {
                    out.push_str(&arg[..close]);
                    rest = &arg[close + 1..];
                    continue;
                }
            }
        }

        // Not a bracketed command: keep the backslash and name for the next pass.
        out.push('\\');
        out.push_str(&after[..name_len]);
        rest = &after[name_len..];
    }

    out.push_str(rest);
    out
}

fn blank_bare_commands(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut rest = source;

    while let Some(pos) = rest.find('\\') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];
        let name_len = command_name_len(after);

        if name_len == 0 {
            out.push('\\');
        } else {
            out.push(' ');
        }
        rest = &after[name_len..];
    }

    out.push_str(rest);
    out
}
