//! Message text to trigger and arguments.

/// Splits text into shell-like arguments.
///
/// Whitespace separates arguments unless quoted. Single quotes are literal;
/// inside double quotes a backslash escapes the next character. An empty
/// quoted string (`""`) yields an empty argument. Unterminated quotes run to
/// the end of the input.
pub fn split_args(input: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut in_single_quote = false;
    let mut in_double_quote = false;
    let mut escape_next = false;

    for ch in input.chars() {
        if escape_next {
            current.push(ch);
            escape_next = false;
            continue;
        }

        match ch {
            '\\' if in_double_quote => {
                escape_next = true;
            }
            '\'' if !in_double_quote => {
                in_single_quote = !in_single_quote;
                quoted = true;
            }
            '"' if !in_single_quote => {
                in_double_quote = !in_double_quote;
                quoted = true;
            }
            c if c.is_whitespace() && !in_single_quote && !in_double_quote => {
                if !current.is_empty() || quoted {
                    args.push(std::mem::take(&mut current));
                }
                quoted = false;
            }
            _ => {
                current.push(ch);
            }
        }
    }

    if !current.is_empty() || quoted {
        args.push(current);
    }

    args
}

/// Strips `prefix` from `content` and splits the rest into a trigger and its
/// arguments.
///
/// Returns `None` when the prefix does not match or nothing follows it. The
/// trigger is lowercased; arguments are left untouched.
pub fn parse_command(content: &str, prefix: &str) -> Option<(String, Vec<String>)> {
    let rest = content.trim_start().strip_prefix(prefix)?;
    // "! ping" is not a command.
    if rest.starts_with(char::is_whitespace) {
        return None;
    }
    let mut args = split_args(rest);
    if args.is_empty() || args[0].is_empty() {
        return None;
    }
    let trigger = args.remove(0).to_lowercase();
    Some((trigger, args))
}
