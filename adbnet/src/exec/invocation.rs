//! Invocation strings for the debug-bridge tool
//!
//! Every string handed to the shell is assembled here. Arguments coming from the
//! user are either validated (hosts) or wrapped in double quotes with the characters
//! the shell still expands inside double quotes escaped (paths).

use crate::errors::AdbNetError;
use crate::models::address::Address;

/// Tool name at the start of every invocation; the runner swaps in the configured path.
pub const TOOL: &str = "adb";

/// Escape text for `input text`.
///
/// Spaces become `%s` (the device-side encoding for a space) and the characters the
/// device shell would interpret are backslash-escaped.
pub fn escape_input_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            ' ' => escaped.push_str("%s"),
            '"' | '\'' | '(' | ')' | '&' | ';' => {
                escaped.push('\\');
                escaped.push(c);
            }
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Escape text for use inside host-shell double quotes.
///
/// `$`, `` ` `` and `"` are always escaped. A backslash is doubled only where the
/// shell would otherwise consume it (before `$`, `` ` ``, `"`, `\`, a newline or
/// the closing quote), so escapes meant for the device shell pass through intact.
pub fn escape_double_quoted(arg: &str) -> String {
    let mut escaped = String::with_capacity(arg.len() + 2);
    let mut chars = arg.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '$' | '`' | '"' => {
                escaped.push('\\');
                escaped.push(c);
            }
            '\\' => {
                let consumed = matches!(chars.peek(), None | Some('$' | '`' | '"' | '\\' | '\n'));
                if consumed {
                    escaped.push('\\');
                }
                escaped.push(c);
            }
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Wrap an argument in double quotes for the host shell.
pub fn quote(arg: &str) -> String {
    format!("\"{}\"", escape_double_quoted(arg))
}

fn validate_host(host: &str) -> Result<(), AdbNetError> {
    let valid = !host.is_empty()
        && host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | ':' | '[' | ']'));
    if valid {
        Ok(())
    } else {
        Err(AdbNetError::ValidationError(format!("invalid host: {}", host)))
    }
}

/// `adb connect <host>:<port>`
pub fn connect(address: &Address) -> Result<String, AdbNetError> {
    validate_host(&address.host)?;
    Ok(format!("{} connect {}", TOOL, address))
}

/// `adb devices`
pub fn devices() -> String {
    format!("{} devices", TOOL)
}

/// `adb version`
pub fn version() -> String {
    format!("{} version", TOOL)
}

/// `adb shell input keyevent <code>`
pub fn key_event(code: u32) -> String {
    format!("{} shell input keyevent {}", TOOL, code)
}

/// `adb shell input text "<escaped text>"`
///
/// Escaped twice: once for the device shell, then for the host shell.
pub fn input_text(text: &str) -> String {
    format!("{} shell input text {}", TOOL, quote(&escape_input_text(text)))
}

/// `adb push "<source>" "<target>"`
pub fn push(source: &str, target: &str) -> String {
    format!("{} push {} {}", TOOL, quote(source), quote(target))
}

/// `adb pull "<source>" "<target>"`
pub fn pull(source: &str, target: &str) -> String {
    format!("{} pull {} {}", TOOL, quote(source), quote(target))
}

/// `adb shell ls -la "<path>"`
pub fn list_path(path: &str) -> String {
    format!("{} shell ls -la {}", TOOL, quote(path))
}
