//! Display formatting for recipient mail addresses.

use std::fmt;

use email_encoding::headers::rfc2047;
use email_encoding::headers::writer::EmailWriter;
use lettre::Address;

/// Build the `To` header value for a recipient.
///
/// With both names present this is `"First Last" <email>`. A printable-ASCII
/// display name is rendered as an RFC 5322 quoted string; anything else
/// (non-ASCII letters, control characters) becomes an RFC 2047 encoded-word,
/// so the value never carries a raw line break. Otherwise, or when `email`
/// does not parse as an address, `email` is returned unchanged.
pub fn format_address(email: &str, first_name: &str, last_name: &str) -> String {
    if first_name.is_empty() || last_name.is_empty() {
        return email.to_owned();
    }
    let Ok(address) = email.parse::<Address>() else {
        return email.to_owned();
    };
    match display_name(&format!("{first_name} {last_name}")) {
        Ok(name) => format!("{name} <{address}>"),
        Err(_) => email.to_owned(),
    }
}

fn display_name(name: &str) -> Result<String, fmt::Error> {
    if name.chars().all(|c| c == ' ' || c.is_ascii_graphic()) {
        let mut quoted = String::with_capacity(name.len() + 2);
        quoted.push('"');
        for c in name.chars() {
            if c == '"' || c == '\\' {
                quoted.push('\\');
            }
            quoted.push(c);
        }
        quoted.push('"');
        return Ok(quoted);
    }

    let mut encoded = String::new();
    rfc2047::encode(name, &mut EmailWriter::new(&mut encoded, 0, 0, false))?;
    // Long names are folded across lines; the value is used unfolded.
    Ok(encoded.replace("\r\n", ""))
}
