//! JSON string escaping per ECMA-262 sec 24.5.2.2.
//!
//! The hot loop copies clean runs in bulk and only re-negotiates output
//! space when a byte actually needs escaping. Bytes at or above 0x20 other
//! than `"` and `\` pass through verbatim, including forward slash, DEL and
//! UTF-8 continuation bytes; payloads are not validated as UTF-8.

use crate::buffer::OutputBuffer;
use crate::error::Result;
use crate::fmt::HEX_DIGITS;

const NO_ESCAPE: u8 = 0;
const UNICODE_ESCAPE: u8 = 1;

// Per-byte classification: 0 = copy verbatim, 1 = \u00XY, otherwise the
// character following the backslash.
static ESCAPE: [u8; 256] = {
    let mut table = [NO_ESCAPE; 256];
    let mut i = 0;
    while i < 0x20 {
        table[i] = UNICODE_ESCAPE;
        i += 1;
    }
    table[0x08] = b'b';
    table[0x09] = b't';
    table[0x0A] = b'n';
    table[0x0C] = b'f';
    table[0x0D] = b'r';
    table[0x22] = b'"';
    table[0x5C] = b'\\';
    table
};

/// Copies `bytes` into `out`, escaping as it goes.
///
/// Reserves `bytes.len()` up front so the all-clean case checks space only
/// once; each escape re-reserves enough for the escape sequence plus the
/// remaining input.
pub(crate) fn write_escaped(out: &mut OutputBuffer, bytes: &[u8]) -> Result<()> {
    out.ensure_space(bytes.len())?;
    let mut run_start = 0;
    for (i, &byte) in bytes.iter().enumerate() {
        let class = ESCAPE[byte as usize];
        if class == NO_ESCAPE {
            continue;
        }

        out.extend(&bytes[run_start..i]);
        run_start = i + 1;
        let rest = bytes.len() - run_start;

        if class == UNICODE_ESCAPE {
            out.ensure_space(rest + 6)?;
            out.extend(b"\\u00");
            out.push(if byte & 0xF0 != 0 { b'1' } else { b'0' });
            out.push(HEX_DIGITS[(byte & 0x0F) as usize]);
        } else {
            out.ensure_space(rest + 2)?;
            out.push(b'\\');
            out.push(class);
        }
    }
    out.extend(&bytes[run_start..]);
    Ok(())
}

/// `"` + escaped bytes + `"`.
pub(crate) fn write_escaped_quoted(out: &mut OutputBuffer, bytes: &[u8]) -> Result<()> {
    out.ensure_space(1)?;
    out.push(b'"');
    write_escaped(out, bytes)?;
    out.ensure_space(1)?;
    out.push(b'"');
    Ok(())
}
