//! Fixed tables and the specialized value formatters.
//!
//! Integers are written with a two-digit lookup table, ObjectIds with a
//! hex-nibble table, datetimes with digit pairs over a civil-time
//! decomposition, and doubles with the shortest decimal that round-trips
//! under ECMAScript `Number::toString` semantics.

use chrono::{DateTime, Datelike, Timelike, Utc};

use crate::buffer::OutputBuffer;
use crate::error::{Error, Result};

// Adapted from https://github.com/fmtlib/fmt/blob/master/include/fmt/format.h,
// MIT license
pub(crate) const DIGIT_PAIRS: &[u8; 200] = b"0001020304050607080910111213141516171819\
      2021222324252627282930313233343536373839\
      4041424344454647484950515253545556575859\
      6061626364656667686970717273747576777879\
      8081828384858687888990919293949596979899";

pub(crate) const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Number of decimal digits in `v`. Array indexes are small, so the
/// comparison ladder is checked in ascending order.
#[inline]
pub(crate) fn decimal_width(v: u32) -> usize {
    if v < 10 {
        1
    } else if v < 100 {
        2
    } else if v < 1_000 {
        3
    } else if v < 10_000 {
        4
    } else if v < 100_000 {
        5
    } else if v < 1_000_000 {
        6
    } else if v < 10_000_000 {
        7
    } else if v < 100_000_000 {
        8
    } else if v < 1_000_000_000 {
        9
    } else {
        10
    }
}

/// Scratch size for [`format_i64`]: 19 digits plus sign.
pub(crate) const INT_SCRATCH: usize = 20;

/// Formats `val` right-aligned into `buf`, returning the index of the first
/// byte. The minimal decimal representation is `&buf[start..]`.
pub(crate) fn format_i64(buf: &mut [u8; INT_SCRATCH], val: i64) -> usize {
    let mut pos = buf.len();
    let mut v = val.unsigned_abs();

    while v >= 100 {
        let idx = ((v % 100) * 2) as usize;
        v /= 100;
        pos -= 2;
        buf[pos..pos + 2].copy_from_slice(&DIGIT_PAIRS[idx..idx + 2]);
    }

    if v < 10 {
        pos -= 1;
        buf[pos] = b'0' + v as u8;
    } else {
        let idx = (v * 2) as usize;
        pos -= 2;
        buf[pos..pos + 2].copy_from_slice(&DIGIT_PAIRS[idx..idx + 2]);
    }

    if val < 0 {
        pos -= 1;
        buf[pos] = b'-';
    }

    pos
}

pub(crate) fn write_i32(out: &mut OutputBuffer, val: i32) -> Result<()> {
    write_i64(out, i64::from(val))
}

pub(crate) fn write_i64(out: &mut OutputBuffer, val: i64) -> Result<()> {
    let mut scratch = [0u8; INT_SCRATCH];
    let start = format_i64(&mut scratch, val);
    out.ensure_space(INT_SCRATCH - start)?;
    out.extend(&scratch[start..]);
    Ok(())
}

/// Writes the shortest round-trip decimal for `val`, or `null` when the
/// value is not finite (JSON has no rendering for NaN or infinities).
pub(crate) fn write_f64(out: &mut OutputBuffer, val: f64) -> Result<()> {
    if val.is_finite() {
        let mut buffer = ryu_js::Buffer::new();
        let text = buffer.format_finite(val);
        out.ensure_space(text.len())?;
        out.extend(text.as_bytes());
    } else {
        out.ensure_space(4)?;
        out.extend(b"null");
    }
    Ok(())
}

/// Writes `"` + 24 lowercase hex characters + `"` for a 12-byte id.
pub(crate) fn write_object_id(out: &mut OutputBuffer, id: &[u8; 12]) -> Result<()> {
    out.ensure_space(26)?;
    out.push(b'"');
    for &byte in id {
        out.push(HEX_DIGITS[(byte >> 4) as usize]);
        out.push(HEX_DIGITS[(byte & 0x0F) as usize]);
    }
    out.push(b'"');
    Ok(())
}

#[inline]
fn push_pair(out: &mut OutputBuffer, v: usize) {
    debug_assert!(v < 100);
    out.extend(&DIGIT_PAIRS[v * 2..v * 2 + 2]);
}

/// Writes a BSON datetime (signed milliseconds since the Unix epoch) as a
/// quoted ISO-8601 UTC string with millisecond precision, e.g.
/// `"2019-12-02T08:47:35.028Z"`.
///
/// Years 0 through 9999 are zero-padded to four digits; years outside that
/// range take their natural signed decimal width.
pub(crate) fn write_datetime(out: &mut OutputBuffer, millis: i64) -> Result<()> {
    let dt: DateTime<Utc> = DateTime::from_timestamp_millis(millis)
        .ok_or(Error::DateOutOfRange { millis })?;

    // Quotes + up to 7 year chars + "-MM-DDTHH:MM:SS.mmmZ".
    out.ensure_space(32)?;
    out.push(b'"');

    let year = dt.year();
    if (0..=9999).contains(&year) {
        let y = year as usize;
        push_pair(out, y / 100);
        push_pair(out, y % 100);
    } else {
        let mut scratch = [0u8; INT_SCRATCH];
        let start = format_i64(&mut scratch, i64::from(year));
        out.extend(&scratch[start..]);
    }

    out.push(b'-');
    push_pair(out, dt.month() as usize);
    out.push(b'-');
    push_pair(out, dt.day() as usize);
    out.push(b'T');
    push_pair(out, dt.hour() as usize);
    out.push(b':');
    push_pair(out, dt.minute() as usize);
    out.push(b':');
    push_pair(out, dt.second() as usize);
    out.push(b'.');

    let ms = dt.timestamp_subsec_millis() as usize;
    out.push(b'0' + (ms / 100) as u8);
    push_pair(out, ms % 100);

    out.push(b'Z');
    out.push(b'"');
    Ok(())
}
