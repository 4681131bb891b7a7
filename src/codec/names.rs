//! Fixed-width name codec.
//!
//! On disk, name collections are flat byte buffers of `count` rows, each
//! exactly `stride` bytes, right-padded with spaces. In memory they are
//! `Vec<String>`. Decoding strips trailing padding (spaces and NULs) and
//! insists on ASCII; encoding refuses names longer than the stride, since
//! silent truncation would lose data without any signal to the caller.

use crate::error::UgridError;

/// Byte used to right-pad encoded names.
pub const PAD_BYTE: u8 = b' ';

/// Splits a flat byte buffer into `count` strings of `stride` bytes each.
///
/// Trailing spaces and NUL bytes are stripped per row. Fails with
/// [`UgridError::Decoding`] when the buffer length disagrees with
/// `count * stride` or a row holds non-ASCII bytes.
pub fn decode_fixed_strings(
    buffer: &[u8],
    count: usize,
    stride: usize,
) -> Result<Vec<String>, UgridError> {
    if stride == 0 {
        return Err(UgridError::Decoding("name stride must be positive".into()));
    }
    let expected = count * stride;
    if buffer.len() != expected {
        return Err(UgridError::Decoding(format!(
            "buffer holds {} bytes, expected {count} names of {stride} bytes",
            buffer.len()
        )));
    }
    let mut names = Vec::with_capacity(count);
    for (row, chunk) in buffer.chunks_exact(stride).enumerate() {
        let end = chunk
            .iter()
            .rposition(|&b| b != PAD_BYTE && b != 0)
            .map_or(0, |i| i + 1);
        let trimmed = &chunk[..end];
        if !trimmed.is_ascii() {
            return Err(UgridError::Decoding(format!(
                "name {row} holds non-ASCII bytes"
            )));
        }
        // Safe to decode: pure ASCII is valid UTF-8.
        names.push(String::from_utf8_lossy(trimmed).into_owned());
    }
    Ok(names)
}

/// Right-pads every string to `stride` bytes and concatenates them.
///
/// Fails with [`UgridError::NameTooLong`] when any string exceeds the
/// stride, and with [`UgridError::Decoding`] on non-ASCII input.
pub fn encode_fixed_strings(strings: &[String], stride: usize) -> Result<Vec<u8>, UgridError> {
    let mut buffer = Vec::with_capacity(strings.len() * stride);
    for s in strings {
        if !s.is_ascii() {
            return Err(UgridError::Decoding(format!(
                "name `{s}` holds non-ASCII characters"
            )));
        }
        if s.len() > stride {
            return Err(UgridError::NameTooLong {
                name: s.clone(),
                len: s.len(),
                stride,
            });
        }
        buffer.extend_from_slice(s.as_bytes());
        buffer.resize(buffer.len() + (stride - s.len()), PAD_BYTE);
    }
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_preserves_names() {
        let names = vec!["node1".to_string(), "node2".to_string()];
        let buf = encode_fixed_strings(&names, 40).unwrap();
        assert_eq!(buf.len(), 80);
        assert_eq!(decode_fixed_strings(&buf, 2, 40).unwrap(), names);
    }

    #[test]
    fn encode_pads_with_spaces() {
        let buf = encode_fixed_strings(&["ab".to_string()], 4).unwrap();
        assert_eq!(buf, b"ab  ");
    }

    #[test]
    fn decode_strips_nul_and_space_padding() {
        let decoded = decode_fixed_strings(b"ab \0cd\0 ", 2, 4).unwrap();
        assert_eq!(decoded, vec!["ab".to_string(), "cd".to_string()]);
    }

    #[test]
    fn interior_spaces_survive() {
        let names = vec!["branch one".to_string()];
        let buf = encode_fixed_strings(&names, 16).unwrap();
        assert_eq!(decode_fixed_strings(&buf, 1, 16).unwrap(), names);
    }

    #[test]
    fn overlong_name_is_refused_not_truncated() {
        let long = "x".repeat(41);
        let err = encode_fixed_strings(&[long], 40).unwrap_err();
        assert!(matches!(err, UgridError::NameTooLong { len: 41, .. }));
    }

    #[test]
    fn exact_width_name_fits() {
        let exact = "y".repeat(40);
        let buf = encode_fixed_strings(&[exact.clone()], 40).unwrap();
        assert_eq!(decode_fixed_strings(&buf, 1, 40).unwrap(), vec![exact]);
    }

    #[test]
    fn wrong_buffer_length_is_a_decoding_error() {
        assert!(matches!(
            decode_fixed_strings(b"abc", 2, 4),
            Err(UgridError::Decoding(_))
        ));
    }

    #[test]
    fn zero_stride_is_a_decoding_error() {
        assert!(matches!(
            decode_fixed_strings(b"", 0, 0),
            Err(UgridError::Decoding(_))
        ));
    }

    #[test]
    fn non_ascii_bytes_are_refused() {
        let buf = [b'a', 0xC3, 0xA9, b' '];
        assert!(matches!(
            decode_fixed_strings(&buf, 1, 4),
            Err(UgridError::Decoding(_))
        ));
        assert!(matches!(
            encode_fixed_strings(&["café".to_string()], 8),
            Err(UgridError::Decoding(_))
        ));
    }

    #[test]
    fn empty_collection_encodes_to_empty_buffer() {
        let buf = encode_fixed_strings(&[], 40).unwrap();
        assert!(buf.is_empty());
        assert!(decode_fixed_strings(&buf, 0, 40).unwrap().is_empty());
    }
}
