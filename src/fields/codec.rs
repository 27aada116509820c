//! Order-preserving term encodings
//!
//! Numeric values index under sortable byte encodings: the unsigned
//! big-endian form compares in the same order as the original value. Floats
//! go through a sign-magnitude bit transform first so negative values order
//! below positives. `decode_term` is the best-effort inverse used for term
//! enumeration; it returns `None` rather than failing.

use crate::schema::{FieldScalar, ValueKind};

/// Encode a typed scalar into its sortable index-term bytes
pub fn encode_term(value: &FieldScalar) -> Vec<u8> {
    match value {
        FieldScalar::Text(s) => s.as_bytes().to_vec(),
        FieldScalar::Integer(i) => ((*i as u32) ^ 0x8000_0000).to_be_bytes().to_vec(),
        FieldScalar::Long(l) => ((*l as u64) ^ 0x8000_0000_0000_0000)
            .to_be_bytes()
            .to_vec(),
        FieldScalar::Float(f) => ((float_to_sortable_bits(*f) as u32) ^ 0x8000_0000)
            .to_be_bytes()
            .to_vec(),
        FieldScalar::Double(d) => ((double_to_sortable_bits(*d) as u64) ^ 0x8000_0000_0000_0000)
            .to_be_bytes()
            .to_vec(),
        FieldScalar::Boolean(b) => vec![u8::from(*b)],
        FieldScalar::Geo {
            latitude,
            longitude,
        } => {
            let mut bytes = encode_term(&FieldScalar::Double(*latitude));
            bytes.extend(encode_term(&FieldScalar::Double(*longitude)));
            bytes
        }
    }
}

/// Decode previously indexed term bytes back into a typed scalar
///
/// Returns `None` for input whose length or content does not fit the kind.
pub fn decode_term(kind: ValueKind, raw: &[u8]) -> Option<FieldScalar> {
    match kind {
        ValueKind::Text => std::str::from_utf8(raw)
            .ok()
            .map(|s| FieldScalar::Text(s.to_string())),
        ValueKind::Integer => {
            let bytes: [u8; 4] = raw.try_into().ok()?;
            let bits = u32::from_be_bytes(bytes) ^ 0x8000_0000;
            Some(FieldScalar::Integer(bits as i32))
        }
        ValueKind::Long => {
            let bytes: [u8; 8] = raw.try_into().ok()?;
            let bits = u64::from_be_bytes(bytes) ^ 0x8000_0000_0000_0000;
            Some(FieldScalar::Long(bits as i64))
        }
        ValueKind::Float => {
            let bytes: [u8; 4] = raw.try_into().ok()?;
            let bits = (u32::from_be_bytes(bytes) ^ 0x8000_0000) as i32;
            Some(FieldScalar::Float(f32::from_bits(
                sortable_bits_to_float(bits),
            )))
        }
        ValueKind::Double => {
            let bytes: [u8; 8] = raw.try_into().ok()?;
            let bits = (u64::from_be_bytes(bytes) ^ 0x8000_0000_0000_0000) as i64;
            Some(FieldScalar::Double(f64::from_bits(
                sortable_bits_to_double(bits),
            )))
        }
        ValueKind::Boolean => match raw {
            [0] => Some(FieldScalar::Boolean(false)),
            [1] => Some(FieldScalar::Boolean(true)),
            _ => None,
        },
        ValueKind::GeoPoint => {
            if raw.len() != 16 {
                return None;
            }
            let latitude = decode_term(ValueKind::Double, &raw[..8])?;
            let longitude = decode_term(ValueKind::Double, &raw[8..])?;
            match (latitude, longitude) {
                (FieldScalar::Double(latitude), FieldScalar::Double(longitude)) => {
                    Some(FieldScalar::Geo {
                        latitude,
                        longitude,
                    })
                }
                _ => None,
            }
        }
    }
}

// The sign-magnitude transform is an involution: negative values get their
// magnitude bits flipped, positives pass through.
fn float_to_sortable_bits(f: f32) -> i32 {
    let bits = f.to_bits() as i32;
    bits ^ ((bits >> 31) & 0x7fff_ffff)
}

fn sortable_bits_to_float(bits: i32) -> u32 {
    (bits ^ ((bits >> 31) & 0x7fff_ffff)) as u32
}

fn double_to_sortable_bits(d: f64) -> i64 {
    let bits = d.to_bits() as i64;
    bits ^ ((bits >> 63) & 0x7fff_ffff_ffff_ffff)
}

fn sortable_bits_to_double(bits: i64) -> u64 {
    (bits ^ ((bits >> 63) & 0x7fff_ffff_ffff_ffff)) as u64
}
