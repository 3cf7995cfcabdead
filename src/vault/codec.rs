//! Canonical byte encoding of an entry collection.
//!
//! This is the plaintext that gets encrypted.  Layout (all integers are
//! little-endian u32):
//!
//! ```text
//! [count]
//! count x ( [len][site] [len][username] [len][secret] [len][notes]
//!           [tag_count] tag_count x ([len][tag]) )
//! ```
//!
//! The encoding is self-describing, so `decode` validates structure
//! without outside metadata and either returns every entry or fails.

use zeroize::Zeroizing;

use super::entry::{PasswordEntry, TagSet};
use crate::errors::{Result, VaultError};

/// Encode entries into the canonical byte form.
///
/// The returned buffer holds secrets in clear and is zeroed on drop.
pub fn encode(entries: &[PasswordEntry]) -> Result<Zeroizing<Vec<u8>>> {
    let mut buf = Zeroizing::new(Vec::new());
    put_len(&mut buf, entries.len())?;

    for entry in entries {
        put_str(&mut buf, entry.site())?;
        put_str(&mut buf, entry.username())?;
        put_str(&mut buf, entry.secret())?;
        put_str(&mut buf, entry.notes())?;
        put_len(&mut buf, entry.tags().len())?;
        for tag in entry.tags().iter() {
            put_str(&mut buf, tag)?;
        }
    }

    Ok(buf)
}

/// Decode bytes produced by `encode`.
pub fn decode(bytes: &[u8]) -> Result<Vec<PasswordEntry>> {
    let mut reader = Reader::new(bytes);
    let count = reader.len("entry count")?;

    // Every entry needs at least five length prefixes.
    if count > reader.remaining() / 20 {
        return Err(VaultError::CorruptData(format!(
            "entry count {count} exceeds buffer size"
        )));
    }

    let mut entries = Vec::with_capacity(count);
    for index in 0..count {
        let site = reader.string("site")?;
        let username = reader.string("username")?;
        let secret = Zeroizing::new(reader.string("secret")?);
        let notes = Zeroizing::new(reader.string("notes")?);

        let tag_count = reader.len("tag count")?;
        let mut tags = TagSet::new();
        for _ in 0..tag_count {
            let tag = reader.string("tag")?;
            if !tags.insert(tag) {
                return Err(VaultError::CorruptData(format!(
                    "entry {index}: duplicate tag in tag set"
                )));
            }
        }

        let entry = PasswordEntry::new(site, username, secret.as_str(), notes.as_str(), tags.iter())
            .map_err(|e| VaultError::CorruptData(format!("entry {index}: {e}")))?;
        entries.push(entry);
    }

    if reader.remaining() != 0 {
        return Err(VaultError::CorruptData(format!(
            "entry count mismatch: {} trailing bytes after {count} entries",
            reader.remaining()
        )));
    }

    Ok(entries)
}

fn put_len(buf: &mut Vec<u8>, len: usize) -> Result<()> {
    let len = u32::try_from(len).map_err(|_| {
        VaultError::Serialization(format!("length {len} exceeds u32::MAX"))
    })?;
    buf.extend_from_slice(&len.to_le_bytes());
    Ok(())
}

fn put_str(buf: &mut Vec<u8>, s: &str) -> Result<()> {
    put_len(buf, s.len())?;
    buf.extend_from_slice(s.as_bytes());
    Ok(())
}

/// Bounds-checked cursor over the encoded buffer.
struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn take(&mut self, n: usize, what: &str) -> Result<&'a [u8]> {
        if n > self.remaining() {
            return Err(VaultError::CorruptData(format!(
                "{what}: needs {n} bytes, {} left",
                self.remaining()
            )));
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn len(&mut self, what: &str) -> Result<usize> {
        let raw = self.take(4, what)?;
        let mut word = [0u8; 4];
        word.copy_from_slice(raw);
        usize::try_from(u32::from_le_bytes(word))
            .map_err(|_| VaultError::CorruptData(format!("{what}: length exceeds address space")))
    }

    fn string(&mut self, what: &str) -> Result<String> {
        let len = self.len(what)?;
        let raw = self.take(len, what)?;
        String::from_utf8(raw.to_vec())
            .map_err(|_| VaultError::CorruptData(format!("{what}: invalid UTF-8")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries() -> Vec<PasswordEntry> {
        vec![
            PasswordEntry::new(
                "example.com",
                "user1",
                "password123",
                "Work account",
                ["work", "important"],
            )
            .unwrap(),
            PasswordEntry::new("social.com", "user2", "pass456", "", ["social"]).unwrap(),
            PasswordEntry::new("ünïcode.example", "名前", "🔑 key", "multi\nline", Vec::<String>::new())
                .unwrap(),
        ]
    }

    #[test]
    fn roundtrip_preserves_entries_and_order() {
        let original = entries();
        let bytes = encode(&original).unwrap();
        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded, original);
        assert_eq!(decoded[0].site(), "example.com");
        assert_eq!(
            decoded[0].tags().iter().collect::<Vec<_>>(),
            ["work", "important"]
        );
    }

    #[test]
    fn empty_collection_is_four_zero_bytes() {
        let bytes = encode(&[]).unwrap();
        assert_eq!(bytes.as_slice(), &[0, 0, 0, 0]);
        assert!(decode(&bytes).unwrap().is_empty());
    }

    #[test]
    fn every_truncation_is_rejected() {
        let bytes = encode(&entries()).unwrap();
        for cut in 0..bytes.len() {
            assert!(
                matches!(decode(&bytes[..cut]), Err(VaultError::CorruptData(_))),
                "truncation at {cut} was accepted"
            );
        }
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        let mut bytes = encode(&entries()).unwrap().to_vec();
        bytes.push(0);
        assert!(matches!(decode(&bytes), Err(VaultError::CorruptData(_))));
    }

    #[test]
    fn inflated_count_is_rejected() {
        let mut bytes = encode(&entries()).unwrap().to_vec();
        bytes[0] = 4;
        assert!(matches!(decode(&bytes), Err(VaultError::CorruptData(_))));
    }

    #[test]
    fn field_length_past_end_is_rejected() {
        // One entry whose site claims 1000 bytes.
        let mut bytes = 1u32.to_le_bytes().to_vec();
        bytes.extend_from_slice(&1000u32.to_le_bytes());
        bytes.extend_from_slice(&[b'a'; 32]);
        assert!(matches!(decode(&bytes), Err(VaultError::CorruptData(_))));
    }

    #[test]
    fn duplicate_tag_is_rejected() {
        let mut bytes = 1u32.to_le_bytes().to_vec();
        for field in ["site", "user", "pw", ""] {
            put_str(&mut bytes, field).unwrap();
        }
        put_len(&mut bytes, 2).unwrap();
        put_str(&mut bytes, "dup").unwrap();
        put_str(&mut bytes, "dup").unwrap();
        assert!(matches!(decode(&bytes), Err(VaultError::CorruptData(_))));
    }

    #[test]
    fn empty_tag_is_rejected() {
        let mut bytes = 1u32.to_le_bytes().to_vec();
        for field in ["site", "user", "pw", ""] {
            put_str(&mut bytes, field).unwrap();
        }
        put_len(&mut bytes, 1).unwrap();
        put_str(&mut bytes, "").unwrap();

        assert!(matches!(decode(&bytes), Err(VaultError::CorruptData(_))));
    }

    #[test]
    fn invalid_entry_is_rejected() {
        let mut bytes = 1u32.to_le_bytes().to_vec();
        for field in ["", "user", "pw", ""] {
            put_str(&mut bytes, field).unwrap();
        }
        put_len(&mut bytes, 0).unwrap();
        assert!(matches!(decode(&bytes), Err(VaultError::CorruptData(_))));
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        let mut bytes = 1u32.to_le_bytes().to_vec();
        put_len(&mut bytes, 2).unwrap();
        bytes.extend_from_slice(&[0xff, 0xfe]);
        for field in ["user", "pw", ""] {
            put_str(&mut bytes, field).unwrap();
        }
        put_len(&mut bytes, 0).unwrap();
        assert!(matches!(decode(&bytes), Err(VaultError::CorruptData(_))));
    }
}
