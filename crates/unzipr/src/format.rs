//! Archive format detection by content

use std::io::{Read, Seek, SeekFrom};

/// Local file header signature, found at the start of every non-empty zip
const ZIP_LOCAL_FILE: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];
/// End of central directory signature, an empty zip starts with it
const ZIP_END_OF_CENTRAL_DIRECTORY: [u8; 4] = [0x50, 0x4B, 0x05, 0x06];
/// Data descriptor signature used by spanned archives
const ZIP_SPANNED: [u8; 4] = [0x50, 0x4B, 0x07, 0x08];

/// Fixed size of the end of central directory record
const END_OF_CENTRAL_DIRECTORY_LEN: u64 = 22;
/// The record may be followed by a comment of at most this many bytes
const MAX_COMMENT_LEN: u64 = u16::MAX as u64;

/// Supported archive formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchiveFormat {
    /// ZIP archive
    Zip,
}

impl ArchiveFormat {
    /// Detect archive format from the leading bytes of a file
    pub fn detect_from_bytes(data: &[u8]) -> Option<Self> {
        match data.get(..4)? {
            magic
                if magic == ZIP_LOCAL_FILE
                    || magic == ZIP_END_OF_CENTRAL_DIRECTORY
                    || magic == ZIP_SPANNED =>
            {
                Some(Self::Zip)
            }
            _ => None,
        }
    }

    /// Detect archive format from a reader, leaving it rewound to the start.
    ///
    /// The leading signature is checked first. Zip archives may also carry
    /// arbitrary data in front of them (self-extracting archives, shell
    /// launchers), so when the start does not match, the tail of the input is
    /// searched for the end of central directory record.
    pub fn detect_from_reader<R: Read + Seek>(reader: &mut R) -> std::io::Result<Option<Self>> {
        let mut header = Vec::with_capacity(4);
        reader.by_ref().take(4).read_to_end(&mut header)?;
        let mut format = Self::detect_from_bytes(&header);

        if format.is_none() {
            let len = reader.seek(SeekFrom::End(0))?;
            if len >= END_OF_CENTRAL_DIRECTORY_LEN {
                let tail_len = len.min(END_OF_CENTRAL_DIRECTORY_LEN + MAX_COMMENT_LEN);
                reader.seek(SeekFrom::Start(len - tail_len))?;
                let mut tail = Vec::with_capacity(tail_len as usize);
                reader.by_ref().take(tail_len).read_to_end(&mut tail)?;
                if tail
                    .windows(4)
                    .any(|window| window == ZIP_END_OF_CENTRAL_DIRECTORY)
                {
                    format = Some(Self::Zip);
                }
            }
        }

        reader.rewind()?;
        Ok(format)
    }
}
