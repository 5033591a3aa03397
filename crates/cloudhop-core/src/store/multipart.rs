//! Part layout for multipart uploads
//!
//! S3 rejects a single PUT above 5 GiB, allows at most 10,000 parts per
//! upload, and requires every part except the last to be at least 5 MiB.

/// Files larger than this go through multipart upload.
pub const MULTIPART_THRESHOLD: u64 = 8 * 1024 * 1024;

/// Preferred part size; grown when a file would need more than [`MAX_PARTS`].
pub const DEFAULT_PART_SIZE: u64 = 8 * 1024 * 1024;

/// Smallest part S3 accepts for anything but the last part.
pub const MIN_PART_SIZE: u64 = 5 * 1024 * 1024;

/// Upper bound on parts in one upload.
pub const MAX_PARTS: u64 = 10_000;

/// One byte range of the source file, uploaded as part `number` (1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartRange {
    pub number: i32,
    pub offset: u64,
    pub length: u64,
}

pub fn needs_multipart(size: u64) -> bool {
    size > MULTIPART_THRESHOLD
}

/// Part size for a file of `size` bytes, never below [`MIN_PART_SIZE`]
pub fn part_size_for(size: u64, preferred: u64) -> u64 {
    preferred
        .max(MIN_PART_SIZE)
        .max(size.div_ceil(MAX_PARTS))
}

/// Split `size` bytes into contiguous parts covering the whole file.
///
/// An empty file yields no parts.
pub fn plan_parts(size: u64, preferred: u64) -> Vec<PartRange> {
    let part_size = part_size_for(size, preferred);

    let mut parts = Vec::new();
    let mut offset = 0;
    while offset < size {
        let length = part_size.min(size - offset);
        parts.push(PartRange {
            number: parts.len() as i32 + 1,
            offset,
            length,
        });
        offset += length;
    }
    parts
}
