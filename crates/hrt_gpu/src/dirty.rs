//! Byte ranges of a GPU buffer that need re-uploading.

/// A contiguous byte span inside a record buffer, suitable for a partial
/// `write_buffer` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirtyRange {
    pub offset_bytes: usize,
    pub len_bytes: usize,
}

impl DirtyRange {
    pub fn end_bytes(&self) -> usize {
        self.offset_bytes + self.len_bytes
    }

    /// Covers `count` records of `record_size` bytes starting at record 0.
    pub fn whole(count: usize, record_size: usize) -> Option<Self> {
        (count > 0).then_some(Self {
            offset_bytes: 0,
            len_bytes: count * record_size,
        })
    }
}

/// Merge record indices into the minimal set of byte ranges.
///
/// Indices may arrive unsorted or repeated; adjacent records collapse into
/// one range.
pub fn coalesce(indices: &[usize], record_size: usize) -> Vec<DirtyRange> {
    let mut sorted = indices.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let mut ranges: Vec<DirtyRange> = Vec::new();
    for index in sorted {
        let offset = index * record_size;
        match ranges.last_mut() {
            Some(last) if last.end_bytes() == offset => last.len_bytes += record_size,
            _ => ranges.push(DirtyRange {
                offset_bytes: offset,
                len_bytes: record_size,
            }),
        }
    }
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coalesce_adjacent() {
        let ranges = coalesce(&[5, 1, 2, 3, 2, 9, 10], 16);
        assert_eq!(
            ranges,
            vec![
                DirtyRange { offset_bytes: 16, len_bytes: 48 },
                DirtyRange { offset_bytes: 80, len_bytes: 16 },
                DirtyRange { offset_bytes: 144, len_bytes: 32 },
            ]
        );
    }

    #[test]
    fn test_coalesce_empty() {
        assert!(coalesce(&[], 48).is_empty());
    }

    #[test]
    fn test_whole() {
        assert_eq!(DirtyRange::whole(0, 48), None);
        assert_eq!(
            DirtyRange::whole(3, 48),
            Some(DirtyRange { offset_bytes: 0, len_bytes: 144 })
        );
    }
}
