//! Bit-packed per-pixel membership table.

use crate::geometry::ImageSize;

const BITS_PER_WORD: usize = 64;

/// One bit per pixel, row-major, `u64` words in LSB order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskTable {
    words: Vec<u64>,
    size: ImageSize,
    len: usize,
}

impl MaskTable {
    #[inline]
    pub fn new_filled(size: ImageSize, value: bool) -> Self {
        let len = size.pixel_count();
        let fill = if value { !0u64 } else { 0u64 };
        let mut table = Self {
            words: vec![fill; len.div_ceil(BITS_PER_WORD)],
            size,
            len,
        };
        table.clear_tail();
        table
    }

    /// Builds a table from a row-major raster; non-zero samples are included.
    pub fn from_raster<T>(size: ImageSize, raster: &[T]) -> Option<Self>
    where
        T: Copy + Default + PartialEq,
    {
        if raster.len() != size.pixel_count() {
            return None;
        }
        let zero = T::default();
        let mut table = Self::new_filled(size, false);
        for (idx, &value) in raster.iter().enumerate() {
            if value != zero {
                table.set(idx, true);
            }
        }
        Some(table)
    }

    #[inline]
    pub fn size(&self) -> ImageSize {
        self.size
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn get(&self, idx: usize) -> bool {
        debug_assert!(idx < self.len);
        (self.words[idx / BITS_PER_WORD] >> (idx % BITS_PER_WORD)) & 1 != 0
    }

    #[inline]
    pub fn set(&mut self, idx: usize, value: bool) {
        debug_assert!(idx < self.len);
        let word = &mut self.words[idx / BITS_PER_WORD];
        let bit = 1u64 << (idx % BITS_PER_WORD);
        if value {
            *word |= bit;
        } else {
            *word &= !bit;
        }
    }

    /// Membership of pixel `(x, y)`; false outside the image.
    #[inline]
    pub fn get_xy(&self, x: i64, y: i64) -> bool {
        if x < 0 || y < 0 || x >= self.size.width as i64 || y >= self.size.height as i64 {
            return false;
        }
        self.get(y as usize * self.size.width as usize + x as usize)
    }

    /// Sets pixels `[x0, x1)` of row `y`.
    pub fn set_span(&mut self, y: usize, x0: usize, x1: usize, value: bool) {
        let row = y * self.size.width as usize;
        for idx in row + x0..row + x1 {
            self.set(idx, value);
        }
    }

    #[inline]
    pub fn fill(&mut self, value: bool) {
        self.words.fill(if value { !0u64 } else { 0u64 });
        self.clear_tail();
    }

    pub fn invert(&mut self) {
        for word in &mut self.words {
            *word = !*word;
        }
        self.clear_tail();
    }

    #[inline]
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    #[inline]
    pub fn words(&self) -> &[u64] {
        &self.words
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(move |idx| self.get(idx))
    }

    // Bits past `len` stay zero so word-level equality and counts hold.
    fn clear_tail(&mut self) {
        let tail = self.len % BITS_PER_WORD;
        if tail != 0 {
            if let Some(last) = self.words.last_mut() {
                *last &= (1u64 << tail) - 1;
            }
        }
    }
}
