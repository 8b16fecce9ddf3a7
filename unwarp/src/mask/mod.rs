//! Region-of-interest masks.
//!
//! A mask is either traced by the user as a closed polygon or supplied as a
//! fixed raster. Pixels outside the mask are excluded from similarity
//! computation downstream. A mask nobody has touched includes every pixel.

mod raster;
mod table;


use std::path::Path;

use glam::IVec2;
use image::{GrayImage, Luma};
use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::error::{Error, Result};
use crate::geometry::ImageSize;

pub use raster::fill_polygon;
pub use table::MaskTable;

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FillMode {
    /// Pixels inside the polygon are included.
    Normal,
    /// Pixels inside the polygon are excluded.
    Inverted,
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum MaskSource {
    Traced,
    /// Loaded from a file or a secondary slice; cannot be edited.
    Raster,
}

/// Inclusive bounding box of the traced vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub min: IVec2,
    pub max: IVec2,
}

#[derive(Debug, Clone)]
pub struct MaskRegion {
    vertices: Vec<IVec2>,
    closed: bool,
    fill_mode: Option<FillMode>,
    source: MaskSource,
    table: MaskTable,
}

impl MaskRegion {
    /// An empty, editable mask including every pixel.
    pub fn new(size: ImageSize) -> Self {
        Self {
            vertices: Vec::new(),
            closed: false,
            fill_mode: None,
            source: MaskSource::Traced,
            table: MaskTable::new_filled(size, true),
        }
    }

    /// A fixed mask from a row-major raster; non-zero samples are included.
    pub fn from_raster<T>(size: ImageSize, raster: &[T]) -> Result<Self>
    where
        T: Copy + Default + PartialEq,
    {
        let table = MaskTable::from_raster(size, raster).ok_or(Error::RasterLength {
            len: raster.len(),
            size,
        })?;
        Ok(Self::fixed(table))
    }

    /// A fixed mask decoded from an image file; non-zero pixels are
    /// included. The file must match `expected` exactly.
    pub fn from_image_file(path: &Path, expected: ImageSize) -> Result<Self> {
        let decoded = image::open(path).map_err(|source| Error::MaskDecode {
            path: path.to_path_buf(),
            source,
        })?;
        let luma = decoded.to_luma16();
        let actual = ImageSize::new(luma.width(), luma.height());
        if actual != expected {
            return Err(Error::MaskSizeMismatch { expected, actual });
        }
        let raw = luma.as_raw().as_slice();
        let table = MaskTable::from_raster(actual, raw).ok_or(Error::RasterLength {
            len: raw.len(),
            size: actual,
        })?;
        let mask = Self::fixed(table);
        tracing::info!(
            "Loaded {actual} mask from {}, {} pixels included",
            path.display(),
            mask.included_count()
        );
        Ok(mask)
    }

    fn fixed(table: MaskTable) -> Self {
        Self {
            vertices: Vec::new(),
            closed: true,
            fill_mode: None,
            source: MaskSource::Raster,
            table,
        }
    }

    #[inline]
    pub fn size(&self) -> ImageSize {
        self.table.size()
    }

    #[inline]
    pub fn source(&self) -> MaskSource {
        self.source
    }

    #[inline]
    pub fn is_editable(&self) -> bool {
        self.source == MaskSource::Traced
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    #[inline]
    pub fn fill_mode(&self) -> Option<FillMode> {
        self.fill_mode
    }

    /// Traced vertices; a closed polygon repeats the first vertex last.
    pub fn vertices(&self) -> &[IVec2] {
        &self.vertices
    }

    pub fn table(&self) -> &MaskTable {
        &self.table
    }

    /// Appends a vertex. Refused once closed or for raster masks.
    pub fn add_vertex(&mut self, p: IVec2) -> bool {
        if self.closed || !self.is_editable() {
            return false;
        }
        self.vertices.push(p);
        true
    }

    /// Closes the polygon and rasterizes it.
    ///
    /// Refused for raster masks, already closed masks and masks without
    /// vertices.
    pub fn close(&mut self, mode: FillMode) -> bool {
        if self.closed || !self.is_editable() {
            return false;
        }
        let Some(&first) = self.vertices.first() else {
            return false;
        };
        self.vertices.push(first);
        self.closed = true;
        self.fill_mode = Some(mode);

        self.table = fill_polygon(&self.vertices, self.size());
        if mode == FillMode::Inverted {
            self.table.invert();
        }

        tracing::info!(
            "Mask closed with {} vertices ({mode}), {} of {} pixels included",
            self.vertices.len() - 1,
            self.included_count(),
            self.table.len()
        );
        true
    }

    /// Back to the untouched state: no vertices, every pixel included.
    /// The source is kept, so a cleared raster mask stays fixed.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.closed = false;
        self.fill_mode = None;
        self.table.fill(true);
    }

    /// Membership of pixel `(x, y)`; false outside the image.
    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.table.get_xy(x as i64, y as i64)
    }

    /// Membership of the pixel nearest to a sub-pixel position.
    #[inline]
    pub fn value_at(&self, x: f64, y: f64) -> bool {
        self.table.get_xy(x.round() as i64, y.round() as i64)
    }

    pub fn included_count(&self) -> usize {
        self.table.count_ones()
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let first = *self.vertices.first()?;
        let (min, max) = self
            .vertices
            .iter()
            .fold((first, first), |(min, max), &v| (min.min(v), max.max(v)));
        Some(BoundingBox { min, max })
    }

    /// Membership as an 8-bit image, 255 for included pixels.
    pub fn to_gray_image(&self) -> GrayImage {
        let size = self.size();
        GrayImage::from_fn(size.width, size.height, |x, y| {
            Luma([if self.table.get_xy(x as i64, y as i64) {
                255
            } else {
                0
            }])
        })
    }

    pub fn write_image(&self, path: &Path) -> Result<()> {
        self.to_gray_image()
            .save(path)
            .map_err(|source| Error::MaskEncode {
                path: path.to_path_buf(),
                source,
            })?;
        tracing::info!("Wrote mask to {}", path.display());
        Ok(())
    }
}
