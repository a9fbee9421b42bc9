// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Size;

/// A decoded, immutable bitmap the engine can fit into a viewport.
///
/// The engine only reads dimensions; pixel data stays with the implementor.
pub trait Bitmap {
    /// Width in pixels.
    fn width(&self) -> u32;

    /// Height in pixels.
    fn height(&self) -> u32;

    /// Returns `false` once the pixels can no longer be drawn.
    fn is_valid(&self) -> bool {
        true
    }

    /// Pixel size as a [`Size`].
    fn size(&self) -> Size {
        Size::new(f64::from(self.width()), f64::from(self.height()))
    }
}

impl<B: Bitmap + ?Sized> Bitmap for &B {
    fn width(&self) -> u32 {
        (**self).width()
    }

    fn height(&self) -> u32 {
        (**self).height()
    }

    fn is_valid(&self) -> bool {
        (**self).is_valid()
    }
}

#[cfg(feature = "peniko")]
impl Bitmap for peniko::ImageData {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    /// Valid when non-empty and the blob holds every pixel.
    fn is_valid(&self) -> bool {
        // Every peniko image format is 32 bits per pixel.
        const BYTES_PER_PIXEL: usize = 4;
        let (Ok(w), Ok(h)) = (usize::try_from(self.width), usize::try_from(self.height)) else {
            return false;
        };
        w > 0
            && h > 0
            && w.checked_mul(h)
                .and_then(|px| px.checked_mul(BYTES_PER_PIXEL))
                .is_some_and(|needed| self.data.data().len() >= needed)
    }
}
