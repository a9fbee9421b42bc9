// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Affine;
use peniko::{ImageQuality, ImageSampler};
use understory_zoom::Bitmap;

use crate::view::{Task, TaskKey, ZoomView};

/// Where a [`ZoomView`] draws its bitmap.
pub trait RenderSurface<B> {
    /// Returns `true` if the surface composites on the GPU.
    fn is_hardware_accelerated(&self) -> bool;

    /// Draws `bitmap` through `transform` (image pixels to view pixels).
    fn draw_bitmap(&mut self, bitmap: &B, transform: Affine, sampler: ImageSampler);
}

/// Which paint [`ZoomView::render`] chose.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderPass {
    /// Hardware compositing, no extra filtering.
    Accelerated,
    /// Software, filtered.
    Filtered,
    /// Software, unfiltered; a filtered repaint is scheduled.
    Draft,
}

impl RenderPass {
    /// Sampling used for this pass.
    #[must_use]
    pub fn sampler(self) -> ImageSampler {
        let quality = match self {
            Self::Accelerated | Self::Draft => ImageQuality::Low,
            Self::Filtered => ImageQuality::High,
        };
        ImageSampler {
            quality,
            ..ImageSampler::default()
        }
    }
}

impl<B: Bitmap> ZoomView<B> {
    /// Draws the image onto `surface` at host time `now`.
    ///
    /// Does nothing without a valid image. Accelerated surfaces always get a
    /// plain draw. In software, a filtered paint happens at most once per
    /// paint delay; paints in between are drafts that (re)schedule a single
    /// [`ViewEvent::RepaintRequested`](crate::ViewEvent::RepaintRequested)
    /// one paint delay later.
    pub fn render<S>(&mut self, surface: &mut S, now: u64) -> Option<RenderPass>
    where
        S: RenderSurface<B> + ?Sized,
    {
        let image = self.engine.image().filter(|b| b.is_valid())?;
        let transform = self.engine.composed_transform();
        let delay = self.config.paint_delay;

        let pass = if surface.is_hardware_accelerated() && !self.prefers_software {
            RenderPass::Accelerated
        } else if self
            .last_filtered
            .is_none_or(|last| now.saturating_sub(last) >= delay)
        {
            self.last_filtered = Some(now);
            self.tasks.cancel(TaskKey::RepaintDebounce);
            RenderPass::Filtered
        } else {
            self.tasks
                .post(TaskKey::RepaintDebounce, now + delay, Task::Repaint);
            RenderPass::Draft
        };
        log::trace!("render {pass:?}");
        surface.draw_bitmap(image, transform, pass.sampler());
        Some(pass)
    }
}
