// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end behavior of `ZoomView` over `peniko::ImageData` bitmaps.

use kurbo::{Affine, Point, Vec2};
use peniko::{Blob, ImageAlphaType, ImageData, ImageFormat, ImageQuality, ImageSampler};
use understory_zoom_view::{
    RenderPass, RenderSurface, TaskKey, TouchEvent, TouchPhase, ViewEvent, ZoomView,
};

fn image(width: u32, height: u32) -> ImageData {
    let len = width as usize * height as usize * 4;
    ImageData {
        data: Blob::from(vec![0_u8; len]),
        format: ImageFormat::Rgba8,
        alpha_type: ImageAlphaType::Alpha,
        width,
        height,
    }
}

/// 800x800 image in a 400x800 portrait viewport.
fn portrait() -> ZoomView {
    let mut view = ZoomView::default();
    view.on_layout(400.0, 800.0);
    view.set_image(Some(image(800, 800)));
    view.drain_events().for_each(drop);
    view
}

#[derive(Default)]
struct RecordingSurface {
    accelerated: bool,
    draws: Vec<(Affine, ImageQuality)>,
}

impl RenderSurface<ImageData> for RecordingSurface {
    fn is_hardware_accelerated(&self) -> bool {
        self.accelerated
    }

    fn draw_bitmap(&mut self, bitmap: &ImageData, transform: Affine, sampler: ImageSampler) {
        assert_eq!(bitmap.width, 800);
        self.draws.push((transform, sampler.quality));
    }
}

fn p(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

#[test]
fn deferred_image_is_installed_on_first_layout() {
    let mut view = ZoomView::default();
    assert!(!view.set_image(Some(image(800, 800))));
    assert!(view.image().is_none());
    assert_eq!(view.scale(), 1.0);

    view.on_layout(400.0, 800.0);
    assert!(view.image().is_some());
    assert_eq!(view.default_zoom(), 1.0);
    assert_eq!(view.max_zoom(), 32.0);
    let events: Vec<_> = view.drain_events().collect();
    assert_eq!(events, [ViewEvent::TransformChanged(view.transform())]);
}

#[test]
fn double_tap_at_rest_animates_to_three_times_default() {
    let mut view = portrait();
    let at = p(120.0, 300.0);
    view.on_touch_event(&TouchEvent::down(at, 1000));
    view.on_touch_event(&TouchEvent::up(at, 1040));
    view.on_touch_event(&TouchEvent::down(at, 1120));
    view.on_touch_event(&TouchEvent::up(at, 1160));
    assert!(view.is_task_pending(TaskKey::ZoomAnimation));
    assert!(!view.is_task_pending(TaskKey::TapConfirm));

    let mut scales = vec![view.scale()];
    let mut now = 1120;
    while now < 1320 {
        view.tick(now);
        scales.push(view.scale());
        now += 10;
    }
    assert!(view.scale() < 3.0);
    view.tick(1320);
    scales.push(view.scale());

    assert!(scales.windows(2).all(|w| w[0] <= w[1]), "{scales:?}");
    assert_eq!(view.scale(), 3.0 * view.default_zoom());
    assert!(!view.is_task_pending(TaskKey::ZoomAnimation));

    // A second double tap goes straight back to rest.
    view.on_touch_event(&TouchEvent::down(at, 2000));
    view.on_touch_event(&TouchEvent::up(at, 2040));
    view.on_touch_event(&TouchEvent::down(at, 2120));
    assert_eq!(view.scale(), view.default_zoom());

    // No tap is ever confirmed along the way.
    view.tick(10_000);
    assert!(!view.drain_events().any(|e| e == ViewEvent::ImageTouched));
}

#[test]
fn single_tap_is_confirmed_after_the_double_tap_timeout() {
    let mut view = portrait();
    view.on_touch_event(&TouchEvent::down(p(10.0, 10.0), 0));
    view.on_touch_event(&TouchEvent::up(p(10.0, 10.0), 60));
    assert_eq!(view.next_deadline(), Some(360));

    view.tick(359);
    assert_eq!(view.drain_events().count(), 0);
    view.tick(360);
    let events: Vec<_> = view.drain_events().collect();
    assert_eq!(events, [ViewEvent::ImageTouched]);
    assert_eq!(view.scale(), 1.0);
}

#[test]
fn drag_during_pinch_does_not_pan() {
    let mut view = portrait();
    view.zoom_to(4.0);
    let before = view.transform();

    view.on_touch_event(&TouchEvent::new(
        TouchPhase::Down,
        [p(100.0, 400.0), p(300.0, 400.0)],
        0,
    ));
    // Both contacts slide 50 px right, keeping their spread.
    for (i, dx) in [10.0, 20.0, 30.0, 40.0, 50.0].into_iter().enumerate() {
        view.on_touch_event(&TouchEvent::new(
            TouchPhase::Move,
            [p(100.0 + dx, 400.0), p(300.0 + dx, 400.0)],
            16 * (i as u64 + 1),
        ));
    }

    let after = view.transform();
    assert_eq!(view.scale(), 4.0);
    assert!((after.translation() - before.translation()).hypot() < 1e-9);
}

#[test]
fn fast_release_flings_half_the_gesture_distance() {
    let mut view = portrait();
    view.zoom_to(4.0);
    view.on_touch_event(&TouchEvent::down(p(0.0, 400.0), 0));
    view.on_touch_event(&TouchEvent::moved(p(40.0, 400.0), 40));
    view.on_touch_event(&TouchEvent::moved(p(80.0, 400.0), 80));
    view.on_touch_event(&TouchEvent::up(p(120.0, 400.0), 120));

    let fling = *view.fling().unwrap();
    assert_eq!(fling.distance, Vec2::new(60.0, 0.0));
    assert_eq!(fling.duration, 300);
    assert_eq!(fling.offset_at(120), Vec2::ZERO);
    assert_eq!(fling.offset_at(420), Vec2::new(60.0, 0.0));

    let start = view.transform().translation();
    let mut now = 120;
    while let Some(deadline) = view.next_deadline() {
        now = deadline;
        view.tick(now);
    }
    assert!(now >= 420);
    let moved = view.transform().translation() - start;
    assert!((moved - Vec2::new(60.0, 0.0)).hypot() < 1e-9, "{moved:?}");
}

#[test]
fn fling_is_clamped_at_the_image_edge() {
    let mut view = portrait();
    view.zoom_to(4.0);
    view.scroll_by(Vec2::new(5000.0, 0.0), 300, 0);
    while let Some(deadline) = view.next_deadline() {
        view.tick(deadline);
    }
    // 1600 px wide on screen: the left edge stops at the viewport edge.
    let left = (view.transform() * Point::ORIGIN).x;
    assert!(left.abs() < 1e-9);
}

#[test]
fn software_repaints_collapse_into_one_deferred_repaint() {
    let mut view = portrait();
    let mut surface = RecordingSurface::default();

    assert_eq!(view.render(&mut surface, 0), Some(RenderPass::Filtered));
    assert_eq!(view.render(&mut surface, 100), Some(RenderPass::Draft));
    assert_eq!(view.render(&mut surface, 200), Some(RenderPass::Draft));
    assert_eq!(view.next_deadline(), Some(450));

    view.tick(10_000);
    let repaints = view
        .drain_events()
        .filter(|e| *e == ViewEvent::RepaintRequested)
        .count();
    assert_eq!(repaints, 1);

    let qualities: Vec<_> = surface.draws.iter().map(|(_, q)| *q).collect();
    assert_eq!(
        qualities,
        [ImageQuality::High, ImageQuality::Low, ImageQuality::Low]
    );
    assert!(surface.draws.iter().all(|(t, _)| *t == view.transform()));
}

#[test]
fn hardware_surface_draws_every_frame_unfiltered() {
    let mut view = portrait();
    let mut surface = RecordingSurface {
        accelerated: true,
        ..RecordingSurface::default()
    };
    for now in [0, 16, 32] {
        assert_eq!(view.render(&mut surface, now), Some(RenderPass::Accelerated));
    }
    assert_eq!(view.next_deadline(), None);
    assert_eq!(surface.draws.len(), 3);
}

#[test]
fn truncated_pixels_are_not_drawn() {
    let mut view = ZoomView::default();
    view.on_layout(400.0, 800.0);
    let mut short = image(800, 800);
    short.data = Blob::from(vec![0_u8; 16]);
    view.set_image(Some(short));

    let mut surface = RecordingSurface::default();
    assert_eq!(view.render(&mut surface, 0), None);
    assert!(surface.draws.is_empty());
}

#[test]
fn clear_returns_the_image_and_stops_touch_handling() {
    let mut view = portrait();
    view.zoom_to(2.0);
    let released = view.clear();
    assert_eq!(released.map(|i| i.width), Some(800));
    assert_eq!(view.transform(), Affine::IDENTITY);
    assert!(!view.on_touch_event(&TouchEvent::down(p(1.0, 1.0), 0)));
}
