// SPDX-License-Identifier: MPL-2.0
use criterion::{criterion_group, criterion_main, Criterion};
use image_rs::{DynamicImage, RgbImage};
use photo_watermark::domain::watermark::{
    Anchor, FontSize, Opacity, PlacementSpec, RotationDegrees, WatermarkStyle,
};
use photo_watermark::watermark::{self, FontLibrary, DATE_SAMPLE_TEXT};
use std::hint::black_box;

fn watermark_rendering_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("watermark_rendering");

    let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(
        1920,
        1080,
        image_rs::Rgb([120, 140, 160]),
    ));
    let style = WatermarkStyle {
        font_size: FontSize::new(48),
        opacity: Opacity::new(60),
        ..WatermarkStyle::new("2024-03-01")
    };
    let rotated = WatermarkStyle {
        rotation: RotationDegrees::new(30),
        ..style.clone()
    };
    let placement = PlacementSpec::Anchor(Anchor::BottomRight);

    let bitmap = FontLibrary::empty().resolve(None, &[], DATE_SAMPLE_TEXT);
    let system = FontLibrary::system().resolve(None, &style.font_families, DATE_SAMPLE_TEXT);

    group.bench_function("bitmap_font_1080p", |b| {
        b.iter(|| black_box(watermark::apply(&image, &style, placement, &bitmap)));
    });

    group.bench_function("system_font_1080p", |b| {
        b.iter(|| black_box(watermark::apply(&image, &style, placement, &system)));
    });

    group.bench_function("system_font_rotated_1080p", |b| {
        b.iter(|| black_box(watermark::apply(&image, &rotated, placement, &system)));
    });

    group.finish();
}

criterion_group!(benches, watermark_rendering_benchmark);
criterion_main!(benches);
