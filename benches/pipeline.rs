//! Benchmarks for the gbasset pipeline.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{Rgba, RgbaImage};

use gbasset::diagnostics::ValidationResult;
use gbasset::export::{render_header, render_source, ExportOptions};
use gbasset::{cluster, convert, ConvertConfig, Mode, SourceImage, SpriteOptions, TileHeight};

const SHADES: [[u8; 4]; 4] = [
    [224, 248, 208, 255],
    [136, 192, 112, 255],
    [52, 104, 86, 255],
    [8, 24, 32, 255],
];

/// A full screen of a DMG-style ramp with a repeating 32x32 motif, so the
/// tile library sees plenty of duplicates and mirrors.
fn screen() -> RgbaImage {
    RgbaImage::from_fn(160, 144, |x, y| {
        let (u, v) = (x % 32, y % 32);
        let u = if u >= 16 { 31 - u } else { u };
        Rgba(SHADES[((u * v + u / 3) % 4) as usize])
    })
}

/// A strip of 8 sprite cells of 16x16, transparent background.
fn sprite_strip() -> RgbaImage {
    RgbaImage::from_fn(128, 16, |x, y| {
        let cell = x / 16;
        let (u, v) = (x % 16, y);
        if (u + v + cell) % 5 == 0 {
            Rgba([0, 0, 0, 0])
        } else {
            Rgba(SHADES[((u ^ v) % 3 + 1) as usize])
        }
    })
}

fn bench_quantization(c: &mut Criterion) {
    let mut group = c.benchmark_group("quantization");
    let image = screen();

    group.bench_function("cluster_screen_8", |b| {
        b.iter(|| {
            let mut diagnostics = ValidationResult::new();
            cluster(black_box(&image), TileHeight::Eight, &mut diagnostics).unwrap()
        })
    });

    group.finish();
}

fn bench_assembly(c: &mut Criterion) {
    let mut group = c.benchmark_group("assembly");

    let screen = screen();
    let map = ConvertConfig {
        mode: Mode::Map { attributes: true },
        ..Default::default()
    };
    group.bench_function("map_screen", |b| {
        b.iter(|| convert(SourceImage::TrueColour(black_box(screen.clone())), &map).unwrap())
    });

    let strip = sprite_strip();
    let sprites = ConvertConfig {
        mode: Mode::Sprites(SpriteOptions {
            width: Some(16),
            height: Some(16),
            ..Default::default()
        }),
        ..Default::default()
    };
    group.bench_function("sprites_strip_8x16", |b| {
        b.iter(|| convert(SourceImage::TrueColour(black_box(strip.clone())), &sprites).unwrap())
    });

    group.finish();
}

fn bench_export(c: &mut Criterion) {
    let mut group = c.benchmark_group("export");

    let config = ConvertConfig {
        mode: Mode::Map { attributes: true },
        ..Default::default()
    };
    let conversion = convert(SourceImage::TrueColour(screen()), &config).unwrap();
    let options = ExportOptions {
        name: "screen".to_string(),
        bank: 1,
        structs: true,
    };

    group.bench_function("render_c_map", |b| {
        b.iter(|| {
            let source = render_source(black_box(&conversion), &options).unwrap();
            let header = render_header(&conversion, &options).unwrap();
            (source, header)
        })
    });

    group.finish();
}

criterion_group!(benches, bench_quantization, bench_assembly, bench_export);
criterion_main!(benches);
