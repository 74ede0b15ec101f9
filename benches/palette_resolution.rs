use criterion::{black_box, criterion_group, criterion_main, Criterion};
use cover_tint::color::{ColorConverter, ContrastFixer, LightnessTweaker};
use cover_tint::{ExtractorKind, ExtractorRegistry, Monochrome, PaletteResolver, Rgb};
use image::{Rgba, RgbaImage};

/// Cover-like test image: diagonal gradient with a solid band
fn cover(size: u32) -> RgbaImage {
    RgbaImage::from_fn(size, size, |x, y| {
        if (size / 3..size / 2).contains(&y) {
            Rgba([200, 30, 30, 255])
        } else {
            let t = ((x + y) * 255 / (2 * size)) as u8;
            Rgba([t, 255 - t, 120, 255])
        }
    })
}

fn benchmark_color_math(c: &mut Criterion) {
    let converter = ColorConverter::new();
    let fixer = ContrastFixer::new();
    let tweaker = LightnessTweaker::new();
    let yellow = Rgb::new(240, 200, 40);

    c.bench_function("hsluv_round_trip", |b| {
        b.iter(|| converter.to_rgb(converter.to_perceptual(black_box(yellow))))
    });

    c.bench_function("fix_against_white", |b| {
        b.iter(|| fixer.fix_aa(black_box(yellow), Monochrome::White))
    });

    c.bench_function("tweak_lightness", |b| {
        b.iter(|| tweaker.tweak(black_box(yellow), 5.0))
    });
}

fn benchmark_extraction(c: &mut Criterion) {
    let registry = ExtractorRegistry::default();
    let image = cover(512);

    for kind in ExtractorKind::ALL {
        c.bench_function(&format!("extract_{}", kind.tag()), |b| {
            b.iter(|| registry.extract(kind, black_box(&image)))
        });
    }
}

fn benchmark_palette(c: &mut Criterion) {
    let resolver = PaletteResolver::new();

    c.bench_function("palette_from_color", |b| {
        b.iter(|| resolver.palette_from_color(black_box(Rgb::new(200, 30, 30)), 5.0))
    });
}

criterion_group!(benches, benchmark_color_math, benchmark_extraction, benchmark_palette);
criterion_main!(benches);
