//! Performance benchmarks for nodate

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use nodate::test_utils::TestTree;
use nodate::{
    DateTagInspector, ScanConfig, ScanResult, Scanner, is_supported_image, walk,
};
use std::path::Path;

/// Tree of `dirs` directories with `per_dir` photos each; every third photo
/// is dated, the rest are split between undated and corrupt.
fn create_photo_tree(dirs: usize, per_dir: usize) -> TestTree {
    let tree = TestTree::new();
    for d in 0..dirs {
        for i in 0..per_dir {
            match i % 3 {
                0 => tree.add_dated_jpeg(&format!("album_{}/img_{}.jpg", d, i)),
                1 => tree.add_undated_jpeg(&format!("album_{}/img_{}.jpg", d, i)),
                _ => tree.add_file(&format!("album_{}/img_{}.gif", d, i), b"GIF89a"),
            };
        }
        tree.add_file(&format!("album_{}/notes.txt", d), b"notes");
    }
    tree
}

fn bench_extension_filter(c: &mut Criterion) {
    let names = [
        "IMG_0001.JPG",
        "scan.tiff",
        "notes.txt",
        "archive.tar.gz",
        "Makefile",
    ];

    c.bench_function("extension_filter", |b| {
        b.iter(|| {
            names
                .iter()
                .filter(|n| is_supported_image(black_box(Path::new(n))))
                .count()
        })
    });
}

fn bench_walk(c: &mut Criterion) {
    let mut group = c.benchmark_group("walk");

    let small = create_photo_tree(5, 10);
    group.bench_function("50_files", |b| b.iter(|| walk(black_box(small.path())).count()));

    let large = create_photo_tree(20, 25);
    group.bench_function("500_files", |b| b.iter(|| walk(black_box(large.path())).count()));

    group.finish();
}

fn bench_scan(c: &mut Criterion) {
    let tree = create_photo_tree(10, 30);
    let inspector = DateTagInspector::with_exif();
    let mut group = c.benchmark_group("scan_300_images");

    for (label, workers) in [("sequential", 1), ("parallel", 0)] {
        let config = ScanConfig {
            parallel_workers: workers,
            ..Default::default()
        };
        let scanner = Scanner::new(config, &inspector);
        group.bench_function(label, |b| {
            b.iter(|| {
                let mut result = ScanResult::default();
                scanner.scan(black_box(tree.path()), &mut result).unwrap();
                result.len()
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_extension_filter, bench_walk, bench_scan);
criterion_main!(benches);
