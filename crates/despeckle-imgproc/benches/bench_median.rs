use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

use despeckle_image::Image;
use despeckle_imgproc::{
    filter::{median_filter, MedianFilter},
    parallel::ExecutionStrategy,
    select::Selector,
};
use imageproc::filter::median_filter as imageproc_median_filter;
use rand::{rngs::StdRng, Rng, SeedableRng};

fn bench_median(c: &mut Criterion) {
    let mut group = c.benchmark_group("Median");

    for (width, height) in [(256, 224), (512, 448), (1024, 896)].iter() {
        for radius in [1, 2].iter() {
            group.throughput(criterion::Throughput::Elements((*width * *height) as u64));

            let parameter_string = format!("{}x{}x{}", width, height, radius);

            // input image with salt-and-pepper noise
            let mut rng = StdRng::seed_from_u64(42);
            let image_data = (0..width * height * 3)
                .map(|_| match rng.random_range(0..20) {
                    0 => 0u8,
                    1 => 255u8,
                    _ => 128u8,
                })
                .collect::<Vec<_>>();
            let image_size = [*width, *height].into();
            let image = Image::<u8, 3>::new(image_size, image_data).unwrap();

            // output image
            let output = Image::<u8, 3>::from_size_val(image_size, 0).unwrap();

            for (name, config) in [
                (
                    "despeckle_serial",
                    MedianFilter::new()
                        .with_radius(*radius)
                        .with_strategy(ExecutionStrategy::Serial),
                ),
                ("despeckle_par", MedianFilter::new().with_radius(*radius)),
                (
                    "despeckle_par_quickselect",
                    MedianFilter::new()
                        .with_radius(*radius)
                        .with_selector(Selector::QuickSelect),
                ),
            ] {
                group.bench_with_input(
                    BenchmarkId::new(name, &parameter_string),
                    &(&image, &output),
                    |b, i| {
                        let (src, mut dst) = (i.0, i.1.clone());
                        b.iter(|| black_box(median_filter(src, &mut dst, &config)))
                    },
                );
            }

            group.bench_with_input(
                BenchmarkId::new("imageproc", &parameter_string),
                &image,
                |b, i| {
                    let rgb_image = image::RgbImage::from_raw(
                        i.width() as u32,
                        i.height() as u32,
                        i.as_slice().to_vec(),
                    )
                    .unwrap();
                    b.iter(|| {
                        black_box(imageproc_median_filter(
                            &rgb_image,
                            *radius as u32,
                            *radius as u32,
                        ))
                    })
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_median);
criterion_main!(benches);
