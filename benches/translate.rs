use criterion::{black_box, criterion_group, criterion_main, Criterion};
use optical_morse::capture::{BlinkingCamera, Camera, CameraConfig};
use optical_morse::clustering::KMeans;
use optical_morse::sampling::ImageSample;
use optical_morse::translation::{apply_baseline, run_length_encode, trim, SubmitCode, Translator};

fn filmed(text: &str, unit_frames: usize) -> (Vec<u8>, Vec<optical_morse::LumaFrame>) {
    let mut camera = BlinkingCamera::from_text(text, unit_frames);
    camera.open(&CameraConfig::default()).unwrap();
    let frames: Vec<_> = (0..camera.schedule().len())
        .map(|_| camera.capture().unwrap())
        .collect();
    let contrast = frames
        .iter()
        .map(|f| ImageSample::from_frame(f).unwrap().contrast())
        .collect();
    (contrast, frames)
}

fn bench_translate(c: &mut Criterion) {
    let (contrast, frames) = filmed("THE QUICK BROWN FOX", 4);

    c.bench_function("sample_frame", |b| {
        b.iter(|| ImageSample::from_frame(black_box(&frames[0])).unwrap().contrast())
    });

    c.bench_function("resolve", |b| {
        let mut translator = Translator::immediate();
        b.iter(|| translator.resolve(SubmitCode(1), black_box(&contrast), 20))
    });

    let thresholded = apply_baseline(&contrast, 20).unwrap();
    let tokens = run_length_encode(trim(&thresholded));
    let positives: Vec<i32> = tokens.iter().copied().filter(|t| *t > 0).collect();
    let negatives: Vec<i32> = tokens.iter().copied().filter(|t| *t < 0).collect();
    let seeds = [
        *positives.iter().min().unwrap(),
        *positives.iter().max().unwrap(),
        *negatives.iter().max().unwrap(),
        -16,
        *negatives.iter().min().unwrap(),
    ];
    c.bench_function("kmeans_fit", |b| {
        let kmeans = KMeans::default();
        b.iter(|| kmeans.fit(black_box(&seeds), black_box(&tokens)))
    });
}

criterion_group!(benches, bench_translate);
criterion_main!(benches);
