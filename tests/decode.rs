//! Offline decoding from synthetic camera footage.

use optical_morse::capture::{BlinkingCamera, Camera, CameraConfig, FileConfig};
use optical_morse::clustering::KMeans;
use optical_morse::morse::CanonicalSymbol::*;
use optical_morse::sampling::ImageSample;
use optical_morse::translation::{KMeansNormalizer, SubmitCode, Translator};
use std::time::Duration;

fn film(text: &str, unit_frames: usize, config: &CameraConfig) -> Vec<u8> {
    let mut camera = BlinkingCamera::from_text(text, unit_frames);
    camera.open(config).unwrap();
    (0..camera.schedule().len())
        .map(|_| {
            let frame = camera.capture().unwrap();
            ImageSample::from_frame(&frame).unwrap().contrast()
        })
        .collect()
}

#[test]
fn decodes_filmed_message() {
    let frames = film("SOS SOS", 4, &CameraConfig::default());
    let result = Translator::immediate().resolve(SubmitCode(1), &frames, 20);

    assert!(result.is_success());
    assert_eq!(result.morse(), Some("... --- ... / ... --- ..."));
    assert_eq!(result.text(), Some("SOS SOS"));
}

#[test]
fn decodes_mixed_letters() {
    let frames = film("HELLO WORLD", 3, &CameraConfig::default());
    let result = Translator::immediate().resolve(SubmitCode(2), &frames, 20);
    assert_eq!(result.text(), Some("HELLO WORLD"));
}

#[test]
fn baseline_above_signal_finds_nothing() {
    let frames = film("SOS SOS", 4, &CameraConfig::default());
    let result = Translator::immediate().resolve(SubmitCode(3), &frames, 127);
    assert!(!result.is_success());
    assert!(result.symbols().is_none());
    assert_eq!(result.baseline(), 127);
}

#[test]
fn hand_written_buffer() {
    let frames = [0, 0, 50, 50, 50, 0, 0, 0, 0, 0, 0, 60, 60, 0, 0];
    let result = Translator::immediate().resolve(SubmitCode(4), &frames, 10);

    assert!(result.is_success());
    assert_eq!(result.symbols(), Some(&[Dash, WordGap, Dot][..]));
    assert_eq!(result.morse(), Some("- / ."));
    assert_eq!(result.text(), Some("T E"));
}

#[test]
fn configured_pipeline() {
    let config = FileConfig::from_toml(
        r#"
        [clustering]
        iterations = 50

        [camera]
        noise = 0
        "#,
    )
    .unwrap();

    let frames = film("PARIS PARIS", 5, &config.camera);
    let normalizer = KMeansNormalizer::new(KMeans::new(config.clustering.iterations));
    let mut translator = Translator::new(Box::new(normalizer), Duration::ZERO);
    let result = translator.resolve(SubmitCode(5), &frames, config.recorder.baseline);

    assert_eq!(result.text(), Some("PARIS PARIS"));
}
