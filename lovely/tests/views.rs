use lovely::prelude::*;
use ndarray::{Array1, Array4};

#[test]
fn test_batch_of_images_end_to_end() {
    let batch = Array4::<f32>::from_shape_fn((4, 3, 8, 8), |(b, c, y, x)| {
        ((b + c + y + x) % 5) as f32 / 4.0
    });

    let line = batch.lovely().color(false).to_string();
    assert!(line.starts_with("tensor[4, 3, 8, 8] n=768 (3.0Kb) x∈[0.000, 1.000]"));

    let img = batch.rgb(&RgbOptions::default()).unwrap();
    // 4 tiles of 10x10 (frame included) with 3px gutters on one row
    assert_eq!((img.width(), img.height()), (4 * 10 + 3 * 3, 10));

    let chans = batch.chans(&ChansOptions::default()).unwrap();
    assert_eq!(chans.width(), 12 * 10 + 11 * 3);

    let ppm = img.to_ppm();
    assert!(ppm.starts_with(b"P6\n49 10\n255\n"));
}

#[test]
fn test_plot_and_save() {
    let values = Array1::from_shape_fn(1000, |i| ((i as f64) * 0.37).sin());
    let plot = values.plt(&PltOptions::default()).unwrap();
    let path = std::env::temp_dir().join(format!("lovely-plot-{}.svg", std::process::id()));
    plot.save_svg(&path).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("tensor[1000] f64"));
    std::fs::remove_file(&path).unwrap();
}
