use super::*;

fn gradient(width: u32, height: u32) -> RasterImage {
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for i in 0..width * height {
        let v = (i * 37 % 256) as u8;
        data.extend_from_slice(&[v, 255 - v, v / 2, (i % 7) as u8 * 30]);
    }
    RasterImage::new(width, height, data).unwrap()
}

#[test]
fn samples_are_normalized_and_drop_alpha() {
    let img = RasterImage::new(1, 1, vec![255, 0, 51, 10]).unwrap();
    let s = SampleMatrix::from_raster(&img);
    assert_eq!(s.len(), 1);
    assert_eq!(s.rows()[0], [1.0, 0.0, 0.2]);
}

#[test]
fn identity_assignment_round_trips_within_one_and_forces_opaque() {
    let img = gradient(5, 4);
    let samples = SampleMatrix::from_raster(&img);

    // One centroid per pixel reproduces the source colors.
    let centroids = samples.rows().to_vec();
    let assignments: Vec<u32> = (0..samples.len() as u32).collect();
    let out = from_assignment(&assignments, &centroids, 5, 4).unwrap();

    for (a, b) in img.data().chunks_exact(4).zip(out.data().chunks_exact(4)) {
        for c in 0..3 {
            assert!((i16::from(a[c]) - i16::from(b[c])).abs() <= 1);
        }
        assert_eq!(b[3], 255);
    }
}

#[test]
fn from_assignment_rejects_mismatched_sizes() {
    let err = from_assignment(&[0, 0, 0], &[[0.0; 3]], 2, 2).unwrap_err();
    assert!(matches!(err, ChromaError::RenderFailure(_)));

    let err = from_assignment(&[0, 1, 0, 3], &[[0.0; 3], [1.0; 3]], 2, 2).unwrap_err();
    assert!(matches!(err, ChromaError::RenderFailure(_)));
}

#[test]
fn from_rows_validates_shape_and_mean() {
    assert!(SampleMatrix::from_rows(2, 2, vec![[0.0; 3]; 3]).is_err());
    let s = SampleMatrix::from_rows(2, 1, vec![[0.0, 0.5, 1.0], [1.0, 0.5, 0.0]]).unwrap();
    assert_eq!(s.mean(), [0.5, 0.5, 0.5]);
}
