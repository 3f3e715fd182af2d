use super::*;
use crate::session::cooperative::{CancellationToken, HostYield};

struct Counter<'a>(&'a mut u32);

impl HostYield for Counter<'_> {
    fn yield_to_host(&mut self) {
        *self.0 += 1;
    }
}

fn two_tone_state() -> KMeansState {
    KMeansState::from_parts(
        vec![[1.0, 0.0, 0.0], [0.0, 0.0, 1.0]],
        vec![0, 0, 1, 1, 0, 0, 1, 1],
    )
}

#[test]
fn render_paints_centroid_colors_with_opaque_alpha() {
    let frame = FrameRenderer::default()
        .render(&two_tone_state(), 4, 2, 1, &mut Cooperative::detached())
        .unwrap();

    assert_eq!(frame.k, 2);
    assert_eq!(frame.step, 1);
    assert_eq!(frame.raster.pixel(0, 0), Some([255, 0, 0, 255]));
    assert_eq!(frame.raster.pixel(2, 0), Some([0, 0, 255, 255]));
    assert_eq!(frame.raster.pixel(3, 1), Some([0, 0, 255, 255]));
    assert_eq!(&frame.png[..4], b"\x89PNG");
    assert_eq!(frame.label(), "2 clusters");
    assert_eq!(frame.file_name(), "level_01_k02.png");
}

#[test]
fn render_checkpoints_after_each_chunk() {
    let mut count = 0u32;
    {
        let mut coop = Cooperative::new(Counter(&mut count), CancellationToken::new());
        FrameRenderer::new(3)
            .unwrap()
            .render(&two_tone_state(), 4, 2, 1, &mut coop)
            .unwrap();
    }
    // 8 pixels in chunks of 3.
    assert_eq!(count, 3);
}

#[test]
fn size_mismatch_is_a_render_failure() {
    let err = FrameRenderer::default()
        .render(&two_tone_state(), 3, 3, 1, &mut Cooperative::detached())
        .unwrap_err();
    assert!(matches!(err, ChromaError::RenderFailure(_)));
}

#[test]
fn zero_chunk_size_is_rejected() {
    assert!(FrameRenderer::new(0).is_err());
}
