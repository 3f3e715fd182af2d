use super::*;
use crate::encode::sink::InMemoryEncoder;
use crate::session::cooperative::{CancellationToken, ThreadYield};

fn solid(w: u32, h: u32, v: u8) -> RasterImage {
    RasterImage::filled(w, h, [v, v, v, 255]).unwrap()
}

#[test]
fn assembles_frames_in_order_with_requested_timing() {
    let a = solid(2, 2, 10);
    let b = solid(2, 2, 20);
    let mut enc = InMemoryEncoder::new();
    let video = assemble(
        &[&a, &b],
        100,
        &mut enc,
        &AssembleOpts::default(),
        &mut Cooperative::detached(),
    )
    .unwrap();

    assert_eq!(video.frame_count, 2);
    assert_eq!(video.duration_ms(), 200);
    assert_eq!(video.profile, EncodingProfile::WEBM_VP9);
    assert_eq!(video.mime_type(), "video/webm;codecs=vp9");
    assert_eq!(video.bytes.len(), 2 * 2 * 2 * 4);

    let cfg = enc.config().unwrap();
    assert_eq!(cfg.fps, Fps::new(10, 1).unwrap());
    assert_eq!(cfg.bitrate_bps, 2_500_000);
    let idx: Vec<u64> = enc.frames().iter().map(|(i, _)| i.0).collect();
    assert_eq!(idx, vec![0, 1]);
}

#[test]
fn falls_back_to_the_next_supported_profile() {
    let a = solid(1, 1, 0);
    let mut enc = InMemoryEncoder::supporting([EncodingProfile::MP4_H264]);
    let video = assemble(
        &[&a],
        100,
        &mut enc,
        &AssembleOpts::default(),
        &mut Cooperative::detached(),
    )
    .unwrap();
    assert_eq!(video.profile, EncodingProfile::MP4_H264);
}

#[test]
fn no_supported_profile_is_encoding_unsupported() {
    let a = solid(1, 1, 0);
    let mut enc = InMemoryEncoder::supporting(Vec::<EncodingProfile>::new());
    let err = assemble(
        &[&a],
        100,
        &mut enc,
        &AssembleOpts::default(),
        &mut Cooperative::detached(),
    )
    .unwrap_err();
    assert!(matches!(err, ChromaError::EncodingUnsupported(_)));
}

#[test]
fn empty_output_is_reported() {
    let a = solid(1, 1, 0);
    let err = assemble(
        &[&a],
        100,
        &mut InMemoryEncoder::discarding(),
        &AssembleOpts::default(),
        &mut Cooperative::detached(),
    )
    .unwrap_err();
    assert!(matches!(err, ChromaError::EmptyEncodeResult));
}

#[test]
fn invalid_inputs_are_rejected() {
    let a = solid(2, 2, 0);
    let b = solid(3, 2, 0);
    let opts = AssembleOpts::default();
    let mut enc = InMemoryEncoder::new();

    let err = assemble(&[], 100, &mut enc, &opts, &mut Cooperative::detached()).unwrap_err();
    assert!(err.is_configuration());

    let err = assemble(&[&a], 0, &mut enc, &opts, &mut Cooperative::detached()).unwrap_err();
    assert!(err.is_configuration());

    let err = assemble(&[&a, &b], 100, &mut enc, &opts, &mut Cooperative::detached()).unwrap_err();
    assert!(matches!(err, ChromaError::RenderFailure(_)));
}

#[test]
fn cancelled_encode_leaves_the_encoder_reusable() {
    let a = solid(2, 2, 10);
    let b = solid(2, 2, 20);
    let opts = AssembleOpts::default();
    let mut enc = InMemoryEncoder::new();

    let token = CancellationToken::new();
    token.cancel();
    let mut coop = Cooperative::new(ThreadYield, token);
    let err = assemble(&[&a, &b], 100, &mut enc, &opts, &mut coop).unwrap_err();
    assert!(matches!(err, ChromaError::Cancelled));
    assert_eq!(enc.frames().len(), 1);
    assert!(!enc.is_started());

    let video = assemble(&[&a, &b], 100, &mut enc, &opts, &mut Cooperative::detached()).unwrap();
    assert_eq!(video.frame_count, 2);
    let idx: Vec<u64> = enc.frames().iter().map(|(i, _)| i.0).collect();
    assert_eq!(idx, vec![0, 1]);
}

#[test]
fn failed_push_aborts_the_encode() {
    struct FailSecond {
        inner: InMemoryEncoder,
        aborts: u32,
    }
    impl VideoEncoder for FailSecond {
        fn supports(&mut self, profile: &EncodingProfile) -> bool {
            self.inner.supports(profile)
        }
        fn begin(&mut self, cfg: EncodeConfig) -> ChromaResult<()> {
            self.inner.begin(cfg)
        }
        fn push_frame(&mut self, idx: FrameIndex, frame: &RasterImage) -> ChromaResult<()> {
            if idx.0 == 1 {
                return Err(ChromaError::render("encoder rejected frame"));
            }
            self.inner.push_frame(idx, frame)
        }
        fn finish(&mut self) -> ChromaResult<Vec<u8>> {
            self.inner.finish()
        }
        fn abort(&mut self) {
            self.aborts += 1;
            self.inner.abort();
        }
    }

    let a = solid(1, 1, 0);
    let mut enc = FailSecond {
        inner: InMemoryEncoder::new(),
        aborts: 0,
    };
    let opts = AssembleOpts::default();
    let err = assemble(&[&a, &a], 100, &mut enc, &opts, &mut Cooperative::detached()).unwrap_err();
    assert!(matches!(err, ChromaError::RenderFailure(_)));
    assert_eq!(enc.aborts, 1);
    assert!(!enc.inner.is_started());

    assemble(&[&a], 100, &mut enc, &opts, &mut Cooperative::detached()).unwrap();
    assert_eq!(enc.aborts, 1);
}

#[test]
fn save_writes_bytes_under_new_directories() {
    let root = std::env::temp_dir().join(format!("chromalevels-save-{}", std::process::id()));
    let path = root.join("nested").join("out.webm");
    let video = VideoArtifact {
        bytes: vec![1, 2, 3],
        profile: EncodingProfile::WEBM_VP8,
        width: 1,
        height: 1,
        frame_count: 1,
        frame_interval_ms: 100,
    };
    video.save(&path).unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), vec![1, 2, 3]);
    let _ = std::fs::remove_dir_all(&root);
}
