use super::*;

#[test]
fn default_preferences_try_webm_before_mp4() {
    let prefs = EncodingProfile::default_preferences();
    assert_eq!(prefs[0], EncodingProfile::WEBM_VP9);
    assert_eq!(prefs[1], EncodingProfile::WEBM_VP8);
    assert_eq!(prefs[2], EncodingProfile::MP4_H264);
}

#[test]
fn mime_types_carry_codec_parameter() {
    assert_eq!(EncodingProfile::WEBM_VP9.mime_type(), "video/webm;codecs=vp9");
    assert_eq!(EncodingProfile::MP4_H264.mime_type(), "video/mp4;codecs=avc1");
    assert_eq!(EncodingProfile::WEBM_VP8.to_string(), "video/webm;codecs=vp8");
}

#[test]
fn ffmpeg_names_match_profile() {
    assert_eq!(EncodingProfile::WEBM_VP9.ffmpeg_encoder(), "libvpx-vp9");
    assert_eq!(EncodingProfile::MP4_H264.ffmpeg_muxer(), "mp4");
    assert_eq!(EncodingProfile::MP4_H264.extension(), "mp4");
}

#[test]
fn profile_serde_uses_lowercase_names() {
    let json = serde_json::to_string(&EncodingProfile::WEBM_VP9).unwrap();
    assert_eq!(json, r#"{"container":"webm","codec":"vp9"}"#);
    let back: EncodingProfile =
        serde_json::from_str(r#"{"container":"mp4","codec":"h264"}"#).unwrap();
    assert_eq!(back, EncodingProfile::MP4_H264);
}
