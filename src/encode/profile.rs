use serde::{Deserialize, Serialize};

/// Default video bitrate in bits per second.
pub const DEFAULT_BITRATE_BPS: u32 = 2_500_000;

/// Video container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Container {
    /// WebM (Matroska subset).
    WebM,
    /// Fragmented MP4.
    Mp4,
}

/// Video codec.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Codec {
    /// VP9.
    Vp9,
    /// VP8.
    Vp8,
    /// H.264 / AVC.
    H264,
}

/// A container/codec pair an encoder may or may not support.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EncodingProfile {
    /// Output container.
    pub container: Container,
    /// Video codec inside the container.
    pub codec: Codec,
}

impl EncodingProfile {
    /// WebM with VP9.
    pub const WEBM_VP9: Self = Self {
        container: Container::WebM,
        codec: Codec::Vp9,
    };
    /// WebM with VP8.
    pub const WEBM_VP8: Self = Self {
        container: Container::WebM,
        codec: Codec::Vp8,
    };
    /// MP4 with H.264.
    pub const MP4_H264: Self = Self {
        container: Container::Mp4,
        codec: Codec::H264,
    };

    /// Preference order used when the caller does not supply one.
    pub fn default_preferences() -> Vec<Self> {
        vec![Self::WEBM_VP9, Self::WEBM_VP8, Self::MP4_H264]
    }

    /// MIME type including the codec parameter, e.g. `video/webm;codecs=vp9`.
    pub fn mime_type(&self) -> String {
        let container = match self.container {
            Container::WebM => "video/webm",
            Container::Mp4 => "video/mp4",
        };
        let codec = match self.codec {
            Codec::Vp9 => "vp9",
            Codec::Vp8 => "vp8",
            Codec::H264 => "avc1",
        };
        format!("{container};codecs={codec}")
    }

    /// Conventional file extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self.container {
            Container::WebM => "webm",
            Container::Mp4 => "mp4",
        }
    }

    /// `ffmpeg` encoder name for the codec.
    pub fn ffmpeg_encoder(&self) -> &'static str {
        match self.codec {
            Codec::Vp9 => "libvpx-vp9",
            Codec::Vp8 => "libvpx",
            Codec::H264 => "libx264",
        }
    }

    /// `ffmpeg` muxer name for the container.
    pub fn ffmpeg_muxer(&self) -> &'static str {
        match self.container {
            Container::WebM => "webm",
            Container::Mp4 => "mp4",
        }
    }
}

impl std::fmt::Display for EncodingProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.mime_type())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/profile.rs"]
mod tests;
