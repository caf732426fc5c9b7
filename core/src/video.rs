use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};

use crate::*;

/// One playable clip from the catalog, optionally trimmed to a window.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoDescriptor {
    pub video_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_seconds")]
    pub start_seconds: Option<u32>,
    #[serde(default, deserialize_with = "lenient_seconds")]
    pub end_seconds: Option<u32>,
}

pub type Playlist = Vec<VideoDescriptor>;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ThumbnailQuality {
    /// Full resolution still, used when the image is cut into pieces.
    MaxRes,
    /// Medium still, cheap enough for a grid of cards.
    Medium,
}

impl ThumbnailQuality {
    const fn file_name(self) -> &'static str {
        match self {
            Self::MaxRes => "maxresdefault.jpg",
            Self::Medium => "mqdefault.jpg",
        }
    }
}

impl VideoDescriptor {
    pub fn new(video_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            video_id: video_id.into(),
            title: title.into(),
            start_seconds: None,
            end_seconds: None,
        }
    }

    pub fn with_window(mut self, start_seconds: u32, end_seconds: u32) -> Self {
        self.start_seconds = Some(start_seconds);
        self.end_seconds = Some(end_seconds);
        self
    }

    pub fn start(&self) -> u32 {
        self.start_seconds.unwrap_or(0)
    }

    pub fn thumbnail_url(&self, quality: ThumbnailQuality) -> String {
        format!(
            "https://img.youtube.com/vi/{}/{}",
            self.video_id,
            quality.file_name()
        )
    }

    /// Declared `[start, end)` window in seconds, rejecting empty or inverted ranges.
    pub fn time_window(&self) -> Result<(u32, u32)> {
        let start = self.start();
        let end = self.end_seconds.ok_or(GameError::MissingEndTime)?;
        if end <= start {
            return Err(GameError::InvalidTimeRange { start, end });
        }
        Ok((start, end))
    }
}

/// Accepts `12`, `12.0`, `"12"`, `""` and `null`; the exporter emits all of them.
///
/// Anything else is dropped with a warning, so one bad cell only spoils its own video.
fn lenient_seconds<'de, D>(deserializer: D) -> core::result::Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    struct SecondsVisitor;

    fn unusable<T: fmt::Display, E>(value: T) -> core::result::Result<Option<u32>, E> {
        log::warn!("ignoring unusable time value {}", value);
        Ok(None)
    }

    impl<'de> Visitor<'de> for SecondsVisitor {
        type Value = Option<u32>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a number of seconds, a numeric string or nothing")
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> core::result::Result<Self::Value, E> {
            unusable(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> core::result::Result<Self::Value, E> {
            match u32::try_from(v) {
                Ok(secs) => Ok(Some(secs)),
                Err(_) => unusable(v),
            }
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> core::result::Result<Self::Value, E> {
            match u32::try_from(v) {
                Ok(secs) => Ok(Some(secs)),
                Err(_) => unusable(v),
            }
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> core::result::Result<Self::Value, E> {
            if v >= 0.0 && v <= u32::MAX as f64 {
                Ok(Some(v as u32))
            } else {
                unusable(v)
            }
        }

        fn visit_str<E: de::Error>(self, v: &str) -> core::result::Result<Self::Value, E> {
            let v = v.trim();
            if v.is_empty() {
                return Ok(None);
            }
            match (v.parse::<u32>(), v.parse::<f64>()) {
                (Ok(secs), _) => Ok(Some(secs)),
                (Err(_), Ok(secs)) if secs.is_finite() => self.visit_f64(secs),
                _ => unusable(format_args!("{:?}", v)),
            }
        }

        fn visit_seq<A: de::SeqAccess<'de>>(
            self,
            mut seq: A,
        ) -> core::result::Result<Self::Value, A::Error> {
            while seq.next_element::<de::IgnoredAny>()?.is_some() {}
            unusable("list")
        }

        fn visit_map<A: de::MapAccess<'de>>(
            self,
            mut map: A,
        ) -> core::result::Result<Self::Value, A::Error> {
            while map.next_entry::<de::IgnoredAny, de::IgnoredAny>()?.is_some() {}
            unusable("object")
        }

        fn visit_none<E: de::Error>(self) -> core::result::Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> core::result::Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D: Deserializer<'de>>(
            self,
            deserializer: D,
        ) -> core::result::Result<Self::Value, D::Error> {
            deserializer.deserialize_any(self)
        }
    }

    deserializer.deserialize_option(SecondsVisitor)
}
