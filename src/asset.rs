use std::path::Path;
use std::time::Duration;

use serde_json::Value as JsonValue;

const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

// ---------------------------------------------------------------------------
// Decorative animation (Lottie JSON)
// ---------------------------------------------------------------------------

/// The parts of a Lottie document the side-panel globe needs.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationAsset {
    pub name: Option<String>,
    /// Frames per second (`fr`).
    pub frame_rate: f64,
    /// First and last frame (`ip`, `op`).
    pub in_point: f64,
    pub out_point: f64,
    /// Canvas height in pixels (`h`).
    pub height: Option<f64>,
}

impl AnimationAsset {
    /// Read the header fields of a Lottie document. `None` unless the frame
    /// rate is positive and the frame span is non-empty.
    pub fn from_json(value: &JsonValue) -> Option<Self> {
        let frame_rate = value.get("fr")?.as_f64()?;
        let in_point = value.get("ip")?.as_f64()?;
        let out_point = value.get("op")?.as_f64()?;
        if frame_rate <= 0.0 || out_point <= in_point {
            return None;
        }
        Some(Self {
            name: value.get("nm").and_then(JsonValue::as_str).map(str::to_string),
            frame_rate,
            in_point,
            out_point,
            height: value.get("h").and_then(JsonValue::as_f64),
        })
    }

    /// Length of one loop in seconds.
    pub fn duration_secs(&self) -> f64 {
        (self.out_point - self.in_point) / self.frame_rate
    }
}

/// Load the animation from an `http(s)://` URL or a local path.
///
/// Every failure (I/O, timeout, non-200 status, malformed payload) collapses
/// into `None`; the decoration is then simply not drawn.
pub fn load_animation(source: &str) -> Option<AnimationAsset> {
    let body = if source.starts_with("http://") || source.starts_with("https://") {
        fetch_url(source)
    } else {
        std::fs::read_to_string(Path::new(source)).ok()
    };

    let asset = body
        .and_then(|text| serde_json::from_str::<JsonValue>(&text).ok())
        .and_then(|json| AnimationAsset::from_json(&json));

    match &asset {
        Some(a) => log::info!(
            "Loaded animation {:?} ({:.1}s loop) from {source}",
            a.name.as_deref().unwrap_or("unnamed"),
            a.duration_secs()
        ),
        None => log::warn!("Animation unavailable from {source}; decoration disabled"),
    }
    asset
}

fn fetch_url(url: &str) -> Option<String> {
    let resp = ureq::get(url).timeout(FETCH_TIMEOUT).call().ok()?;
    if resp.status() != 200 {
        return None;
    }
    resp.into_string().ok()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn reads_lottie_header() {
        let doc = json!({
            "v": "5.7.4", "nm": "globe", "fr": 30, "ip": 0, "op": 120,
            "w": 500, "h": 500, "layers": []
        });
        let asset = AnimationAsset::from_json(&doc).unwrap();
        assert_eq!(asset.name.as_deref(), Some("globe"));
        assert_eq!(asset.duration_secs(), 4.0);
        assert_eq!(asset.height, Some(500.0));
    }

    #[test]
    fn rejects_documents_without_frames() {
        assert!(AnimationAsset::from_json(&json!({ "nm": "x" })).is_none());
        assert!(AnimationAsset::from_json(&json!({ "fr": 0, "ip": 0, "op": 10 })).is_none());
        assert!(AnimationAsset::from_json(&json!({ "fr": 30, "ip": 10, "op": 10 })).is_none());
    }

    #[test]
    fn missing_file_is_none() {
        assert!(load_animation("/nonexistent/globe.json").is_none());
    }

    #[test]
    fn malformed_file_is_none() {
        let path = std::env::temp_dir().join(format!("quakeview-{}-bad.json", std::process::id()));
        std::fs::write(&path, "{ not json").unwrap();
        let asset = load_animation(path.to_str().unwrap());
        std::fs::remove_file(&path).ok();
        assert!(asset.is_none());
    }

    #[test]
    fn local_file_loads() {
        let path =
            std::env::temp_dir().join(format!("quakeview-{}-globe.json", std::process::id()));
        std::fs::write(&path, r#"{"fr": 25, "ip": 0, "op": 50}"#).unwrap();
        let asset = load_animation(path.to_str().unwrap());
        std::fs::remove_file(&path).ok();
        assert_eq!(asset.map(|a| a.duration_secs()), Some(2.0));
    }
}
