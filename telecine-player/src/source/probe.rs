//! Stream properties from `ffprobe`

use std::process::{Command, Stdio};

use serde::Deserialize;
use tracing::debug;

use super::DecoderError;

/// What `ffprobe` reports about the first video stream
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Probe {
    pub width: u32,
    pub height: u32,
    pub frame_rate: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    width: Option<u32>,
    height: Option<u32>,
    avg_frame_rate: Option<String>,
    r_frame_rate: Option<String>,
}

/// Parse an ffmpeg rational such as `30000/1001` or `25`
///
/// `0/0` (unknown) and other non-positive rates yield `None`.
pub fn parse_rate(s: &str) -> Option<f32> {
    let s = s.trim();
    let rate = match s.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.trim().parse().ok()?;
            let den: f64 = den.trim().parse().ok()?;
            if den == 0.0 {
                return None;
            }
            num / den
        }
        None => s.parse().ok()?,
    };
    (rate.is_finite() && rate > 0.0).then_some(rate as f32)
}

/// Interpret `ffprobe -of json` output
pub fn parse_probe(json: &[u8]) -> Result<Probe, DecoderError> {
    let output: ProbeOutput = serde_json::from_slice(json)?;
    let stream = output
        .streams
        .into_iter()
        .next()
        .ok_or(DecoderError::NoVideoStream)?;

    let (width, height) = match (stream.width, stream.height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => (w, h),
        _ => return Err(DecoderError::NoVideoStream),
    };

    // The average rate is the better pacing hint; r_frame_rate is the
    // container's timebase guess and only a fallback
    let frame_rate = [stream.avg_frame_rate, stream.r_frame_rate]
        .into_iter()
        .flatten()
        .find_map(|r| parse_rate(&r));

    Ok(Probe {
        width,
        height,
        frame_rate,
    })
}

/// Run `ffprobe` on a locator
pub fn probe(locator: &str, input_args: &[&str]) -> Result<Probe, DecoderError> {
    let output = Command::new("ffprobe")
        .args(["-v", "error", "-select_streams", "v:0"])
        .args(["-show_entries", "stream=width,height,avg_frame_rate,r_frame_rate"])
        .args(["-of", "json"])
        .args(input_args)
        .arg(locator)
        .stdin(Stdio::null())
        .output()
        .map_err(|source| DecoderError::Spawn {
            program: "ffprobe",
            source,
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(DecoderError::Probe(stderr.trim().to_string()));
    }

    let probe = parse_probe(&output.stdout)?;
    debug!(locator, ?probe, "probed");
    Ok(probe)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rate() {
        assert_eq!(parse_rate("25/1"), Some(25.0));
        assert_eq!(parse_rate("30"), Some(30.0));
        let ntsc = parse_rate("30000/1001").unwrap();
        assert!((ntsc - 29.97).abs() < 0.01);

        assert_eq!(parse_rate("0/0"), None);
        assert_eq!(parse_rate("0/1"), None);
        assert_eq!(parse_rate("n/a"), None);
        assert_eq!(parse_rate(""), None);
    }

    #[test]
    fn test_parse_probe() {
        let json = br#"{
            "programs": [],
            "streams": [
                {
                    "width": 1920,
                    "height": 1080,
                    "r_frame_rate": "30/1",
                    "avg_frame_rate": "30000/1001"
                }
            ]
        }"#;

        let probe = parse_probe(json).unwrap();
        assert_eq!((probe.width, probe.height), (1920, 1080));
        assert!((probe.frame_rate.unwrap() - 29.97).abs() < 0.01);
    }

    #[test]
    fn test_parse_probe_falls_back_to_r_frame_rate() {
        let json = br#"{"streams":[{"width":640,"height":480,"avg_frame_rate":"0/0","r_frame_rate":"15/1"}]}"#;
        assert_eq!(parse_probe(json).unwrap().frame_rate, Some(15.0));
    }

    #[test]
    fn test_parse_probe_without_video() {
        assert!(matches!(
            parse_probe(br#"{"streams":[]}"#),
            Err(DecoderError::NoVideoStream)
        ));
        assert!(matches!(parse_probe(br#"{}"#), Err(DecoderError::NoVideoStream)));
        assert!(matches!(
            parse_probe(br#"{"streams":[{"width":0,"height":480}]}"#),
            Err(DecoderError::NoVideoStream)
        ));
        assert!(matches!(parse_probe(b"not json"), Err(DecoderError::Json(_))));
    }
}
