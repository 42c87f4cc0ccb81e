use std::fs::File;
use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as DecodeError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::debug;

use crate::error::{Result, SnrError};

/// Mono samples in `[-1.0, 1.0]` at the file's native sample rate.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSequence {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl SampleSequence {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Source of decoded audio for the catalog processor.
pub trait AudioLoader {
    fn load(&self, path: &Path) -> Result<SampleSequence>;
}

/// Decodes any format symphonia supports and downmixes to mono.
#[derive(Debug, Default, Clone, Copy)]
pub struct SymphoniaLoader;

impl AudioLoader for SymphoniaLoader {
    fn load(&self, path: &Path) -> Result<SampleSequence> {
        let file = File::open(path).map_err(|e| SnrError::load(path, e))?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }

        let probed = symphonia::default::get_probe()
            .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
            .map_err(|e| SnrError::load(path, e))?;

        let mut format = probed.format;

        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| SnrError::load(path, "no audio track found"))?;

        let codec_params = track.codec_params.clone();
        let track_id = track.id;
        let mut sample_rate = codec_params.sample_rate.unwrap_or(0);

        let mut decoder = symphonia::default::get_codecs()
            .make(&codec_params, &DecoderOptions::default())
            .map_err(|e| SnrError::load(path, e))?;

        let mut mono: Vec<f32> = Vec::new();
        let mut sample_buf: Option<SampleBuffer<f32>> = None;
        let mut skipped_packets = 0usize;

        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(DecodeError::IoError(ref e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    break;
                }
                Err(DecodeError::ResetRequired) => break,
                Err(e) => return Err(SnrError::load(path, e)),
            };

            if packet.track_id() != track_id {
                continue;
            }

            let decoded = match decoder.decode(&packet) {
                Ok(d) => d,
                Err(DecodeError::DecodeError(_)) => {
                    skipped_packets += 1;
                    continue;
                }
                Err(e) => return Err(SnrError::load(path, e)),
            };

            let spec = *decoded.spec();
            if sample_rate == 0 {
                sample_rate = spec.rate;
            }
            let channels = spec.channels.count().max(1);
            let num_frames = decoded.capacity() as u64;

            // Reuse the buffer across packets; reallocate only when it is too small
            let too_small = sample_buf
                .as_ref()
                .map_or(true, |buf| buf.capacity() < decoded.capacity() * channels);
            if too_small {
                sample_buf = Some(SampleBuffer::new(num_frames, spec));
            }

            if let Some(buf) = sample_buf.as_mut() {
                buf.copy_interleaved_ref(decoded);
                downmix_into(buf.samples(), channels, &mut mono);
            }
        }

        if skipped_packets > 0 {
            debug!(path = %path.display(), skipped_packets, "skipped undecodable packets");
        }

        if sample_rate == 0 {
            return Err(SnrError::load(path, "unknown sample rate"));
        }

        debug!(path = %path.display(), samples = mono.len(), sample_rate, "decoded");

        Ok(SampleSequence::new(mono, sample_rate))
    }
}

/// Average interleaved frames into single mono samples, appended to `out`.
fn downmix_into(interleaved: &[f32], channels: usize, out: &mut Vec<f32>) {
    if channels == 1 {
        out.extend_from_slice(interleaved);
        return;
    }
    out.extend(
        interleaved
            .chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_downmix_mono_passthrough() {
        let mut out = Vec::new();
        downmix_into(&[0.1, 0.2, 0.3], 1, &mut out);
        assert_eq!(out, vec![0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_downmix_stereo_averages_frames() {
        let mut out = vec![9.0];
        downmix_into(&[1.0, 0.0, 0.5, 0.5, -1.0, 1.0], 2, &mut out);
        assert_eq!(out, vec![9.0, 0.5, 0.5, 0.0]);
    }

    #[test]
    fn test_missing_file_is_load_failure() {
        let err = SymphoniaLoader
            .load(Path::new("/definitely/not/here.wav"))
            .unwrap_err();
        match err {
            SnrError::Load { path, .. } => assert_eq!(path, Path::new("/definitely/not/here.wav")),
            other => panic!("expected load failure, got {:?}", other),
        }
    }

    #[test]
    fn test_garbage_file_is_load_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("noise.mp3");
        std::fs::write(&path, b"definitely not audio").unwrap();
        assert!(matches!(
            SymphoniaLoader.load(&path),
            Err(SnrError::Load { .. })
        ));
    }
}
