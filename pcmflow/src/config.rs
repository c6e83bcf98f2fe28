//! Pipeline configuration.
//!
//! A pipeline is a generator followed by an optional rate change and an
//! optional encoding change:
//!
//! ```yaml
//! source:
//!   sine:
//!     rate: 48000
//!     layout: stereo
//!     frequency: 440.0
//! resample_rate: 44100
//! encoding: i16
//! ```
//!
//! Layout names are `mono`, `stereo`, `"2.5"` and `"5.5"`; the last two must
//! be quoted so YAML reads them as strings. Reading the file is left to the
//! caller.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::channel::{ChannelLayout, LayoutPreset};
use crate::error::{Error, Result};
use crate::sample::SampleEncoding;
use crate::source::{AudioSource, Reencoder, Resampler, Sine};
use crate::spec::SignalSpec;

/// Description of a source chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// The generator at the head of the chain.
    pub source: SourceConfig,

    /// Output sample rate; the generator's rate when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resample_rate: Option<u32>,

    /// Output encoding; the generator's encoding when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<SampleEncoding>,
}

/// Generator selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceConfig {
    Sine(SineConfig),
}

/// Parameters of a [`Sine`] generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SineConfig {
    /// Sample rate in Hz.
    pub rate: u32,

    /// Channel layout preset.
    pub layout: LayoutPreset,

    /// Frequency parameter of the wave.
    pub frequency: f64,

    /// Restart every frame at phase zero.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub phase_reset: bool,
}

impl SineConfig {
    fn spec(&self) -> SignalSpec {
        SignalSpec::new(self.rate, ChannelLayout::preset(self.layout))
    }
}

impl PipelineConfig {
    /// Parses a YAML document.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: PipelineConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the configuration to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Rejects zero rates and unusable frequencies.
    pub fn validate(&self) -> Result<()> {
        match &self.source {
            SourceConfig::Sine(sine) => {
                if sine.rate == 0 {
                    return Err(Error::Config("sine rate must be non-zero".to_string()));
                }
                if !sine.frequency.is_finite() || sine.frequency <= 0.0 {
                    return Err(Error::Config(format!(
                        "sine frequency must be positive and finite, got {}",
                        sine.frequency
                    )));
                }
            }
        }
        if self.resample_rate == Some(0) {
            return Err(Error::Config("resample rate must be non-zero".to_string()));
        }
        Ok(())
    }

    /// Builds the source chain.
    pub fn build(&self) -> Result<Box<dyn AudioSource>> {
        self.validate()?;

        let mut source: Box<dyn AudioSource> = match &self.source {
            SourceConfig::Sine(sine) => {
                debug!(
                    rate = sine.rate,
                    layout = ?sine.layout,
                    frequency = sine.frequency,
                    "pipeline: sine"
                );
                let generator = Sine::new(sine.spec(), sine.frequency)?;
                Box::new(generator.with_phase_reset(sine.phase_reset))
            }
        };

        if let Some(rate) = self.resample_rate {
            if rate != source.spec().rate {
                debug!(from = source.spec().rate, to = rate, "pipeline: resample");
                let spec = source.spec().with_rate(rate);
                source = Box::new(Resampler::new(source, spec)?);
            }
        }

        if let Some(encoding) = self.encoding {
            debug!(encoding = %encoding, "pipeline: reencode");
            source = Box::new(Reencoder::new(source, encoding));
        }

        Ok(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
source:
  sine:
    rate: 16000
    layout: "2.5"
    frequency: 440.0
    phase_reset: true
resample_rate: 8000
encoding: u24
"#;

    #[test]
    fn test_parse_full() {
        let config = PipelineConfig::from_yaml(FULL).unwrap();
        let SourceConfig::Sine(sine) = &config.source;
        assert_eq!(sine.rate, 16000);
        assert_eq!(sine.layout, LayoutPreset::TwoPointFive);
        assert!(sine.phase_reset);
        assert_eq!(config.resample_rate, Some(8000));
        assert_eq!(config.encoding, Some(SampleEncoding::U24));
    }

    #[test]
    fn test_parse_minimal() {
        let yaml = "source:\n  sine:\n    rate: 8000\n    layout: mono\n    frequency: 2.0\n";
        let config = PipelineConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.resample_rate, None);
        assert_eq!(config.encoding, None);

        let source = config.build().unwrap();
        assert_eq!(source.spec(), SignalSpec::mono(8000));
        assert_eq!(source.encoding(), SampleEncoding::F32);
        assert!(source.is_infallible());
    }

    #[test]
    fn test_build_full_chain() {
        let mut source = PipelineConfig::from_yaml(FULL).unwrap().build().unwrap();
        assert_eq!(source.spec().rate, 8000);
        assert_eq!(source.spec().channel_count(), 3);
        assert_eq!(source.encoding(), SampleEncoding::U24);

        let frame = source.next_frame().unwrap().unwrap();
        assert_eq!(frame.encoding(), SampleEncoding::U24);
        assert_eq!(frame.len() % 9, 0);
    }

    #[test]
    fn test_same_rate_skips_resampler() {
        let yaml = r#"
source:
  sine:
    rate: 8000
    layout: stereo
    frequency: 2.0
resample_rate: 8000
"#;
        let mut source = PipelineConfig::from_yaml(yaml).unwrap().build().unwrap();
        let frame = source.next_frame().unwrap().unwrap();
        assert_eq!(frame.len(), 8000 * 2 * 4);
    }

    #[test]
    fn test_rejects_invalid() {
        let zero_rate = "source:\n  sine:\n    rate: 0\n    layout: mono\n    frequency: 1.0\n";
        assert!(matches!(PipelineConfig::from_yaml(zero_rate), Err(Error::Config(_))));

        let bad_freq = "source:\n  sine:\n    rate: 8000\n    layout: mono\n    frequency: -1.0\n";
        assert!(matches!(PipelineConfig::from_yaml(bad_freq), Err(Error::Config(_))));

        let mono = "source:\n  sine:\n    rate: 8000\n    layout: mono\n    frequency: 1.0\n";

        let zero_resample = format!("{mono}resample_rate: 0\n");
        assert!(matches!(PipelineConfig::from_yaml(&zero_resample), Err(Error::Config(_))));

        let bad_encoding = format!("{mono}encoding: s16\n");
        assert!(matches!(PipelineConfig::from_yaml(&bad_encoding), Err(Error::Config(_))));

        let bad_layout = "source:\n  sine:\n    rate: 8000\n    layout: quad\n    frequency: 1.0\n";
        assert!(matches!(PipelineConfig::from_yaml(bad_layout), Err(Error::Config(_))));
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = PipelineConfig::from_yaml(FULL).unwrap();
        let yaml = config.to_yaml().unwrap();
        assert_eq!(PipelineConfig::from_yaml(&yaml).unwrap(), config);
    }
}
