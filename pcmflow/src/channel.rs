//! Speaker channel layouts.
//!
//! A [`ChannelLayout`] is a set of up to 32 channel flags stored as a bit
//! mask. Interleaved PCM carries one sample per enabled channel, in ascending
//! flag order.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single speaker channel position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u32)]
pub enum ChannelFlag {
    /// Front-left (left) or the mono channel.
    FrontLeft = 0x0000_0001,
    /// Front-right (right) channel.
    FrontRight = 0x0000_0002,
    /// Front-centre (centre) channel.
    FrontCentre = 0x0000_0004,
    /// Low frequency channel 1.
    Lfe1 = 0x0000_0008,
    /// Rear-left (surround rear left) channel.
    RearLeft = 0x0000_0010,
    /// Rear-right (surround rear right) channel.
    RearRight = 0x0000_0020,
    /// Front left-of-centre channel.
    FrontLeftCentre = 0x0000_0040,
    /// Front right-of-centre channel.
    FrontRightCentre = 0x0000_0080,
    /// Rear-centre (surround rear centre) channel.
    RearCentre = 0x0000_0100,
    /// Side left (surround left) channel.
    SideLeft = 0x0000_0200,
    /// Side right (surround right) channel.
    SideRight = 0x0000_0400,
    /// Top centre channel.
    TopCentre = 0x0000_0800,
    /// Top front-left channel.
    TopFrontLeft = 0x0000_1000,
    /// Top front-centre channel.
    TopFrontCentre = 0x0000_2000,
    /// Top front-right channel.
    TopFrontRight = 0x0000_4000,
    /// Top rear-left channel.
    TopRearLeft = 0x0000_8000,
    /// Top rear-centre channel.
    TopRearCentre = 0x0001_0000,
    /// Top rear-right channel.
    TopRearRight = 0x0002_0000,
    /// Rear left-of-centre channel.
    RearLeftCentre = 0x0004_0000,
    /// Rear right-of-centre channel.
    RearRightCentre = 0x0008_0000,
    /// Front left-wide channel.
    FrontLeftWide = 0x0010_0000,
    /// Front right-wide channel.
    FrontRightWide = 0x0020_0000,
    /// Front left-high channel.
    FrontLeftHigh = 0x0040_0000,
    /// Front centre-high channel.
    FrontCentreHigh = 0x0080_0000,
    /// Front right-high channel.
    FrontRightHigh = 0x0100_0000,
    /// Low frequency channel 2.
    Lfe2 = 0x0200_0000,
}

impl ChannelFlag {
    /// Every named flag, in ascending bit order.
    pub const ALL: [ChannelFlag; 26] = [
        ChannelFlag::FrontLeft,
        ChannelFlag::FrontRight,
        ChannelFlag::FrontCentre,
        ChannelFlag::Lfe1,
        ChannelFlag::RearLeft,
        ChannelFlag::RearRight,
        ChannelFlag::FrontLeftCentre,
        ChannelFlag::FrontRightCentre,
        ChannelFlag::RearCentre,
        ChannelFlag::SideLeft,
        ChannelFlag::SideRight,
        ChannelFlag::TopCentre,
        ChannelFlag::TopFrontLeft,
        ChannelFlag::TopFrontCentre,
        ChannelFlag::TopFrontRight,
        ChannelFlag::TopRearLeft,
        ChannelFlag::TopRearCentre,
        ChannelFlag::TopRearRight,
        ChannelFlag::RearLeftCentre,
        ChannelFlag::RearRightCentre,
        ChannelFlag::FrontLeftWide,
        ChannelFlag::FrontRightWide,
        ChannelFlag::FrontLeftHigh,
        ChannelFlag::FrontCentreHigh,
        ChannelFlag::FrontRightHigh,
        ChannelFlag::Lfe2,
    ];

    /// Returns the bit value of this flag.
    #[inline]
    pub const fn bit(self) -> u32 {
        self as u32
    }

    /// Returns the short label used when printing layouts.
    pub const fn short_name(self) -> &'static str {
        match self {
            ChannelFlag::FrontLeft => "FL",
            ChannelFlag::FrontRight => "FR",
            ChannelFlag::FrontCentre => "FC",
            ChannelFlag::Lfe1 => "LFE1",
            ChannelFlag::RearLeft => "RL",
            ChannelFlag::RearRight => "RR",
            ChannelFlag::FrontLeftCentre => "FLC",
            ChannelFlag::FrontRightCentre => "FRC",
            ChannelFlag::RearCentre => "RC",
            ChannelFlag::SideLeft => "SL",
            ChannelFlag::SideRight => "SR",
            ChannelFlag::TopCentre => "TC",
            ChannelFlag::TopFrontLeft => "TFL",
            ChannelFlag::TopFrontCentre => "TFC",
            ChannelFlag::TopFrontRight => "TFR",
            ChannelFlag::TopRearLeft => "TRL",
            ChannelFlag::TopRearCentre => "TRC",
            ChannelFlag::TopRearRight => "TRR",
            ChannelFlag::RearLeftCentre => "RLC",
            ChannelFlag::RearRightCentre => "RRC",
            ChannelFlag::FrontLeftWide => "FLW",
            ChannelFlag::FrontRightWide => "FRW",
            ChannelFlag::FrontLeftHigh => "FLH",
            ChannelFlag::FrontCentreHigh => "FCH",
            ChannelFlag::FrontRightHigh => "FRH",
            ChannelFlag::Lfe2 => "LFE2",
        }
    }
}

/// Named channel layout presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayoutPreset {
    /// Front-left only.
    #[serde(rename = "mono")]
    Mono,
    /// Front-left and front-right.
    #[serde(rename = "stereo")]
    Stereo,
    /// Stereo plus LFE1.
    #[serde(rename = "2.5")]
    TwoPointFive,
    /// Front left/right/centre, rear left/right and LFE1.
    #[serde(rename = "5.5")]
    FivePointFive,
}

impl LayoutPreset {
    const fn bits(self) -> u32 {
        match self {
            LayoutPreset::Mono => ChannelFlag::FrontLeft.bit(),
            LayoutPreset::Stereo => ChannelFlag::FrontLeft.bit() | ChannelFlag::FrontRight.bit(),
            LayoutPreset::TwoPointFive => {
                ChannelFlag::FrontLeft.bit()
                    | ChannelFlag::FrontRight.bit()
                    | ChannelFlag::Lfe1.bit()
            }
            LayoutPreset::FivePointFive => {
                ChannelFlag::FrontLeft.bit()
                    | ChannelFlag::FrontRight.bit()
                    | ChannelFlag::RearLeft.bit()
                    | ChannelFlag::RearRight.bit()
                    | ChannelFlag::FrontCentre.bit()
                    | ChannelFlag::Lfe1.bit()
            }
        }
    }
}

/// A set of enabled speaker channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ChannelLayout {
    flags: u32,
}

impl ChannelLayout {
    /// Mono layout.
    pub const MONO: ChannelLayout = ChannelLayout::preset(LayoutPreset::Mono);
    /// Stereo layout.
    pub const STEREO: ChannelLayout = ChannelLayout::preset(LayoutPreset::Stereo);

    /// Creates an empty layout.
    pub const fn empty() -> Self {
        Self { flags: 0 }
    }

    /// Creates a layout from a named preset.
    pub const fn preset(preset: LayoutPreset) -> Self {
        Self {
            flags: preset.bits(),
        }
    }

    /// Creates a layout from a raw bit mask.
    pub const fn from_bits(flags: u32) -> Self {
        Self { flags }
    }

    /// Returns the raw bit mask.
    pub const fn bits(&self) -> u32 {
        self.flags
    }

    /// Enables or disables a single channel.
    pub fn set(&mut self, flag: ChannelFlag, enabled: bool) {
        if enabled {
            self.flags |= flag.bit();
        } else {
            self.flags &= !flag.bit();
        }
    }

    /// Returns a copy with the channel enabled.
    pub fn with(mut self, flag: ChannelFlag) -> Self {
        self.set(flag, true);
        self
    }

    /// Returns true if the channel is enabled.
    pub const fn contains(&self, flag: ChannelFlag) -> bool {
        self.flags & flag.bit() != 0
    }

    /// Returns the number of enabled channels.
    pub const fn count(&self) -> usize {
        self.flags.count_ones() as usize
    }

    /// Returns true if no channel is enabled.
    pub const fn is_empty(&self) -> bool {
        self.flags == 0
    }

    /// Returns the enabled named channels in ascending bit order.
    pub fn enabled(&self) -> Vec<ChannelFlag> {
        ChannelFlag::ALL
            .iter()
            .copied()
            .filter(|f| self.contains(*f))
            .collect()
    }
}

impl From<LayoutPreset> for ChannelLayout {
    fn from(preset: LayoutPreset) -> Self {
        ChannelLayout::preset(preset)
    }
}

impl FromIterator<ChannelFlag> for ChannelLayout {
    fn from_iter<I: IntoIterator<Item = ChannelFlag>>(iter: I) -> Self {
        let mut layout = ChannelLayout::empty();
        for flag in iter {
            layout.set(flag, true);
        }
        layout
    }
}

impl fmt::Display for ChannelLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let enabled = self.enabled();
        if enabled.is_empty() {
            return write!(f, "none");
        }
        let names: Vec<&str> = enabled.iter().map(|c| c.short_name()).collect();
        write!(f, "{}", names.join("|"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stereo_preset() {
        let mut layout = ChannelLayout::preset(LayoutPreset::Stereo);
        assert_eq!(layout.count(), 2);
        assert_eq!(
            layout.enabled(),
            vec![ChannelFlag::FrontLeft, ChannelFlag::FrontRight]
        );

        layout.set(ChannelFlag::FrontRight, false);
        assert_eq!(layout.count(), 1);
        assert!(layout.contains(ChannelFlag::FrontLeft));
        assert!(!layout.contains(ChannelFlag::FrontRight));
    }

    #[test]
    fn test_presets() {
        assert_eq!(ChannelLayout::preset(LayoutPreset::Mono).count(), 1);
        assert_eq!(ChannelLayout::preset(LayoutPreset::TwoPointFive).count(), 3);

        let five = ChannelLayout::preset(LayoutPreset::FivePointFive);
        assert_eq!(five.count(), 6);
        assert_eq!(
            five.enabled(),
            vec![
                ChannelFlag::FrontLeft,
                ChannelFlag::FrontRight,
                ChannelFlag::FrontCentre,
                ChannelFlag::Lfe1,
                ChannelFlag::RearLeft,
                ChannelFlag::RearRight,
            ]
        );
    }

    #[test]
    fn test_clear_only_touches_one_bit() {
        let mut layout = ChannelLayout::preset(LayoutPreset::FivePointFive);
        layout.set(ChannelFlag::Lfe1, false);
        assert_eq!(layout.count(), 5);
        assert!(layout.contains(ChannelFlag::FrontCentre));
        assert!(layout.contains(ChannelFlag::RearLeft));

        // clearing an already clear flag is a no-op
        layout.set(ChannelFlag::Lfe2, false);
        assert_eq!(layout.count(), 5);
    }

    #[test]
    fn test_set_is_idempotent() {
        let mut layout = ChannelLayout::empty();
        layout.set(ChannelFlag::Lfe2, true);
        layout.set(ChannelFlag::Lfe2, true);
        assert_eq!(layout.count(), 1);
        assert_eq!(layout.bits(), 0x0200_0000);
    }

    #[test]
    fn test_all_flags_ascending() {
        for pair in ChannelFlag::ALL.windows(2) {
            assert!(pair[0].bit() < pair[1].bit());
        }
        let all: ChannelLayout = ChannelFlag::ALL.iter().copied().collect();
        assert_eq!(all.count(), 26);
        assert_eq!(all.enabled(), ChannelFlag::ALL.to_vec());
    }

    #[test]
    fn test_unnamed_bits_counted() {
        let layout = ChannelLayout::from_bits(0x8000_0001);
        assert_eq!(layout.count(), 2);
        assert_eq!(layout.enabled(), vec![ChannelFlag::FrontLeft]);
    }

    #[test]
    fn test_display() {
        assert_eq!(ChannelLayout::STEREO.to_string(), "FL|FR");
        assert_eq!(ChannelLayout::empty().to_string(), "none");
        let layout = ChannelLayout::MONO.with(ChannelFlag::Lfe2);
        assert_eq!(layout.to_string(), "FL|LFE2");
    }

    #[test]
    fn test_preset_serde_names() {
        let preset: LayoutPreset = serde_yaml::from_str("\"5.5\"").unwrap();
        assert_eq!(preset, LayoutPreset::FivePointFive);
        let preset: LayoutPreset = serde_yaml::from_str("stereo").unwrap();
        assert_eq!(preset, LayoutPreset::Stereo);
    }
}
