//! Camera log transfer functions.
//!
//! Each curve maps scene-linear light to its encoded signal, one channel at a
//! time. Constants are the vendor-published ones; Canon curves take
//! reflectance input and are normalised by 0.9 first.

use std::fmt;
use std::str::FromStr;

use tracing::warn;

use crate::image_pipeline::color::gamut::TargetGamut;

/// Selectable log encoding. The discriminant is the wire index used by
/// [`LogCurve::from_index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LogCurve {
    /// ARRI LogC3, EI 800.
    #[default]
    ArriLogC3 = 0,
    FLog = 1,
    FLog2 = 2,
    SLog3 = 3,
    VLog = 4,
    CanonLog2 = 5,
    CanonLog3 = 6,
    NLog = 7,
    DLog = 8,
    Log3G10 = 9,
    /// Plain sRGB OETF, no log encoding.
    None = 10,
}

pub const ALL_CURVES: [LogCurve; 11] = [
    LogCurve::ArriLogC3,
    LogCurve::FLog,
    LogCurve::FLog2,
    LogCurve::SLog3,
    LogCurve::VLog,
    LogCurve::CanonLog2,
    LogCurve::CanonLog3,
    LogCurve::NLog,
    LogCurve::DLog,
    LogCurve::Log3G10,
    LogCurve::None,
];

mod arri {
    pub const CUT: f32 = 0.010591;
    pub const A: f32 = 5.555556;
    pub const B: f32 = 0.052272;
    pub const C: f32 = 0.247190;
    pub const D: f32 = 0.385537;
    pub const E: f32 = 5.367655;
    pub const F: f32 = 0.092809;
}

mod flog {
    pub const CUT1: f32 = 0.00089;
    pub const CUT2: f32 = 0.100537775223865;
    pub const A: f32 = 0.555556;
    pub const B: f32 = 0.009468;
    pub const C: f32 = 0.344676;
    pub const D: f32 = 0.790453;
    pub const E: f32 = 8.735631;
    pub const F: f32 = 0.092864;
}

mod flog2 {
    pub const CUT1: f32 = 0.000889;
    pub const CUT2: f32 = 0.100686685370811;
    pub const A: f32 = 5.555556;
    pub const B: f32 = 0.064829;
    pub const C: f32 = 0.245281;
    pub const D: f32 = 0.384316;
    pub const E: f32 = 8.799461;
    pub const F: f32 = 0.092864;
}

mod slog3 {
    pub const CUT: f32 = 0.01125;
    pub const CODE_CUT: f32 = 171.2102946929;
}

mod vlog {
    pub const CUT1: f32 = 0.01;
    pub const CUT2: f32 = 0.181;
    pub const B: f32 = 0.00873;
    pub const C: f32 = 0.241514;
    pub const D: f32 = 0.598206;
}

mod canon {
    pub const REFLECTION: f32 = 0.9;

    pub const LOG2_SLOPE: f32 = 0.24136077;
    pub const LOG2_GAIN: f32 = 87.09937546;
    pub const LOG2_OFFSET: f32 = 0.092864125;

    pub const LOG3_CUT: f32 = 0.014;
    pub const LOG3_SLOPE: f32 = 0.42889912;
    pub const LOG3_GAIN: f32 = 14.98325;
    pub const LOG3_LOW_OFFSET: f32 = 0.07623209;
    pub const LOG3_HIGH_OFFSET: f32 = 0.069886632;
    pub const LOG3_LINEAR_SLOPE: f32 = 2.3069815;
    pub const LOG3_LINEAR_OFFSET: f32 = 0.073059361;
    pub const LOG3_CODE_LOW: f32 = 0.04076162;
    pub const LOG3_CODE_HIGH: f32 = 0.105357102;
}

mod nlog {
    pub const CUT1: f32 = 0.328;
    pub const CUT2: f32 = 452.0;
    pub const A: f32 = 650.0;
    pub const B: f32 = 0.0075;
    pub const C: f32 = 150.0;
    pub const D: f32 = 619.0;
}

mod dlog {
    pub const LIN_CUT: f32 = 0.0078;
    pub const LOG_CUT: f32 = 0.14;
    pub const A: f32 = 6.025;
    pub const B: f32 = 0.0929;
    pub const C: f32 = 0.9892;
    pub const D: f32 = 0.0108;
    pub const E: f32 = 0.256663;
    pub const F: f32 = 0.584555;
}

mod log3g10 {
    pub const A: f32 = 0.224282;
    pub const B: f32 = 155.975327;
    pub const C: f32 = 0.01;
    pub const G: f32 = 15.1927;
}

const CODE_MAX: f32 = 1023.0;

impl LogCurve {
    /// Maps a wire index to a curve. Out-of-table indices fall back to
    /// [`LogCurve::ArriLogC3`].
    pub fn from_index(index: i32) -> Self {
        usize::try_from(index)
            .ok()
            .and_then(|i| ALL_CURVES.get(i).copied())
            .unwrap_or_else(|| {
                warn!(index, "Unknown log curve index, using Arri LogC3");
                LogCurve::ArriLogC3
            })
    }

    pub fn index(self) -> i32 {
        self as i32
    }

    pub fn name(self) -> &'static str {
        match self {
            LogCurve::ArriLogC3 => "Arri LogC3",
            LogCurve::FLog => "F-Log",
            LogCurve::FLog2 => "F-Log2",
            LogCurve::SLog3 => "S-Log3",
            LogCurve::VLog => "V-Log",
            LogCurve::CanonLog2 => "Canon Log 2",
            LogCurve::CanonLog3 => "Canon Log 3",
            LogCurve::NLog => "N-Log",
            LogCurve::DLog => "D-Log",
            LogCurve::Log3G10 => "Log3G10",
            LogCurve::None => "None (sRGB)",
        }
    }

    /// The gamut this curve is normally paired with.
    pub fn target_gamut(self) -> TargetGamut {
        match self {
            LogCurve::ArriLogC3 => TargetGamut::AlexaWideGamut,
            LogCurve::FLog | LogCurve::FLog2 => TargetGamut::FGamut,
            LogCurve::SLog3 => TargetGamut::SGamut3Cine,
            LogCurve::VLog => TargetGamut::VGamut,
            LogCurve::CanonLog2 | LogCurve::CanonLog3 => TargetGamut::CinemaGamut,
            LogCurve::NLog => TargetGamut::Rec2020,
            LogCurve::DLog => TargetGamut::DGamut,
            LogCurve::Log3G10 => TargetGamut::RedWideGamutRgb,
            LogCurve::None => TargetGamut::Rec709,
        }
    }

    /// Linear-domain input at which the curve switches segment.
    pub fn linear_cut(self) -> f32 {
        match self {
            LogCurve::ArriLogC3 => arri::CUT,
            LogCurve::FLog => flog::CUT1,
            LogCurve::FLog2 => flog2::CUT1,
            LogCurve::SLog3 => slog3::CUT,
            LogCurve::VLog => vlog::CUT1,
            LogCurve::CanonLog2 => 0.0,
            LogCurve::CanonLog3 => canon::LOG3_CUT * canon::REFLECTION,
            LogCurve::NLog => nlog::CUT1,
            LogCurve::DLog => dlog::LIN_CUT,
            LogCurve::Log3G10 => -log3g10::C,
            LogCurve::None => 0.0031308,
        }
    }

    /// Scene-linear → encoded.
    pub fn encode(self, x: f32) -> f32 {
        match self {
            LogCurve::ArriLogC3 => {
                use arri::*;
                if x > CUT {
                    C * (A * x + B).log10() + D
                } else {
                    E * x + F
                }
            }
            LogCurve::FLog => {
                use flog::*;
                if x >= CUT1 {
                    C * (A * x + B).log10() + D
                } else {
                    E * x + F
                }
            }
            LogCurve::FLog2 => {
                use flog2::*;
                if x >= CUT1 {
                    C * (A * x + B).log10() + D
                } else {
                    E * x + F
                }
            }
            LogCurve::SLog3 => {
                use slog3::*;
                if x >= CUT {
                    (420.0 + ((x + 0.01) / (0.18 + 0.01)).log10() * 261.5) / CODE_MAX
                } else {
                    (x * (CODE_CUT - 95.0) / CUT + 95.0) / CODE_MAX
                }
            }
            LogCurve::VLog => {
                use vlog::*;
                if x < CUT1 {
                    5.6 * x + 0.125
                } else {
                    C * (x + B).log10() + D
                }
            }
            LogCurve::CanonLog2 => {
                use canon::*;
                let x = x / REFLECTION;
                if x < 0.0 {
                    -LOG2_SLOPE * (-x * LOG2_GAIN + 1.0).log10() + LOG2_OFFSET
                } else {
                    LOG2_SLOPE * (x * LOG2_GAIN + 1.0).log10() + LOG2_OFFSET
                }
            }
            LogCurve::CanonLog3 => {
                use canon::*;
                let x = x / REFLECTION;
                if x < -LOG3_CUT {
                    -LOG3_SLOPE * (-x * LOG3_GAIN + 1.0).log10() + LOG3_LOW_OFFSET
                } else if x <= LOG3_CUT {
                    LOG3_LINEAR_SLOPE * x + LOG3_LINEAR_OFFSET
                } else {
                    LOG3_SLOPE * (x * LOG3_GAIN + 1.0).log10() + LOG3_HIGH_OFFSET
                }
            }
            LogCurve::NLog => {
                use nlog::*;
                // Upper segment is a natural log, unlike every other curve here.
                if x < CUT1 {
                    A * (x + B).cbrt() / CODE_MAX
                } else {
                    (C * x.ln() + D) / CODE_MAX
                }
            }
            LogCurve::DLog => {
                use dlog::*;
                if x <= LIN_CUT {
                    A * x + B
                } else {
                    (x * C + D).log10() * E + F
                }
            }
            LogCurve::Log3G10 => {
                use log3g10::*;
                let x = x + C;
                if x < 0.0 {
                    x * G
                } else {
                    A * (x * B + 1.0).log10()
                }
            }
            LogCurve::None => {
                if x <= 0.0031308 {
                    x * 12.92
                } else {
                    1.055 * x.powf(1.0 / 2.4) - 0.055
                }
            }
        }
    }

    /// Encoded → scene-linear.
    pub fn decode(self, y: f32) -> f32 {
        match self {
            LogCurve::ArriLogC3 => {
                use arri::*;
                if y > E * CUT + F {
                    (10.0f32.powf((y - D) / C) - B) / A
                } else {
                    (y - F) / E
                }
            }
            LogCurve::FLog => {
                use flog::*;
                if y >= CUT2 {
                    (10.0f32.powf((y - D) / C) - B) / A
                } else {
                    (y - F) / E
                }
            }
            LogCurve::FLog2 => {
                use flog2::*;
                if y >= CUT2 {
                    (10.0f32.powf((y - D) / C) - B) / A
                } else {
                    (y - F) / E
                }
            }
            LogCurve::SLog3 => {
                use slog3::*;
                let code = y * CODE_MAX;
                if code >= CODE_CUT {
                    10.0f32.powf((code - 420.0) / 261.5) * (0.18 + 0.01) - 0.01
                } else {
                    (code - 95.0) * CUT / (CODE_CUT - 95.0)
                }
            }
            LogCurve::VLog => {
                use vlog::*;
                if y < CUT2 {
                    (y - 0.125) / 5.6
                } else {
                    10.0f32.powf((y - D) / C) - B
                }
            }
            LogCurve::CanonLog2 => {
                use canon::*;
                let x = if y < LOG2_OFFSET {
                    -(10.0f32.powf((LOG2_OFFSET - y) / LOG2_SLOPE) - 1.0) / LOG2_GAIN
                } else {
                    (10.0f32.powf((y - LOG2_OFFSET) / LOG2_SLOPE) - 1.0) / LOG2_GAIN
                };
                x * REFLECTION
            }
            LogCurve::CanonLog3 => {
                use canon::*;
                let x = if y < LOG3_CODE_LOW {
                    -(10.0f32.powf((LOG3_LOW_OFFSET - y) / LOG3_SLOPE) - 1.0) / LOG3_GAIN
                } else if y <= LOG3_CODE_HIGH {
                    (y - LOG3_LINEAR_OFFSET) / LOG3_LINEAR_SLOPE
                } else {
                    (10.0f32.powf((y - LOG3_HIGH_OFFSET) / LOG3_SLOPE) - 1.0) / LOG3_GAIN
                };
                x * REFLECTION
            }
            LogCurve::NLog => {
                use nlog::*;
                let code = y * CODE_MAX;
                if code < CUT2 {
                    (code / A).powi(3) - B
                } else {
                    ((code - D) / C).exp()
                }
            }
            LogCurve::DLog => {
                use dlog::*;
                if y <= LOG_CUT {
                    (y - B) / A
                } else {
                    (10.0f32.powf((y - F) / E) - D) / C
                }
            }
            LogCurve::Log3G10 => {
                use log3g10::*;
                if y < 0.0 {
                    y / G - C
                } else {
                    (10.0f32.powf(y / A) - 1.0) / B - C
                }
            }
            LogCurve::None => {
                if y <= 0.04045 {
                    y / 12.92
                } else {
                    ((y + 0.055) / 1.055).powf(2.4)
                }
            }
        }
    }

    #[inline]
    pub fn encode_rgb(self, rgb: [f32; 3]) -> [f32; 3] {
        [self.encode(rgb[0]), self.encode(rgb[1]), self.encode(rgb[2])]
    }

    #[inline]
    pub fn decode_rgb(self, rgb: [f32; 3]) -> [f32; 3] {
        [self.decode(rgb[0]), self.decode(rgb[1]), self.decode(rgb[2])]
    }
}

impl fmt::Display for LogCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LogCurve {
    type Err = std::convert::Infallible;

    /// Matches display names loosely (case, spaces, dashes ignored). Unknown
    /// names fall back to Arri LogC3 like unknown indices do.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        let curve = match key.as_str() {
            "arrilogc3" | "logc3" | "logc" => LogCurve::ArriLogC3,
            "flog" => LogCurve::FLog,
            "flog2" => LogCurve::FLog2,
            "slog3" => LogCurve::SLog3,
            "vlog" => LogCurve::VLog,
            "canonlog2" | "clog2" => LogCurve::CanonLog2,
            "canonlog3" | "clog3" => LogCurve::CanonLog3,
            "nlog" => LogCurve::NLog,
            "dlog" => LogCurve::DLog,
            "log3g10" => LogCurve::Log3G10,
            "none" | "srgb" | "nonesrgb" => LogCurve::None,
            _ => {
                warn!(name = s, "Unknown log curve name, using Arri LogC3");
                LogCurve::ArriLogC3
            }
        };
        Ok(curve)
    }
}
