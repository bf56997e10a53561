//! Linear ProPhoto RGB (D50) → camera target gamut matrices.
//!
//! Alexa Wide Gamut keeps the long-standing hardcoded matrix so existing
//! renders stay bit-identical. The others are derived from the published
//! primaries with Bradford D50→D65 adaptation.

use crate::image_pipeline::common::color_math::Matrix3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetGamut {
    AlexaWideGamut,
    FGamut,
    SGamut3Cine,
    VGamut,
    CinemaGamut,
    Rec2020,
    DGamut,
    RedWideGamutRgb,
    Rec709,
}

const PROPHOTO_TO_ALEXA_WIDE_GAMUT: Matrix3 = [
    0.840705, 0.160166, -0.000871,
    -0.007699, 1.011893, -0.004194,
    -0.003975, -0.004652, 0.830626,
];

// F-Gamut and N-Gamut share the BT.2020 primaries.
const PROPHOTO_TO_REC2020: Matrix3 = [
    1.200651, -0.057564, -0.143087,
    -0.069943, 1.080628, -0.010685,
    0.005542, -0.040783, 1.035241,
];

const PROPHOTO_TO_SGAMUT3_CINE: Matrix3 = [
    1.253442, -0.165245, -0.088197,
    0.002921, 0.848658, 0.148421,
    0.038466, 0.004562, 0.956972,
];

const PROPHOTO_TO_VGAMUT: Matrix3 = [
    1.115886, -0.042520, -0.073367,
    -0.028546, 0.936794, 0.091751,
    0.012850, -0.008167, 0.995317,
];

const PROPHOTO_TO_CINEMA_GAMUT: Matrix3 = [
    1.055123, -0.016792, -0.038331,
    -0.007041, 0.848508, 0.158532,
    0.009332, 0.140472, 0.850196,
];

const PROPHOTO_TO_DGAMUT: Matrix3 = [
    1.187455, -0.111519, -0.075936,
    -0.081427, 0.924360, 0.157066,
    0.015813, 0.052002, 0.932185,
];

const PROPHOTO_TO_RED_WIDE_GAMUT: Matrix3 = [
    1.019268, 0.034269, -0.053537,
    -0.020434, 0.866164, 0.154270,
    0.051471, 0.191714, 0.756815,
];

const PROPHOTO_TO_REC709: Matrix3 = [
    2.034368, -0.727634, -0.306733,
    -0.228827, 1.231753, -0.002927,
    -0.008558, -0.153268, 1.161827,
];

impl TargetGamut {
    pub fn name(self) -> &'static str {
        match self {
            TargetGamut::AlexaWideGamut => "ARRI Wide Gamut 3",
            TargetGamut::FGamut => "F-Gamut",
            TargetGamut::SGamut3Cine => "S-Gamut3.Cine",
            TargetGamut::VGamut => "V-Gamut",
            TargetGamut::CinemaGamut => "Cinema Gamut",
            TargetGamut::Rec2020 => "ITU-R BT.2020",
            TargetGamut::DGamut => "DJI D-Gamut",
            TargetGamut::RedWideGamutRgb => "REDWideGamutRGB",
            TargetGamut::Rec709 => "sRGB / BT.709",
        }
    }

    /// Row-major matrix taking linear ProPhoto RGB into this gamut.
    pub fn from_prophoto(self) -> Matrix3 {
        match self {
            TargetGamut::AlexaWideGamut => PROPHOTO_TO_ALEXA_WIDE_GAMUT,
            TargetGamut::FGamut | TargetGamut::Rec2020 => PROPHOTO_TO_REC2020,
            TargetGamut::SGamut3Cine => PROPHOTO_TO_SGAMUT3_CINE,
            TargetGamut::VGamut => PROPHOTO_TO_VGAMUT,
            TargetGamut::CinemaGamut => PROPHOTO_TO_CINEMA_GAMUT,
            TargetGamut::DGamut => PROPHOTO_TO_DGAMUT,
            TargetGamut::RedWideGamutRgb => PROPHOTO_TO_RED_WIDE_GAMUT,
            TargetGamut::Rec709 => PROPHOTO_TO_REC709,
        }
    }
}
