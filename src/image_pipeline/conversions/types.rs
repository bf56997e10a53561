//! Develop configuration types

use std::sync::Arc;

use crate::image_pipeline::color::LogCurve;
use crate::image_pipeline::conversions::timing::PipelineTimings;
use crate::image_pipeline::encode::ExportConfig;
use crate::image_pipeline::lut::Lut3D;
use crate::image_pipeline::metering::MeteringMode;
use crate::image_pipeline::render::ToneParameters;

/// Configuration for developing a RAW file into an exported image
#[derive(Debug, Clone)]
pub struct DevelopConfig {
    /// Meter the decoded image and use the result as the exposure
    pub auto_exposure: bool,
    pub metering_mode: MeteringMode,
    pub log_curve: LogCurve,
    /// Shared read-only across batch jobs
    pub lut: Option<Arc<Lut3D>>,
    /// `tone.exposure` is replaced by the metered value when `auto_exposure` is set
    pub tone: ToneParameters,
    pub export: ExportConfig,
    /// Demosaic CFA data to RGB (false renders the mosaic as grayscale)
    pub debayer: bool,
    /// Whether to validate image dimensions before rendering
    pub validate_dimensions: bool,
    pub max_dimension: Option<usize>,
}

impl Default for DevelopConfig {
    fn default() -> Self {
        Self {
            auto_exposure: true,
            metering_mode: MeteringMode::Hybrid,
            log_curve: LogCurve::ArriLogC3,
            lut: None,
            tone: ToneParameters::default(),
            export: ExportConfig::default(),
            debayer: true,
            validate_dimensions: true,
            max_dimension: Some(50000),
        }
    }
}

impl DevelopConfig {
    pub fn builder() -> DevelopConfigBuilder {
        DevelopConfigBuilder::default()
    }
}

/// Builder for DevelopConfig
#[derive(Default)]
pub struct DevelopConfigBuilder {
    auto_exposure: Option<bool>,
    metering_mode: Option<MeteringMode>,
    log_curve: Option<LogCurve>,
    lut: Option<Option<Arc<Lut3D>>>,
    tone: Option<ToneParameters>,
    export: Option<ExportConfig>,
    debayer: Option<bool>,
    validate_dimensions: Option<bool>,
    max_dimension: Option<Option<usize>>,
}

impl DevelopConfigBuilder {
    pub fn auto_exposure(mut self, enable: bool) -> Self {
        self.auto_exposure = Some(enable);
        self
    }

    pub fn metering_mode(mut self, mode: MeteringMode) -> Self {
        self.metering_mode = Some(mode);
        self
    }

    pub fn log_curve(mut self, curve: LogCurve) -> Self {
        self.log_curve = Some(curve);
        self
    }

    pub fn lut(mut self, lut: Option<Arc<Lut3D>>) -> Self {
        self.lut = Some(lut);
        self
    }

    pub fn tone(mut self, tone: ToneParameters) -> Self {
        self.tone = Some(tone);
        self
    }

    pub fn export(mut self, export: ExportConfig) -> Self {
        self.export = Some(export);
        self
    }

    pub fn debayer(mut self, enable: bool) -> Self {
        self.debayer = Some(enable);
        self
    }

    pub fn validate_dimensions(mut self, validate: bool) -> Self {
        self.validate_dimensions = Some(validate);
        self
    }

    pub fn max_dimension(mut self, max: Option<usize>) -> Self {
        self.max_dimension = Some(max);
        self
    }

    pub fn build(self) -> DevelopConfig {
        let default = DevelopConfig::default();
        DevelopConfig {
            auto_exposure: self.auto_exposure.unwrap_or(default.auto_exposure),
            metering_mode: self.metering_mode.unwrap_or(default.metering_mode),
            log_curve: self.log_curve.unwrap_or(default.log_curve),
            lut: self.lut.unwrap_or(default.lut),
            tone: self.tone.unwrap_or(default.tone),
            export: self.export.unwrap_or(default.export),
            debayer: self.debayer.unwrap_or(default.debayer),
            validate_dimensions: self.validate_dimensions.unwrap_or(default.validate_dimensions),
            max_dimension: self.max_dimension.unwrap_or(default.max_dimension),
        }
    }
}

/// What one develop produced.
#[derive(Debug, Clone)]
pub struct DevelopReport {
    pub width: usize,
    pub height: usize,
    /// Exposure the render used, metered or configured
    pub exposure_ev: f32,
    pub timings: PipelineTimings,
}
