use std::io::Write;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{info, info_span, instrument, warn};

use crate::image_pipeline::{
    common::{
        buffer::PixelBuffer,
        color_math::calculate_cam_to_prophoto,
        error::{PipelineError, Result},
    },
    conversions::{
        timing::PipelineTimings,
        types::{DevelopConfig, DevelopReport},
        validation::validate_input_path,
    },
    debayer::CpuDebayer,
    encode::{ExportFormat, FormatWriter, ImageWriter},
    metering::calculate_auto_exposure_in,
    raw::{RawImageData, RawImageReader, RawLoaderReader},
    render::{ColorPipeline, RenderSettings},
};

/// Decode → validate → demosaic → meter → render → encode.
pub struct DevelopPipeline<R: RawImageReader, W: ImageWriter> {
    reader: R,
    writer: W,
    config: DevelopConfig,
}

impl DevelopPipeline<RawLoaderReader, FormatWriter> {
    pub fn new(config: DevelopConfig) -> Self {
        Self {
            reader: RawLoaderReader,
            writer: FormatWriter,
            config,
        }
    }
}

/// `<out_dir>/<input stem>.<format extension>`
pub fn export_path(input: &Path, out_dir: &Path, format: ExportFormat) -> PathBuf {
    let mut name = input
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| "export".into());
    name.push(".");
    name.push(format.extension());
    out_dir.join(name)
}

impl<R: RawImageReader, W: ImageWriter> DevelopPipeline<R, W> {
    pub fn with_custom(reader: R, writer: W, config: DevelopConfig) -> Self {
        Self {
            reader,
            writer,
            config,
        }
    }

    fn validate_dimensions(&self, width: usize, height: usize) -> Result<()> {
        if !self.config.validate_dimensions {
            return Ok(());
        }

        if width == 0 || height == 0 {
            return Err(PipelineError::InvalidDimensions(width, height));
        }

        if let Some(max) = self.config.max_dimension {
            if width > max || height > max {
                warn!("Image dimensions {}x{} exceed maximum {}", width, height, max);
                return Err(PipelineError::InvalidDimensions(width, height));
            }
        }

        Ok(())
    }

    fn to_buffer(&self, raw_image: &RawImageData) -> Result<PixelBuffer> {
        if self.config.debayer {
            CpuDebayer.process(raw_image)
        } else {
            raw_image.to_pixel_buffer()
        }
    }

    fn render_settings(&self, raw_image: &RawImageData) -> RenderSettings {
        RenderSettings::builder()
            .wb_multipliers(raw_image.wb_multipliers)
            .cam_to_working(calculate_cam_to_prophoto(raw_image.cam_to_xyz.as_deref()))
            .log_curve(self.config.log_curve)
            .tone(self.config.tone)
            .lut(self.config.lut.clone())
            .build()
    }

    /// Develops RAW bytes into `output`.
    pub fn develop(&self, input_data: &[u8], output: &mut dyn Write) -> Result<()> {
        let report = self.develop_with_timings(input_data, output)?;
        info!(
            "Develop complete: {}x{} at {:+.2} EV in {:.3}ms",
            report.width,
            report.height,
            report.exposure_ev,
            report.timings.total_duration().as_secs_f64() * 1000.0
        );
        Ok(())
    }

    #[instrument(skip(self, input_data, output), fields(input_size = input_data.len()))]
    pub fn develop_with_timings(
        &self,
        input_data: &[u8],
        output: &mut dyn Write,
    ) -> Result<DevelopReport> {
        let mut timings = PipelineTimings::new();
        info!("Starting develop");

        let raw_image = timings.time("decode_raw", || {
            let _span = info_span!("decode_raw").entered();
            self.reader.read_raw(input_data)
        })?;

        timings.time("validate_dimensions", || {
            let _span = info_span!(
                "validate_dimensions",
                width = raw_image.width,
                height = raw_image.height
            )
            .entered();
            self.validate_dimensions(raw_image.width, raw_image.height)
        })?;

        let buffer = timings.time("debayer", || {
            let _span = info_span!("debayer", enabled = self.config.debayer).entered();
            self.to_buffer(&raw_image)
        })?;

        let settings = self.render_settings(&raw_image);

        let exposure = if self.config.auto_exposure {
            timings.time("meter", || {
                let _span =
                    info_span!("meter", mode = %self.config.metering_mode).entered();
                calculate_auto_exposure_in(
                    &buffer,
                    self.config.metering_mode,
                    &settings.working_space(),
                )
            })
        } else {
            self.config.tone.exposure
        };
        info!(exposure, auto = self.config.auto_exposure, "Exposure selected");

        let frame = timings.time("render", || {
            let _span = info_span!("render", curve = %self.config.log_curve).entered();
            ColorPipeline::new(settings)
                .with_exposure(exposure)
                .render(&buffer)
        })?;

        timings.time("encode", || {
            let _span = info_span!("encode", format = %self.config.export.format).entered();
            self.writer.write_frame(&frame, output, &self.config.export)
        })?;

        Ok(DevelopReport {
            width: frame.width,
            height: frame.height,
            exposure_ev: exposure,
            timings,
        })
    }

    #[instrument(skip(self, input_path, output_path))]
    pub fn develop_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_path: P,
        output_path: Q,
    ) -> Result<DevelopReport> {
        let input_path = input_path.as_ref();
        let output_path = output_path.as_ref();

        info!(
            input = %input_path.display(),
            output = %output_path.display(),
            "Developing file"
        );

        let mut timings = PipelineTimings::new();

        let input_data = timings.time("read_input_file", || {
            let _span = info_span!("read_input_file").entered();
            validate_input_path(input_path)?;
            std::fs::read(input_path).map_err(|e| {
                PipelineError::InputReadError(format!("{}: {}", input_path.display(), e))
            })
        })?;

        // Encode into memory first so a failed develop leaves no partial file.
        let mut encoded: Vec<u8> = Vec::new();
        let mut report = self.develop_with_timings(&input_data, &mut encoded)?;

        timings.time("write_output_file", || {
            let _span = info_span!("write_output_file").entered();
            std::fs::write(output_path, &encoded).map_err(|e| {
                PipelineError::OutputWriteError(format!("{}: {}", output_path.display(), e))
            })
        })?;

        for step in report.timings.steps() {
            timings.add_step(step.name.clone(), step.duration);
        }
        report.timings = timings;
        Ok(report)
    }

    /// Develops independent files in parallel. Results come back in job order.
    pub fn develop_batch(&self, jobs: &[(PathBuf, PathBuf)]) -> Vec<Result<DevelopReport>>
    where
        R: Sync,
        W: Sync,
    {
        info!(jobs = jobs.len(), "Starting batch develop");
        let results: Vec<Result<DevelopReport>> = jobs
            .par_iter()
            .map(|(input, output)| self.develop_file(input, output))
            .collect();

        let failed = results.iter().filter(|r| r.is_err()).count();
        if failed > 0 {
            warn!(failed, total = jobs.len(), "Batch develop finished with failures");
        } else {
            info!(total = jobs.len(), "Batch develop finished");
        }
        results
    }

    pub fn config(&self) -> &DevelopConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: DevelopConfig) {
        self.config = config;
    }
}
