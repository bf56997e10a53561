use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, bail};
use raw_alchemy_rs::image_pipeline::encode::RasterWriter;
use raw_alchemy_rs::image_pipeline::{
    DevelopConfig, DevelopPipeline, ExportConfig, ExportFormat, LogCurve, MeteringMode,
    load_cube_file,
};
use raw_alchemy_rs::logger;

use tracing::{error, info, warn};

const USAGE: &str =
    "usage: raw_alchemy <input.raw> <output.{tif,png,jpg,webp}> [--lut FILE.cube] [--curve NAME] [--metering MODE]";

struct Args {
    input: PathBuf,
    output: PathBuf,
    lut: Option<PathBuf>,
    curve: LogCurve,
    metering: MeteringMode,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut positional = Vec::new();
    let mut lut = None;
    let mut curve = LogCurve::default();
    let mut metering = MeteringMode::default();

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--lut" => lut = Some(PathBuf::from(args.next().context(USAGE)?)),
            "--curve" => curve = args.next().context(USAGE)?.parse()?,
            "--metering" => metering = args.next().context(USAGE)?.parse()?,
            _ => positional.push(PathBuf::from(arg)),
        }
    }

    let [input, output]: [PathBuf; 2] = match positional.try_into() {
        Ok(paths) => paths,
        Err(_) => bail!(USAGE),
    };
    Ok(Args {
        input,
        output,
        lut,
        curve,
        metering,
    })
}

fn format_for(output: &Path) -> anyhow::Result<ExportFormat> {
    let ext = output
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("tif");
    let format: ExportFormat = ext
        .parse()
        .with_context(|| format!("cannot export to {}", output.display()))?;
    if format.is_raster() && !RasterWriter::available() {
        warn!("{} export not compiled in, writing 16-bit TIFF", format);
        return Ok(ExportFormat::Tiff16);
    }
    Ok(format)
}

fn main() -> anyhow::Result<()> {
    logger::init();

    info!("Starting raw_alchemy...");

    let args = parse_args()?;

    let lut = match &args.lut {
        Some(path) => Some(Arc::new(
            load_cube_file(path).with_context(|| format!("loading LUT {}", path.display()))?,
        )),
        None => None,
    };

    let export = ExportConfig::builder()
        .format(format_for(&args.output)?)
        .description(Some(args.curve.name().to_string()))
        .build();
    let config = DevelopConfig::builder()
        .log_curve(args.curve)
        .metering_mode(args.metering)
        .lut(lut)
        .export(export)
        .build();
    let pipeline = DevelopPipeline::new(config);

    info!("Log curve: {}", pipeline.config().log_curve);
    info!("Metering: {}", pipeline.config().metering_mode);
    info!("Export: {}", pipeline.config().export.format);

    match pipeline.develop_file(&args.input, &args.output) {
        Ok(report) => {
            info!(
                "Develop successful: {}x{} at {:+.2} EV",
                report.width, report.height, report.exposure_ev
            );
            report.timings.log_summary();
            Ok(())
        }
        Err(e) => {
            error!("Develop failed: {}", e);
            Err(e).with_context(|| format!("developing {}", args.input.display()))
        }
    }
}
