use std::io::Write;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::encode::types::ExportConfig;
use crate::image_pipeline::render::RenderedFrame;

pub trait ImageWriter {
    fn write_frame(
        &self,
        frame: &RenderedFrame,
        output: &mut dyn Write,
        config: &ExportConfig,
    ) -> Result<()>;
}
