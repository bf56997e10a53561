use std::io::Cursor;

use tiff::decoder::{Decoder, DecodingResult};
use tiff::tags::Tag;

use crate::image_pipeline::common::error::{ErrorKind, PipelineError};
use crate::image_pipeline::encode::{
    ExportConfig, ExportFormat, FormatWriter, ImageWriter, StandardTiffWriter, StripTiffWriter,
    TiffCompression, convert, encode_frame, strip_tiff_writer,
};
use crate::image_pipeline::render::RenderedFrame;

fn u16_at(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

fn u32_at(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

/// (tag, type, count, value) for every IFD entry.
fn ifd_entries(bytes: &[u8]) -> Vec<(u16, u16, u32, u32)> {
    let ifd = u32_at(bytes, 4) as usize;
    let count = u16_at(bytes, ifd) as usize;
    (0..count)
        .map(|i| {
            let e = ifd + 2 + i * 12;
            (
                u16_at(bytes, e),
                u16_at(bytes, e + 2),
                u32_at(bytes, e + 4),
                u32_at(bytes, e + 8),
            )
        })
        .collect()
}

fn entry_value(bytes: &[u8], tag: u16) -> u32 {
    ifd_entries(bytes)
        .into_iter()
        .find(|e| e.0 == tag)
        .map(|e| e.3)
        .unwrap()
}

/// 2x2 frame stored bottom-up: storage row 0 is the image's bottom row.
fn two_by_two() -> RenderedFrame {
    RenderedFrame {
        width: 2,
        height: 2,
        data: vec![
            // bottom row
            0.0, 0.25, 0.5, 1.0, 1.0, 0.0, 0.0, 1.0, //
            // top row
            0.5, 0.5, 0.5, 1.0, 0.0, 1.0, 0.0, 1.0,
        ],
    }
}

fn frame_of(width: usize, height: usize) -> RenderedFrame {
    let mut data = Vec::with_capacity(width * height * 4);
    for i in 0..width * height {
        let v = (i % 97) as f32 / 96.0;
        data.extend_from_slice(&[v, 1.0 - v, v * 0.5, 1.0]);
    }
    RenderedFrame {
        width,
        height,
        data,
    }
}

#[test]
fn strip_tiff_layout_is_exact() {
    let bytes = encode_frame(&two_by_two(), &ExportConfig::default()).unwrap();

    assert_eq!(&bytes[0..4], &[0x49, 0x49, 0x2A, 0x00]);
    assert_eq!(u32_at(&bytes, 4), 8);
    assert_eq!(u16_at(&bytes, 8), 12);

    let tags: Vec<u16> = ifd_entries(&bytes).iter().map(|e| e.0).collect();
    assert_eq!(
        tags,
        vec![256, 257, 258, 259, 262, 273, 277, 278, 279, 282, 283, 296]
    );
    assert_eq!(u32_at(&bytes, 8 + 2 + 12 * 12), 0);

    // header 8 + IFD 150 + extra 22
    assert_eq!(entry_value(&bytes, 273), 180);
    assert_eq!(entry_value(&bytes, 279), 24);
    assert_eq!(entry_value(&bytes, 258), 158);
    assert_eq!(&bytes[158..164], &[16, 0, 16, 0, 16, 0]);
    assert_eq!(u32_at(&bytes, 164), 300);
    assert_eq!(u32_at(&bytes, 168), 1);
    assert_eq!(u32_at(&bytes, 172), 300);
    assert_eq!(u32_at(&bytes, 176), 1);
    assert_eq!(entry_value(&bytes, 278), 2);
    assert_eq!(entry_value(&bytes, 296), 2);
    assert_eq!(bytes.len(), 180 + 24);
}

#[test]
fn strip_pixels_are_flipped_and_truncated() {
    let bytes = encode_frame(&two_by_two(), &ExportConfig::default()).unwrap();
    let offset = entry_value(&bytes, 273) as usize;
    let pixels: Vec<u16> = (0..12).map(|i| u16_at(&bytes, offset + i * 2)).collect();

    // First output row is the last stored (top) row.
    assert_eq!(
        pixels,
        vec![32767, 32767, 32767, 0, 65535, 0, 0, 16383, 32767, 65535, 0, 0]
    );
    let recovered: Vec<f32> = pixels.iter().map(|&p| p as f32 / 65535.0).collect();
    assert!((recovered[7] - 0.25).abs() < 1.0 / 65535.0);
}

#[test]
fn standard_reader_decodes_strip_tiff() {
    let frame = frame_of(5, 3);
    let config = ExportConfig::builder()
        .description(Some("Arri LogC3".into()))
        .build();
    let bytes = encode_frame(&frame, &config).unwrap();
    assert_eq!(u16_at(&bytes, 8), 13);

    let mut decoder = Decoder::new(Cursor::new(&bytes)).unwrap();
    assert_eq!(decoder.dimensions().unwrap(), (5, 3));
    assert_eq!(
        decoder.get_tag_ascii_string(Tag::ImageDescription).unwrap(),
        "Arri LogC3"
    );
    match decoder.read_image().unwrap() {
        DecodingResult::U16(data) => assert_eq!(data, convert::to_rgb16(&frame).unwrap()),
        _ => panic!("expected 16-bit samples"),
    }
}

#[test]
fn description_layout() {
    let samples = vec![1u16; 3];
    // "Log3G10\0" is 8 bytes: stored after the rationals.
    let bytes = strip_tiff_writer::encode_rgb16(1, 1, &samples, Some("Log3G10")).unwrap();
    let desc = ifd_entries(&bytes).into_iter().find(|e| e.0 == 270).unwrap();
    assert_eq!((desc.1, desc.2), (2, 8));
    assert_eq!(desc.3, 8 + 162 + 22);
    assert_eq!(&bytes[192..200], b"Log3G10\0");
    assert_eq!(entry_value(&bytes, 273), 200);

    // Odd length gets one byte of padding.
    let bytes = strip_tiff_writer::encode_rgb16(1, 1, &samples, Some("S-Log3")).unwrap();
    assert_eq!(entry_value(&bytes, 273), 192 + 8);

    // Four bytes or less sit inside the entry.
    let bytes = strip_tiff_writer::encode_rgb16(1, 1, &samples, Some("abc")).unwrap();
    let desc = ifd_entries(&bytes).into_iter().find(|e| e.0 == 270).unwrap();
    assert_eq!(desc.3.to_le_bytes(), *b"abc\0");
    assert_eq!(entry_value(&bytes, 273), 192);

    // Empty description is the plain 12-entry form.
    let bytes = strip_tiff_writer::encode_rgb16(1, 1, &samples, Some("")).unwrap();
    assert_eq!(u16_at(&bytes, 8), 12);
}

#[test]
fn compressed_tiff_round_trips() {
    let frame = frame_of(16, 9);
    for compression in [TiffCompression::Lzw, TiffCompression::DeflateBalanced] {
        let config = ExportConfig::builder()
            .compression(compression)
            .predictor(Some(2))
            .build();
        let mut bytes: Vec<u8> = Vec::new();
        StandardTiffWriter
            .write_frame(&frame, &mut bytes, &config)
            .unwrap();

        let mut decoder = Decoder::new(Cursor::new(&bytes)).unwrap();
        match decoder.read_image().unwrap() {
            DecodingResult::U16(data) => assert_eq!(data, convert::to_rgb16(&frame).unwrap()),
            _ => panic!("expected 16-bit samples"),
        }
    }
}

#[test]
fn conversion_clamps() {
    let frame = RenderedFrame {
        width: 3,
        height: 1,
        data: vec![
            -1.0, 2.0, f32::NAN, 1.0, //
            0.999_999, 0.25, 0.5, 1.0, //
            1.0, 0.0, 0.0, 0.0,
        ],
    };
    assert_eq!(
        convert::to_rgb16(&frame).unwrap(),
        vec![0, 65535, 0, 65534, 16383, 32767, 65535, 0, 0]
    );
    assert_eq!(
        convert::to_rgba8(&frame).unwrap(),
        vec![0, 255, 0, 255, 254, 63, 127, 255, 255, 0, 0, 0]
    );
    assert_eq!(convert::to_rgb8(&frame).unwrap().len(), 9);
}

#[test]
fn empty_frames_are_rejected() {
    let empty = RenderedFrame {
        width: 0,
        height: 0,
        data: vec![],
    };
    for format in [ExportFormat::Tiff16, ExportFormat::Png] {
        let config = ExportConfig::builder().format(format).build();
        let err = encode_frame(&empty, &config).unwrap_err();
        assert!(matches!(err, PipelineError::EmptyExport));
        assert_eq!(err.kind(), ErrorKind::Input);
    }
    assert!(matches!(
        strip_tiff_writer::encode_rgb16(0, 0, &[], None),
        Err(PipelineError::EmptyExport)
    ));
}

#[test]
fn short_frames_are_rejected() {
    let frame = RenderedFrame {
        width: 4,
        height: 4,
        data: vec![0.5; 10],
    };
    assert!(matches!(
        StripTiffWriter.write_frame(&frame, &mut Vec::<u8>::new(), &ExportConfig::default()),
        Err(PipelineError::InvalidBuffer(_))
    ));
}

#[test]
fn format_lookup() {
    for (key, format) in [
        ("tiff", ExportFormat::Tiff16),
        ("TIF", ExportFormat::Tiff16),
        ("image/tiff", ExportFormat::Tiff16),
        ("png", ExportFormat::Png),
        (".png", ExportFormat::Png),
        ("jpg", ExportFormat::Jpeg),
        ("JPEG", ExportFormat::Jpeg),
        ("image/jpeg", ExportFormat::Jpeg),
        ("webp", ExportFormat::WebP),
        ("image/webp", ExportFormat::WebP),
    ] {
        assert_eq!(key.parse::<ExportFormat>().unwrap(), format, "{}", key);
    }

    let err = "bmp".parse::<ExportFormat>().unwrap_err();
    assert!(matches!(err, PipelineError::UnsupportedFormat(_)));
    assert_eq!(err.kind(), ErrorKind::Configuration);

    assert_eq!(ExportFormat::Jpeg.extension(), "jpg");
    assert!(ExportFormat::Jpeg.is_lossy());
    assert!(!ExportFormat::Png.is_lossy());
    assert!(!ExportFormat::Tiff16.is_raster());
}

#[test]
fn quality_scale() {
    assert_eq!(ExportConfig::default().quality_percent(), 92);
    assert_eq!(ExportConfig::builder().quality(0.0).build().quality_percent(), 1);
    assert_eq!(ExportConfig::builder().quality(3.0).build().quality_percent(), 100);
    assert_eq!(
        ExportConfig::builder().quality(f32::NAN).build().quality_percent(),
        92
    );
}

#[cfg(feature = "raster")]
#[test]
fn raster_formats_produce_their_signatures() {
    let frame = frame_of(8, 8);
    let png = encode_frame(&frame, &ExportConfig::builder().format(ExportFormat::Png).build())
        .unwrap();
    assert_eq!(&png[0..8], b"\x89PNG\r\n\x1a\n");

    let jpeg = encode_frame(
        &frame,
        &ExportConfig::builder()
            .format(ExportFormat::Jpeg)
            .quality(0.8)
            .build(),
    )
    .unwrap();
    assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);

    let webp = encode_frame(&frame, &ExportConfig::builder().format(ExportFormat::WebP).build())
        .unwrap();
    assert_eq!(&webp[0..4], b"RIFF");
    assert_eq!(&webp[8..12], b"WEBP");
}

#[cfg(feature = "raster")]
#[test]
fn png_keeps_row_order() {
    let bytes = encode_frame(
        &two_by_two(),
        &ExportConfig::builder().format(ExportFormat::Png).build(),
    )
    .unwrap();
    let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
    assert_eq!(decoded.get_pixel(0, 0).0, [127, 127, 127, 255]);
    assert_eq!(decoded.get_pixel(1, 1).0, [255, 0, 0, 255]);
}

#[cfg(not(feature = "raster"))]
#[test]
fn raster_formats_need_backend() {
    let config = ExportConfig::builder().format(ExportFormat::Png).build();
    let err = encode_frame(&two_by_two(), &config).unwrap_err();
    assert!(matches!(err, PipelineError::BackendUnavailable(_)));
    assert_eq!(err.kind(), ErrorKind::Capability);
}

#[test]
fn format_writer_dispatches_on_compression() {
    let frame = frame_of(4, 4);
    let mut plain: Vec<u8> = Vec::new();
    FormatWriter
        .write_frame(&frame, &mut plain, &ExportConfig::default())
        .unwrap();
    let mut lzw: Vec<u8> = Vec::new();
    FormatWriter
        .write_frame(
            &frame,
            &mut lzw,
            &ExportConfig::builder()
                .compression(TiffCompression::Lzw)
                .build(),
        )
        .unwrap();
    assert_eq!(plain.len(), 180 + 4 * 4 * 6);
    assert_ne!(plain, lzw);
}
