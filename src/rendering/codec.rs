use crate::error::CodecError;
use crate::models::OutputConfig;
use image::codecs::bmp::BmpEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::tga::TgaEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageReader};
use raster_ops::PixelBuffer;
use std::io::Cursor;
use std::path::Path;

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// On-disk formats the codec can write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFormat {
    #[default]
    Png,
    Jpeg,
    Bmp,
    Tga,
}

impl ImageFormat {
    /// Infer the format from a file extension (case-insensitive).
    ///
    /// Unknown or missing extensions mean PNG.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("jpg") | Some("jpeg") => ImageFormat::Jpeg,
            Some("bmp") => ImageFormat::Bmp,
            Some("tga") => ImageFormat::Tga,
            _ => ImageFormat::Png,
        }
    }

    fn image_format(self) -> image::ImageFormat {
        match self {
            ImageFormat::Png => image::ImageFormat::Png,
            ImageFormat::Jpeg => image::ImageFormat::Jpeg,
            ImageFormat::Bmp => image::ImageFormat::Bmp,
            ImageFormat::Tga => image::ImageFormat::Tga,
        }
    }
}

/// Turns image files into [`PixelBuffer`]s and back.
///
/// PNG goes through the `png` crate so gray, gray+alpha, RGB and RGBA files
/// keep their channel count. JPEG, BMP and TGA go through `image`.
#[derive(Debug, Clone)]
pub struct Codec {
    jpeg_quality: u8,
}

impl Default for Codec {
    fn default() -> Self {
        Self::new(&OutputConfig::default())
    }
}

impl Codec {
    pub fn new(output: &OutputConfig) -> Self {
        Self {
            jpeg_quality: output.jpeg_quality.clamp(1, 100),
        }
    }

    pub fn jpeg_quality(&self) -> u8 {
        self.jpeg_quality
    }

    /// Read and decode an image file.
    pub fn decode(&self, path: impl AsRef<Path>) -> Result<PixelBuffer, CodecError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| CodecError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        // TGA has no magic number, so the extension is the only hint
        let hint = ImageFormat::from_path(path);
        let buffer = self.decode_bytes(&bytes, hint)?;
        tracing::debug!(
            path = %path.display(),
            width = buffer.width(),
            height = buffer.height(),
            channels = buffer.channels(),
            "Decoded image"
        );
        Ok(buffer)
    }

    /// Decode an in-memory file. `hint` is used only when the bytes do not
    /// identify their own format.
    pub fn decode_bytes(&self, bytes: &[u8], hint: ImageFormat) -> Result<PixelBuffer, CodecError> {
        if bytes.starts_with(&PNG_SIGNATURE) {
            return decode_png(bytes);
        }

        let mut reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| CodecError::Image(image::ImageError::IoError(e)))?;
        if reader.format().is_none() {
            reader.set_format(hint.image_format());
        }
        from_dynamic(reader.decode()?)
    }

    /// Encode `buffer` to `path`, choosing the format from the extension.
    pub fn encode(&self, buffer: &PixelBuffer, path: impl AsRef<Path>) -> Result<(), CodecError> {
        let path = path.as_ref();
        self.encode_as(buffer, path, ImageFormat::from_path(path))
    }

    /// Encode `buffer` to `path` in an explicit format.
    pub fn encode_as(
        &self,
        buffer: &PixelBuffer,
        path: impl AsRef<Path>,
        format: ImageFormat,
    ) -> Result<(), CodecError> {
        let path = path.as_ref();
        let bytes = self.encode_to_vec(buffer, format)?;
        std::fs::write(path, &bytes).map_err(|source| CodecError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(
            path = %path.display(),
            format = ?format,
            bytes = bytes.len(),
            "Wrote image"
        );
        Ok(())
    }

    /// Encode `buffer` into an in-memory file.
    pub fn encode_to_vec(
        &self,
        buffer: &PixelBuffer,
        format: ImageFormat,
    ) -> Result<Vec<u8>, CodecError> {
        let (width, height) = dimensions(buffer)?;
        let mut out = Cursor::new(Vec::new());

        match format {
            ImageFormat::Png => encode_png(&mut out, buffer, width, height)?,
            ImageFormat::Bmp => BmpEncoder::new(&mut out).write_image(
                buffer.data(),
                width,
                height,
                color_type(buffer.channels()),
            )?,
            ImageFormat::Tga => TgaEncoder::new(&mut out).write_image(
                buffer.data(),
                width,
                height,
                color_type(buffer.channels()),
            )?,
            ImageFormat::Jpeg => {
                // JPEG has no alpha channel
                let (data, kind) = strip_alpha(buffer);
                JpegEncoder::new_with_quality(&mut out, self.jpeg_quality)
                    .write_image(&data, width, height, kind)?;
            }
        }

        Ok(out.into_inner())
    }
}

fn dimensions(buffer: &PixelBuffer) -> Result<(u32, u32), CodecError> {
    let too_large = || CodecError::Dimensions {
        width: buffer.width(),
        height: buffer.height(),
    };
    let width = u32::try_from(buffer.width()).map_err(|_| too_large())?;
    let height = u32::try_from(buffer.height()).map_err(|_| too_large())?;
    Ok((width, height))
}

fn color_type(channels: usize) -> ExtendedColorType {
    match channels {
        1 => ExtendedColorType::L8,
        2 => ExtendedColorType::La8,
        3 => ExtendedColorType::Rgb8,
        _ => ExtendedColorType::Rgba8,
    }
}

/// Drop the alpha channel of gray+alpha and RGBA buffers.
fn strip_alpha(buffer: &PixelBuffer) -> (Vec<u8>, ExtendedColorType) {
    let channels = buffer.channels();
    let keep = buffer.color_channels();
    if keep == channels {
        return (buffer.data().to_vec(), color_type(channels));
    }

    let data = buffer
        .data()
        .chunks_exact(channels)
        .flat_map(|px| px[..keep].iter().copied())
        .collect();
    (data, color_type(keep))
}

fn decode_png(bytes: &[u8]) -> Result<PixelBuffer, CodecError> {
    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    // Palette -> RGB(A), 16-bit -> 8-bit, sub-byte gray -> 8-bit
    decoder.set_transformations(png::Transformations::normalize_to_color8());
    let mut reader = decoder
        .read_info()
        .map_err(|e| CodecError::PngDecode(e.to_string()))?;

    let mut data = vec![0; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut data)
        .map_err(|e| CodecError::PngDecode(e.to_string()))?;
    data.truncate(info.buffer_size());

    let channels = match info.color_type {
        png::ColorType::Grayscale => 1,
        png::ColorType::GrayscaleAlpha => 2,
        png::ColorType::Rgb => 3,
        png::ColorType::Rgba => 4,
        other => {
            return Err(CodecError::UnsupportedLayout(format!(
                "PNG color type {other:?}"
            )))
        }
    };
    if info.bit_depth != png::BitDepth::Eight {
        return Err(CodecError::UnsupportedLayout(format!(
            "PNG bit depth {:?}",
            info.bit_depth
        )));
    }

    Ok(PixelBuffer::from_raw(
        info.width as usize,
        info.height as usize,
        channels,
        data,
    )?)
}

fn encode_png<W: std::io::Write>(
    out: W,
    buffer: &PixelBuffer,
    width: u32,
    height: u32,
) -> Result<(), CodecError> {
    let color = match buffer.channels() {
        1 => png::ColorType::Grayscale,
        2 => png::ColorType::GrayscaleAlpha,
        3 => png::ColorType::Rgb,
        _ => png::ColorType::Rgba,
    };

    let mut encoder = png::Encoder::new(out, width, height);
    encoder.set_color(color);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder
        .write_header()
        .map_err(|e| CodecError::PngEncode(e.to_string()))?;
    writer
        .write_image_data(buffer.data())
        .map_err(|e| CodecError::PngEncode(e.to_string()))?;
    writer
        .finish()
        .map_err(|e| CodecError::PngEncode(e.to_string()))?;
    Ok(())
}

/// Map whatever `image` decoded onto 1-4 interleaved 8-bit channels.
fn from_dynamic(image: DynamicImage) -> Result<PixelBuffer, CodecError> {
    let width = image.width() as usize;
    let height = image.height() as usize;

    let (channels, data) = match image {
        DynamicImage::ImageLuma8(img) => (1, img.into_raw()),
        DynamicImage::ImageLumaA8(img) => (2, img.into_raw()),
        DynamicImage::ImageRgb8(img) => (3, img.into_raw()),
        DynamicImage::ImageRgba8(img) => (4, img.into_raw()),
        other if other.color().has_alpha() => (4, other.into_rgba8().into_raw()),
        other => (3, other.into_rgb8().into_raw()),
    };

    Ok(PixelBuffer::from_raw(width, height, channels, data)?)
}
