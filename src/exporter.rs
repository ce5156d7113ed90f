use std::path::Path;

use crate::types::color::Rgba;

/// Maps the recolored buffer onto a palette of at most 256 RGBA entries,
/// first-seen order. `None` when the image holds more unique colors than
/// an 8-bit indexed PNG can carry.
fn build_indexed(rgba_data: &[u8]) -> Option<(Vec<u8>, Vec<Rgba>)> {
    use std::collections::HashMap;

    let mut palette: Vec<Rgba> = Vec::new();
    let mut lookup: HashMap<[u8; 4], u8> = HashMap::new();
    let mut indexed = Vec::with_capacity(rgba_data.len() / 4);

    for pixel in rgba_data.chunks_exact(4) {
        let key = [pixel[0], pixel[1], pixel[2], pixel[3]];
        let index = match lookup.get(&key) {
            Some(&index) => index,
            None => {
                if palette.len() == 256 {
                    return None;
                }
                let index = palette.len() as u8;
                palette.push(Rgba::new(pixel[0], pixel[1], pixel[2], pixel[3]));
                lookup.insert(key, index);
                index
            }
        };
        indexed.push(index);
    }
    Some((indexed, palette))
}

pub fn save_indexed_png(
    output_path: &Path,
    rgba_data: &[u8],
    width: u32,
    height: u32,
) -> Result<(), String> {
    use std::fs::File;
    use std::io::BufWriter;

    let Some((indexed_pixel_data, palette)) = build_indexed(rgba_data) else {
        return Err(
            "Image has more than 256 unique colors, which indexed PNG cannot hold".to_string(),
        );
    };

    let file =
        File::create(output_path).map_err(|e| format!("Failed to create output file: {}", e))?;
    let w = &mut BufWriter::new(file);

    let mut encoder = png::Encoder::new(w, width, height);
    encoder.set_color(png::ColorType::Indexed);
    encoder.set_depth(png::BitDepth::Eight);

    let png_palette: Vec<u8> = palette
        .iter()
        .flat_map(|color| [color.r, color.g, color.b])
        .collect();
    let transparency: Vec<u8> = palette.iter().map(|color| color.a).collect();

    encoder.set_palette(png_palette);
    encoder.set_trns(transparency);

    let mut writer = encoder
        .write_header()
        .map_err(|e| format!("Failed to write PNG header: {}", e))?;

    writer
        .write_image_data(&indexed_pixel_data)
        .map_err(|e| format!("Failed to write PNG image data: {}", e))?;

    log::info!(
        "Indexed PNG exported with {} palette entries to: {}",
        palette.len(),
        output_path.display()
    );
    Ok(())
}

pub fn save_rgba_png(
    output_path: &Path,
    rgba_data: &[u8],
    width: u32,
    height: u32,
) -> Result<(), String> {
    use image::{ImageBuffer, Rgba};

    let img_buffer = ImageBuffer::<Rgba<u8>, _>::from_raw(width, height, rgba_data.to_vec())
        .ok_or_else(|| "Failed to create image buffer from RGBA data".to_string())?;

    let dynamic_img = image::DynamicImage::ImageRgba8(img_buffer);
    dynamic_img
        .save_with_format(output_path, image::ImageFormat::Png)
        .map_err(|e| format!("PNG save error: {}", e))?;

    log::info!("RGBA image exported successfully to: {}", output_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indexed_mapping_reuses_palette_entries() {
        let rgba = [
            255, 0, 0, 255, //
            0, 255, 0, 255, //
            255, 0, 0, 255, //
            0, 0, 0, 0,
        ];
        let (indexed, palette) = build_indexed(&rgba).unwrap();
        assert_eq!(indexed, vec![0, 1, 0, 2]);
        assert_eq!(palette.len(), 3);
        assert_eq!(palette[0], Rgba::opaque(255, 0, 0));
        assert_eq!(palette[2].a, 0);
    }

    #[test]
    fn same_rgb_with_different_alpha_gets_its_own_entry() {
        let rgba = [10, 20, 30, 255, 10, 20, 30, 128];
        let (indexed, palette) = build_indexed(&rgba).unwrap();
        assert_eq!(indexed, vec![0, 1]);
        assert_eq!(palette.len(), 2);
    }

    #[test]
    fn over_256_unique_colors_cannot_be_indexed() {
        let mut rgba = Vec::new();
        for i in 0..257u16 {
            rgba.extend_from_slice(&[(i % 256) as u8, (i / 256) as u8, 0, 255]);
        }
        assert!(build_indexed(&rgba).is_none());

        rgba.truncate(256 * 4);
        assert!(build_indexed(&rgba).is_some());
    }
}
