use egui::{ColorImage, TextureHandle};

#[derive(Clone)]
pub struct ImageData {
    pub texture: TextureHandle,
    pub width: u32,
    pub height: u32,
    pub rgba_data: Vec<u8>,
}

impl ImageData {
    /// Wraps an RGBA buffer in a GPU texture. Nearest-neighbor filtering
    /// keeps pixel art crisp at any zoom.
    pub fn from_rgba(
        name: &str,
        rgba_data: Vec<u8>,
        width: u32,
        height: u32,
        ctx: &egui::Context,
    ) -> Result<ImageData, String> {
        let expected = width as usize * height as usize * 4;
        if rgba_data.len() != expected {
            return Err(format!(
                "Buffer for '{}' is {} bytes, expected {} for {}x{}",
                name,
                rgba_data.len(),
                expected,
                width,
                height
            ));
        }

        let size = [width as usize, height as usize];
        let color_image = ColorImage::from_rgba_unmultiplied(size, &rgba_data);
        let texture = ctx.load_texture(name, color_image, egui::TextureOptions::NEAREST);

        Ok(ImageData {
            texture,
            width,
            height,
            rgba_data,
        })
    }

    pub fn load(path: &str, ctx: &egui::Context) -> Result<ImageData, String> {
        let img = image::open(path).map_err(|e| format!("Image loading error: {}", e))?;
        let rgba_img = img.to_rgba8();
        let (width, height) = (rgba_img.width(), rgba_img.height());
        let rgba_data = rgba_img.into_raw();
        Self::from_rgba("input", rgba_data, width, height, ctx)
    }

    /// The original RGBA under a pixel coordinate, if it is in bounds.
    pub fn pixel_at(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let at = (y as usize * self.width as usize + x as usize) * 4;
        Some([
            self.rgba_data[at],
            self.rgba_data[at + 1],
            self.rgba_data[at + 2],
            self.rgba_data[at + 3],
        ])
    }
}
