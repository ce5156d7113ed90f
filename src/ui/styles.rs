use egui::Color32;

pub const COLOR_ACCENT: Color32 = Color32::from_rgb(52, 146, 186);
pub const COLOR_ACCENT_ACTIVE: Color32 = Color32::from_rgb(38, 104, 133);
pub const COLOR_INVALID: Color32 = Color32::from_rgb(255, 150, 150);
pub const COLOR_WARNING: Color32 = Color32::from_rgb(255, 180, 0);

pub fn init_styles(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();
    style.text_styles.insert(
        egui::TextStyle::Name("Subheading".into()),
        egui::FontId::new(12.0, egui::FontFamily::Proportional),
    );
    ctx.set_style(style);
}

pub trait RichTextExt {
    fn subheading(self) -> Self;
}

impl RichTextExt for egui::RichText {
    fn subheading(self) -> Self {
        self.text_style(egui::TextStyle::Name("Subheading".into()))
            .strong()
    }
}

// Extension trait for Ui to add convenient margin methods
pub trait UiMarginExt {
    fn heading_with_margin(&mut self, text: &str);
    fn subheading_with_margin(&mut self, text: &str);
}

impl UiMarginExt for egui::Ui {
    fn heading_with_margin(&mut self, text: &str) {
        egui::Frame::NONE
            .inner_margin(egui::Margin {
                left: 0,
                right: 0,
                top: 2,
                bottom: 4,
            })
            .show(self, |ui| {
                ui.heading(text);
            });
    }

    fn subheading_with_margin(&mut self, text: &str) {
        egui::Frame::NONE
            .inner_margin(egui::Margin {
                left: 0,
                right: 0,
                top: 2,
                bottom: 4,
            })
            .show(self, |ui| {
                ui.label(egui::RichText::new(text).subheading());
            });
    }
}
