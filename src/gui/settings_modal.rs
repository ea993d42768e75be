use eframe::egui;

use crate::{
    core::submission::parse_destination,
    persistence::Settings,
    remote::api_key_from_env,
};

/// Edits a working copy of the settings; the caller persists what `show` returns.
pub struct SettingsModal {
    open: bool,
    working: Settings,
    original: Settings,
}

impl SettingsModal {
    pub fn new() -> Self {
        Self { open: false, working: Settings::default(), original: Settings::default() }
    }

    pub fn open_settings(&mut self, current: &Settings) {
        self.working = current.clone();
        self.original = current.clone();
        self.open = true;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    fn is_dirty(&self) -> bool {
        self.working != self.original
    }

    /// A blank URL is allowed and simply leaves submission unconfigured.
    fn destination_error(&self) -> Option<String> {
        if self.working.destination_url.trim().is_empty() {
            return None;
        }
        parse_destination(&self.working.destination_url).err().map(|e| e.to_string())
    }

    pub fn show(&mut self, ctx: &egui::Context) -> Option<Settings> {
        if !self.open {
            return None;
        }

        let mut result = None;

        let modal = egui::Modal::new(egui::Id::new("settings_modal")).show(ctx, |ui| {
            ui.set_width(520.0);
            ui.heading("Destination Settings");
            ui.add_space(10.0);

            ui.label("Apps Script web app URL");
            ui.add(
                egui::TextEdit::singleline(&mut self.working.destination_url)
                    .hint_text("https://script.google.com/macros/s/.../exec")
                    .desired_width(f32::INFINITY),
            );

            let destination_error = self.destination_error();
            if let Some(error) = &destination_error {
                ui.colored_label(ui.visuals().error_fg_color, format!("⚠ {error}"));
            }

            ui.add_space(10.0);
            ui.separator();
            ui.add_space(6.0);

            ui.checkbox(&mut self.working.remote_cleanup.enabled, "Clean imported data with Gemini");
            ui.add_enabled_ui(self.working.remote_cleanup.enabled, |ui| {
                ui.horizontal(|ui| {
                    ui.label("Model:");
                    ui.text_edit_singleline(&mut self.working.remote_cleanup.model);
                });
                if api_key_from_env().is_none() {
                    ui.colored_label(
                        ui.visuals().warn_fg_color,
                        "GEMINI_API_KEY is not set; imports will skip cleanup.",
                    );
                }
                ui.small("Batches over 100 rows are never sent. Identifiers and amounts are kept as imported.");
            });

            ui.add_space(10.0);
            ui.separator();

            let is_dirty = self.is_dirty();
            ui.horizontal(|ui| {
                if is_dirty {
                    ui.colored_label(egui::Color32::YELLOW, "⚠");
                    ui.label("Settings have been modified");
                } else {
                    ui.label("");
                }
            });

            ui.add_space(5.0);

            ui.horizontal(|ui| {
                let can_save = is_dirty && destination_error.is_none();
                if ui.add_enabled(can_save, egui::Button::new("Save Settings")).clicked() {
                    let mut settings = self.working.clone();
                    settings.destination_url = settings.destination_url.trim().to_string();
                    self.original = settings.clone();
                    result = Some(settings);
                    ui.close();
                }
                if ui.button("Close").clicked() {
                    ui.close();
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Restore Default").clicked() {
                        self.working = Settings::default();
                    }
                });
            });
        });

        if modal.should_close() {
            self.open = false;
        }

        result
    }
}

impl Default for SettingsModal {
    fn default() -> Self {
        Self::new()
    }
}
