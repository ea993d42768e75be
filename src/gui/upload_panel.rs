use eframe::egui;

use crate::{
    gui::{
        actions::{
            ActionQueue,
            UiAction,
        },
        theme::Theme,
    },
    persistence::Settings,
    spreadsheet::{
        SheetFormat,
        TemplateStyle,
    },
};

pub fn upload_panel(ui: &mut egui::Ui, settings: &Settings, theme: &Theme, actions: &mut ActionQueue) {
    ui.label(theme.heading(ui.ctx(), "Upload Spreadsheet"));
    ui.small(format!("Accepted: {}", SheetFormat::EXTENSIONS.map(|ext| format!(".{ext}")).join(", ")));
    ui.add_space(12.0);

    let frame = egui::Frame::group(ui.style()).inner_margin(egui::Margin::same(24));
    frame.show(ui, |ui| {
        ui.set_min_width(ui.available_width());
        ui.vertical_centered(|ui| {
            ui.label(egui::RichText::new("📄").size(32.0));
            ui.label("Drop a spreadsheet anywhere in this window");
            ui.add_space(6.0);
            if ui.button("Browse...").clicked() {
                actions.push(UiAction::BrowseFile);
            }
        });
    });

    ui.add_space(12.0);
    ui.label("Columns are matched to fields by header name. Start from the template for an exact match:");
    ui.horizontal(|ui| {
        if ui.button("⬇ Download Template").clicked() {
            actions.push(UiAction::SaveTemplate(TemplateStyle::HeaderOnly));
        }
        if ui.button("⬇ Template with Sample Row").clicked() {
            actions.push(UiAction::SaveTemplate(TemplateStyle::WithSample));
        }
    });

    ui.add_space(12.0);
    let cleanup = if settings.remote_cleanup.enabled { "on" } else { "off" };
    ui.horizontal(|ui| {
        ui.small(format!("Remote cleanup is {cleanup}."));
        if ui.small_button("Change").clicked() {
            actions.push(UiAction::OpenSettings);
        }
    });
}

/// Native file picker restricted to the accepted spreadsheet types.
pub fn pick_spreadsheet() -> Option<std::path::PathBuf> {
    rfd::FileDialog::new().add_filter("Spreadsheet", &SheetFormat::EXTENSIONS).pick_file()
}
