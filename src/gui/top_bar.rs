use eframe::egui::{
    self,
    containers,
};

use crate::{
    gui::actions::{
        ActionQueue,
        UiAction,
    },
    persistence::Settings,
    remote::api_key_from_env,
    spreadsheet::TemplateStyle,
};

pub struct TopBar;

impl TopBar {
    pub fn show(ctx: &egui::Context, settings: &Settings, actions: &mut ActionQueue) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            containers::menu::Bar::new().ui(ui, |ui| {
                egui::widgets::global_theme_preference_switch(ui);

                ui.menu_button("File", |ui| {
                    if ui.button("Open Spreadsheet...").clicked() {
                        actions.push(UiAction::BrowseFile);
                    }
                    ui.separator();
                    if ui.button("Download Template").clicked() {
                        actions.push(UiAction::SaveTemplate(TemplateStyle::HeaderOnly));
                    }
                    if ui.button("Download Template with Sample").clicked() {
                        actions.push(UiAction::SaveTemplate(TemplateStyle::WithSample));
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("Settings", |ui| {
                    if ui.button("Destination...").clicked() {
                        actions.push(UiAction::OpenSettings);
                    }
                    if ui.button("Receiver Script...").clicked() {
                        actions.push(UiAction::OpenReceiverScript);
                    }
                });

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    Self::show_status_indicators(ui, settings);
                });
            });
        });
    }

    fn show_status_indicators(ui: &mut egui::Ui, settings: &Settings) {
        let indicator = |ui: &mut egui::Ui, name: &str, on: bool, tooltip: &str| {
            let color = if on {
                egui::Color32::from_rgb(0, 200, 0)
            } else {
                egui::Color32::from_rgb(200, 80, 80)
            };
            ui.horizontal(|ui| {
                ui.spacing_mut().item_spacing.x = 2.0;
                ui.small(name).on_hover_text(tooltip);
                ui.small(egui::RichText::new("●").color(color)).on_hover_text(tooltip);
            });
        };

        let destination_set = settings.has_destination();
        indicator(
            ui,
            "Destination",
            destination_set,
            if destination_set { "Destination URL configured" } else { "No destination URL set" },
        );

        if settings.remote_cleanup.enabled {
            ui.add_space(3.0);
            let key_present = api_key_from_env().is_some();
            indicator(
                ui,
                "Cleanup",
                key_present,
                if key_present {
                    "Remote cleanup enabled"
                } else {
                    "Remote cleanup enabled, but GEMINI_API_KEY is not set"
                },
            );
        }
    }
}
