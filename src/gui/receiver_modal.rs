use std::time::{
    Duration,
    Instant,
};

use eframe::egui;

use crate::core::receiver::{
    apps_script_source,
    DEPLOY_STEPS,
};

pub struct ReceiverModal {
    open: bool,
    source: String,
    copied_at: Option<Instant>,
}

impl ReceiverModal {
    pub fn new() -> Self {
        Self { open: false, source: apps_script_source(), copied_at: None }
    }

    pub fn open(&mut self) {
        self.open = true;
        self.copied_at = None;
    }

    pub fn show(&mut self, ctx: &egui::Context) {
        if !self.open {
            return;
        }

        let modal = egui::Modal::new(egui::Id::new("receiver_modal")).show(ctx, |ui| {
            ui.set_width(640.0);
            ui.heading("Receiver Script (Google Apps Script)");
            ui.small("The destination spreadsheet must run this script as a web app.");
            ui.add_space(8.0);

            egui::ScrollArea::vertical().max_height(320.0).show(ui, |ui| {
                ui.add(
                    egui::TextEdit::multiline(&mut self.source.as_str())
                        .code_editor()
                        .desired_width(f32::INFINITY),
                );
            });

            ui.add_space(8.0);
            ui.label(egui::RichText::new("How to deploy").strong());
            for (step, text) in DEPLOY_STEPS.iter().enumerate() {
                ui.label(format!("{}. {}", step + 1, text));
            }

            ui.add_space(10.0);
            ui.horizontal(|ui| {
                let recently_copied =
                    self.copied_at.is_some_and(|at| at.elapsed() < Duration::from_secs(2));
                let copy_label = if recently_copied { "✔ Copied" } else { "Copy Script" };
                if ui.button(copy_label).clicked() {
                    ui.ctx().copy_text(self.source.clone());
                    self.copied_at = Some(Instant::now());
                    ui.ctx().request_repaint_after(Duration::from_secs(2));
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Close").clicked() {
                        ui.close();
                    }
                });
            });
        });

        if modal.should_close() {
            self.open = false;
        }
    }
}

impl Default for ReceiverModal {
    fn default() -> Self {
        Self::new()
    }
}
