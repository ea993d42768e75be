use eframe::egui;

use super::actions::UiAction;

/// Yes/No question guarding a destructive action. The action is handed back
/// only when the user confirms.
pub struct ConfirmModal {
    pending: Option<Pending>,
}

struct Pending {
    title: String,
    message: String,
    confirm_text: String,
    action: UiAction,
}

pub enum ConfirmResult {
    Confirmed(UiAction),
    Cancelled,
}

impl ConfirmModal {
    pub fn new() -> Self {
        Self { pending: None }
    }

    pub fn ask(
        &mut self,
        title: impl Into<String>,
        message: impl Into<String>,
        confirm_text: impl Into<String>,
        action: UiAction,
    ) {
        self.pending = Some(Pending {
            title: title.into(),
            message: message.into(),
            confirm_text: confirm_text.into(),
            action,
        });
    }

    pub fn is_open(&self) -> bool {
        self.pending.is_some()
    }

    pub fn show(&mut self, ctx: &egui::Context) -> Option<ConfirmResult> {
        let pending = self.pending.as_ref()?;
        let mut confirmed = false;

        let modal = egui::Modal::new(egui::Id::new("confirm_modal")).show(ctx, |ui| {
            ui.set_width(360.0);
            ui.heading(&pending.title);
            ui.add_space(8.0);
            ui.label(&pending.message);
            ui.add_space(12.0);

            ui.horizontal(|ui| {
                if ui.button(pending.confirm_text.as_str()).clicked() {
                    confirmed = true;
                    ui.close();
                }
                if ui.button("Cancel").clicked() {
                    ui.close();
                }
            });
        });

        if !modal.should_close() {
            return None;
        }

        let pending = self.pending.take()?;
        Some(if confirmed { ConfirmResult::Confirmed(pending.action) } else { ConfirmResult::Cancelled })
    }
}

impl Default for ConfirmModal {
    fn default() -> Self {
        Self::new()
    }
}
