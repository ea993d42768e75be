use eframe::egui;
use egui_extras::{
    Column,
    TableBuilder,
};

use crate::{
    core::{
        schema::FieldId,
        Queue,
    },
    gui::{
        actions::{
            ActionQueue,
            UiAction,
        },
        form_panel::field_widget,
        theme::Theme,
    },
};

const ROW_HEIGHT: f32 = 26.0;

pub fn queue_panel(
    ui: &mut egui::Ui,
    queue: &mut Queue,
    busy: bool,
    theme: &Theme,
    actions: &mut ActionQueue,
) {
    ui.horizontal(|ui| {
        ui.label(theme.heading(ui.ctx(), "Queue"));
        ui.label(format!("{} record(s)", queue.len()));

        let blanks = queue.blank_cell_count();
        if blanks > 0 {
            ui.colored_label(theme.orange(ui.ctx()), format!("⚠ {blanks} empty cell(s)"));
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let can_submit = !queue.is_empty() && !busy;
            if ui.add_enabled(can_submit, egui::Button::new("📤 Submit All")).clicked() {
                actions.push(UiAction::Submit);
            }
            if ui.add_enabled(!queue.is_empty() && !busy, egui::Button::new("🗑 Clear")).clicked() {
                actions.push(UiAction::RequestClear);
            }
        });
    });

    ui.separator();

    if queue.is_empty() {
        ui.add_space(20.0);
        ui.vertical_centered(|ui| {
            ui.label(egui::RichText::new("The queue is empty").color(theme.comment(ui.ctx())));
        });
        return;
    }

    queue_table(ui, queue, theme, actions);
}

fn queue_table(ui: &mut egui::Ui, queue: &mut Queue, theme: &Theme, actions: &mut ActionQueue) {
    let ctx = ui.ctx().clone();
    let editing = queue.editing_index();
    let empty_fill = theme.warning_fill(&ctx);
    let empty_text = theme.red(&ctx);

    egui::ScrollArea::horizontal().show(ui, |ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .column(Column::exact(40.0))
            .column(Column::exact(64.0))
            .columns(Column::initial(150.0).at_least(60.0).clip(true), FieldId::ALL.len())
            .header(ROW_HEIGHT, |mut header| {
                header.col(|ui| {
                    ui.label(theme.heading(&ctx, "No"));
                });
                header.col(|ui| {
                    ui.label(theme.heading(&ctx, ""));
                });
                for id in FieldId::ALL {
                    header.col(|ui| {
                        ui.label(theme.heading(&ctx, id.label()));
                    });
                }
            })
            .body(|mut body| {
                for index in 0..queue.len() {
                    let is_editing = editing == Some(index);

                    body.row(ROW_HEIGHT, |mut row| {
                        row.col(|ui| {
                            ui.label((index + 1).to_string());
                        });

                        row.col(|ui| {
                            if is_editing {
                                if ui.small_button("✔").on_hover_text("Save").clicked() {
                                    actions.push(UiAction::CommitEdit);
                                }
                                if ui.small_button("✖").on_hover_text("Cancel").clicked() {
                                    actions.push(UiAction::CancelEdit);
                                }
                            } else {
                                if ui.small_button("✏").on_hover_text("Edit").clicked() {
                                    actions.push(UiAction::BeginEdit(index));
                                }
                                if ui.small_button("🗑").on_hover_text("Delete").clicked() {
                                    actions.push(UiAction::Remove(index));
                                }
                            }
                        });

                        for id in FieldId::ALL {
                            row.col(|ui| {
                                if is_editing {
                                    if let Some(draft) = queue.draft_mut() {
                                        field_widget(ui, id.definition(), draft.field_mut(id));
                                    }
                                    return;
                                }

                                let value = queue.get(index).map(|r| r.get(id)).unwrap_or_default();
                                if value.is_empty() {
                                    ui.painter().rect_filled(ui.max_rect(), 0.0, empty_fill);
                                    ui.label(egui::RichText::new("KOSONG").italics().color(empty_text));
                                } else {
                                    ui.label(value);
                                }
                            });
                        }
                    });
                }
            });
    });
}
