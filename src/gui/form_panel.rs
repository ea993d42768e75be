use eframe::egui;

use crate::{
    core::{
        schema::{
            FieldDefinition,
            FieldId,
        },
        EntryForm,
        Record,
    },
    gui::theme::Theme,
};

/// Draws the manual entry form. Returns the record when "Add to Queue"
/// produced a valid one.
pub fn form_panel(ui: &mut egui::Ui, form: &mut EntryForm, theme: &Theme) -> Option<Record> {
    let mut added = None;

    ui.label(theme.heading(ui.ctx(), "Manual Entry"));
    ui.small("All fields are required. Identifiers are typed as digits only.");
    ui.add_space(8.0);

    egui::Grid::new("entry_form_grid").num_columns(2).spacing([16.0, 6.0]).striped(true).show(
        ui,
        |ui| {
            for id in FieldId::ALL {
                let definition = id.definition();

                ui.horizontal(|ui| {
                    ui.label(definition.label);
                    if definition.required {
                        ui.colored_label(theme.red(ui.ctx()), "*");
                    }
                });

                ui.vertical(|ui| {
                    let changed = field_widget(ui, definition, form.value_mut(id));
                    if changed {
                        form.clear_error(id);
                    }
                    if let Some(error) = form.error(id) {
                        ui.colored_label(theme.red(ui.ctx()), error);
                    }
                });

                ui.end_row();
            }
        },
    );

    ui.add_space(10.0);
    ui.horizontal(|ui| {
        if ui.button("➕ Add to Queue").clicked() {
            added = form.submit();
        }
        if ui.button("Reset").clicked() {
            form.reset();
        }
        if !form.errors().is_empty() {
            ui.colored_label(
                theme.red(ui.ctx()),
                format!("{} field(s) need attention", form.errors().len()),
            );
        }
    });

    added
}

/// One input for a field: a combo box for selects, a text box otherwise.
/// Shared with the inline editor in the queue table.
pub fn field_widget(ui: &mut egui::Ui, definition: &FieldDefinition, value: &mut String) -> bool {
    if definition.is_select() {
        let selected = if value.is_empty() { definition.placeholder } else { value.as_str() };
        let mut changed = false;

        egui::ComboBox::from_id_salt(("field", definition.id.key(), ui.id()))
            .selected_text(selected.to_string())
            .width(220.0)
            .show_ui(ui, |ui| {
                for option in definition.options {
                    changed |= ui.selectable_value(value, option.to_string(), *option).changed();
                }
            });

        changed
    } else {
        ui.add(
            egui::TextEdit::singleline(value)
                .hint_text(definition.placeholder)
                .desired_width(220.0),
        )
        .changed()
    }
}
