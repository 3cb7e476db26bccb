use eframe::egui::{self, RichText, Ui};

use crate::color;
use crate::data::model::{Field, FieldKind};
use crate::state::{AppState, NoticeKind, Tab};

// ---------------------------------------------------------------------------
// Header
// ---------------------------------------------------------------------------

/// Title, subtitle and tab selector.
pub fn header(ui: &mut Ui, state: &mut AppState) {
    ui.add_space(12.0);
    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(
            RichText::new("SP-Buy")
                .size(28.0)
                .strong()
                .color(color::PRIMARY),
        );
        ui.label(RichText::new("Fraudulent Order Detector").size(18.0));
    });
    ui.add_space(8.0);

    ui.horizontal(|ui: &mut Ui| {
        ui.selectable_value(&mut state.tab, Tab::Manual, "Manual Input");
        ui.selectable_value(&mut state.tab, Tab::Bulk, "Bulk Processing");

        if !state.model_loaded() {
            ui.separator();
            ui.label(RichText::new("Model not loaded").color(color::ERROR));
        }
    });
    ui.add_space(4.0);
}

// ---------------------------------------------------------------------------
// Manual input tab
// ---------------------------------------------------------------------------

/// Two label/entry pairs per row, then the Predict button.
pub fn manual_tab(ui: &mut Ui, state: &mut AppState) {
    ui.add_space(20.0);
    ui.vertical_centered(|ui: &mut Ui| {
        egui::Grid::new("order_form")
            .num_columns(4)
            .spacing([16.0, 8.0])
            .show(ui, |ui: &mut Ui| {
                for (i, field) in Field::ALL.into_iter().enumerate() {
                    ui.label(field.label());
                    field_input(ui, field, state.form.value_mut(field));
                    if i % 2 == 1 {
                        ui.end_row();
                    }
                }
                ui.end_row();
            });

        ui.add_space(20.0);
        if ui.button(RichText::new("Predict").size(14.0)).clicked() {
            state.single_predict();
        }
    });
}

fn field_input(ui: &mut Ui, field: Field, value: &mut String) {
    if field.kind() == FieldKind::Categorical {
        egui::ComboBox::from_id_salt(field.name())
            .width(200.0)
            .selected_text(value.as_str())
            .show_ui(ui, |ui: &mut Ui| {
                for option in field.options() {
                    ui.selectable_value(value, option.to_string(), *option);
                }
            });
    } else {
        ui.add(egui::TextEdit::singleline(value).desired_width(200.0));
    }
}

// ---------------------------------------------------------------------------
// Bulk processing tab
// ---------------------------------------------------------------------------

pub fn bulk_tab(ui: &mut Ui, state: &mut AppState) {
    ui.add_space(20.0);
    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(RichText::new("Import CSV or XLSX File").size(18.0));
        ui.add_space(20.0);

        ui.horizontal(|ui: &mut Ui| {
            ui.add(egui::TextEdit::singleline(&mut state.file_path).desired_width(480.0));
            if ui.button("📂 Browse").clicked() {
                state.browse_for_file();
            }
        });

        ui.add_space(20.0);
        if ui.button(RichText::new("Predict").size(14.0)).clicked() {
            state.bulk_predict();
        }
    });
}

// ---------------------------------------------------------------------------
// Notice dialog
// ---------------------------------------------------------------------------

/// Modal-style message window with an OK button.
pub fn notice_window(ctx: &egui::Context, state: &mut AppState) {
    let Some(notice) = &state.notice else {
        return;
    };
    let text_color = match notice.kind {
        NoticeKind::Info => color::SUCCESS,
        NoticeKind::Error => color::ERROR,
    };

    let mut dismissed = false;
    egui::Window::new(notice.title.as_str())
        .id(egui::Id::new("notice"))
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui: &mut Ui| {
            ui.label(RichText::new(notice.body.as_str()).color(text_color));
            ui.add_space(8.0);
            ui.vertical_centered(|ui: &mut Ui| {
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });
        });

    if dismissed {
        state.dismiss_notice();
    }
}
