use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color;
use crate::data::model::title_case;
use crate::scoring::FLAG_COLUMN;
use crate::state::{AppState, ResultsView};

// ---------------------------------------------------------------------------
// Bulk result viewer (separate window)
// ---------------------------------------------------------------------------

/// Render the paginated result window, if a batch has been scored.
pub fn results_window(ctx: &egui::Context, state: &mut AppState) {
    let Some(view) = state.results.as_mut() else {
        return;
    };

    let mut open = true;
    egui::Window::new("Analysis Results")
        .id(egui::Id::new("analysis_results"))
        .open(&mut open)
        .default_size([1000.0, 600.0])
        .show(ctx, |ui: &mut Ui| {
            ui.vertical_centered(|ui: &mut Ui| {
                ui.label(
                    RichText::new("Bulk Analysis Results")
                        .size(28.0)
                        .strong()
                        .color(color::PRIMARY),
                );
                ui.label(view.batch.to_string());
            });
            ui.add_space(8.0);

            pagination(ui, view);
            ui.separator();
            result_table(ui, view);
        });

    if !open {
        state.close_results();
    }
}

fn pagination(ui: &mut Ui, view: &mut ResultsView) {
    ui.horizontal(|ui: &mut Ui| {
        if ui.button("<< Prev").clicked() {
            view.pager.prev();
        }
        ui.label(format!(
            "{} / {}",
            view.pager.page,
            view.pager.total_pages().max(1)
        ));
        if ui.button("Next >>").clicked() {
            view.pager.next();
        }
    });
}

fn result_table(ui: &mut Ui, view: &ResultsView) {
    let batch = &view.batch;
    let flag_idx = batch.headers.iter().position(|h| h == FLAG_COLUMN);
    let suspicious_fill = color::tint(color::ERROR, 0.92);

    egui::ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .columns(Column::auto().at_least(110.0), batch.headers.len())
            .header(24.0, |mut header| {
                for name in &batch.headers {
                    header.col(|ui: &mut Ui| {
                        ui.strong(title_case(name));
                    });
                }
            })
            .body(|mut body| {
                for idx in view.pager.range() {
                    let row_cells = &batch.rows[idx];
                    let suspicious = batch.flags[idx].is_suspicious();
                    body.row(20.0, |mut row| {
                        for (col, cell) in row_cells.iter().enumerate() {
                            row.col(|ui: &mut Ui| {
                                if Some(col) == flag_idx && suspicious {
                                    ui.painter().rect_filled(
                                        ui.max_rect(),
                                        0.0,
                                        suspicious_fill,
                                    );
                                    ui.label(RichText::new(cell.as_str()).strong().color(color::ERROR));
                                } else {
                                    ui.label(cell.as_str());
                                }
                            });
                        }
                    });
                }
            });
    });
}
