//! Right panel UI: alert and map layer toggles.

use super::colors;
use crate::alerts::{AlertCategory, AlertLayers};
use crate::state::{AppState, UiEvent};
use eframe::egui::{self, RichText};

pub fn render_right_panel(ctx: &egui::Context, state: &mut AppState, alerts: &AlertLayers) {
    egui::SidePanel::right("right_panel")
        .resizable(true)
        .default_width(220.0)
        .min_width(180.0)
        .max_width(350.0)
        .show(ctx, |ui| {
            ui.heading("Layers");
            ui.separator();

            egui::CollapsingHeader::new(RichText::new("Alerts").strong())
                .default_open(true)
                .show(ui, |ui| {
                    render_alert_toggles(ui, state, alerts);
                });

            ui.add_space(8.0);

            egui::CollapsingHeader::new(RichText::new("Map").strong())
                .default_open(true)
                .show(ui, |ui| {
                    ui.checkbox(&mut state.layer_state.site_markers, "Radar sites");
                });

            ui.with_layout(egui::Layout::bottom_up(egui::Align::LEFT), |ui| {
                ui.label(
                    RichText::new("Click a discussion polygon to open it")
                        .small()
                        .color(colors::ui::LABEL),
                );
            });
        });
}

fn render_alert_toggles(ui: &mut egui::Ui, state: &mut AppState, alerts: &AlertLayers) {
    for category in AlertCategory::all() {
        let mut visible = state.layer_state.alert_visible(*category);
        ui.horizontal(|ui| {
            if ui.checkbox(&mut visible, category.label()).changed() {
                state.push_event(UiEvent::ToggleAlertLayer(*category, visible));
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(
                    RichText::new(alerts.count(*category).to_string())
                        .monospace()
                        .color(category.stroke_color()),
                );
            });
        });
    }
}
