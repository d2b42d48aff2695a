//! Top bar UI: app title, status, and active alert counts.

use super::colors;
use crate::alerts::{AlertCategory, AlertLayers};
use crate::state::AppState;
use eframe::egui::{self, Color32, RichText};

pub fn render_top_bar(ctx: &egui::Context, state: &AppState, alerts: &AlertLayers) {
    egui::TopBottomPanel::top("top_bar")
        .exact_height(36.0)
        .show(ctx, |ui| {
            ui.horizontal_centered(|ui| {
                ui.label(
                    RichText::new("SKYWARN Radar")
                        .strong()
                        .size(16.0)
                        .color(Color32::WHITE),
                );

                ui.separator();

                ui.label(
                    RichText::new(&state.status_message)
                        .size(13.0)
                        .color(Color32::GRAY),
                );

                if let Some(alert_status) = &state.alert_status {
                    ui.separator();
                    ui.label(
                        RichText::new(alert_status)
                            .size(13.0)
                            .color(colors::ui::NOTICE),
                    );
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    // Reverse order so tornado ends up leftmost
                    for category in AlertCategory::all().iter().rev() {
                        render_count_badge(ui, *category, alerts.count(*category));
                    }
                });
            });
        });
}

fn render_count_badge(ui: &mut egui::Ui, category: AlertCategory, count: usize) {
    let short = match category {
        AlertCategory::Tornado => "TOR",
        AlertCategory::SevereThunderstorm => "SVR",
        AlertCategory::MesoscaleDiscussion => "MCD",
    };
    let color = if count > 0 {
        category.stroke_color()
    } else {
        colors::ui::LABEL
    };
    ui.label(
        RichText::new(format!("{} {}", short, count))
            .monospace()
            .size(12.0)
            .color(color),
    )
    .on_hover_text(category.label());
}
