//! Bottom panel UI: animation controls and frame indicator.

use super::colors;
use crate::state::{AnimationSpeed, AppState, UiEvent};
use eframe::egui::{self, RichText, Vec2};
use egui_phosphor::regular as icons;

pub fn render_bottom_panel(ctx: &egui::Context, state: &mut AppState) {
    egui::TopBottomPanel::bottom("bottom_panel")
        .exact_height(40.0)
        .show(ctx, |ui| {
            ui.horizontal_centered(|ui| {
                render_playback_controls(ui, state);
                ui.separator();
                render_frame_indicator(ui, state);
            });
        });
}

fn render_playback_controls(ui: &mut egui::Ui, state: &mut AppState) {
    let running = state.animation.running;
    let icon = if running { icons::PAUSE } else { icons::PLAY };
    let hover = if running {
        "Pause animation"
    } else {
        "Resume animation"
    };

    let enabled = state.animation.frame_count > 0;
    let button = egui::Button::new(RichText::new(icon).size(16.0)).min_size(Vec2::new(28.0, 24.0));
    if ui
        .add_enabled(enabled, button)
        .on_hover_text(hover)
        .clicked()
    {
        state.push_event(UiEvent::ToggleAnimation);
    }

    ui.label(RichText::new("Speed:").size(11.0).color(colors::ui::LABEL));

    let mut speed = state.playback_state.speed;
    egui::ComboBox::from_id_salt("speed_selector")
        .selected_text(speed.label())
        .width(90.0)
        .show_ui(ui, |ui| {
            for s in AnimationSpeed::all() {
                ui.selectable_value(&mut speed, *s, s.label());
            }
        });
    if speed != state.playback_state.speed {
        state.push_event(UiEvent::SetSpeed(speed));
    }
}

fn render_frame_indicator(ui: &mut egui::Ui, state: &AppState) {
    let animation = &state.animation;

    let frame_text = match animation.displayed {
        Some(index) if animation.frame_count > 0 => format!(
            "Frame {} / {}  {}",
            index + 1,
            animation.frame_count,
            animation.label
        ),
        _ => "No frames".to_string(),
    };
    let color = if animation.running {
        colors::ui::ACTIVE
    } else {
        colors::ui::VALUE
    };
    ui.label(
        RichText::new(frame_text)
            .monospace()
            .size(12.0)
            .color(color),
    );

    if !animation.source.is_empty() {
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(
                RichText::new(&animation.source)
                    .size(11.0)
                    .color(colors::ui::LABEL),
            );
        });
    }
}
