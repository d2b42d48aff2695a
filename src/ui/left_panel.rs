//! Left panel UI: radar site, product, tilt and overlay controls.

use super::colors;
use crate::data::{all_sites_sorted, get_product, get_site, products_for_site};
use crate::nexrad::NationalProvider;
use crate::state::{AppState, UiEvent};
use eframe::egui::{self, RichText};

pub fn render_left_panel(ctx: &egui::Context, state: &mut AppState) {
    egui::SidePanel::left("left_panel")
        .resizable(true)
        .default_width(250.0)
        .min_width(200.0)
        .max_width(400.0)
        .show(ctx, |ui| {
            ui.heading("Radar");
            ui.separator();

            render_site_section(ui, state);
            ui.add_space(8.0);

            render_product_section(ui, state);
            ui.add_space(8.0);

            render_opacity_section(ui, state);
            ui.add_space(12.0);

            if ui
                .button(format!("{} Refresh", egui_phosphor::regular::ARROW_CLOCKWISE))
                .on_hover_text("Reload radar frames and alerts")
                .clicked()
            {
                state.push_event(UiEvent::Refresh);
            }
        });
}

fn render_site_section(ui: &mut egui::Ui, state: &mut AppState) {
    ui.label(RichText::new("Site").small().color(colors::ui::LABEL));

    let current = state.selection.site_id.clone();
    let selected_text = current
        .as_deref()
        .and_then(get_site)
        .map(|s| s.label())
        .unwrap_or_else(|| "National composite".to_string());

    let mut choice = current.clone();
    egui::ComboBox::from_id_salt("site_selector")
        .selected_text(selected_text)
        .width(220.0)
        .height(400.0)
        .show_ui(ui, |ui| {
            ui.selectable_value(&mut choice, None, "National composite");
            for site in all_sites_sorted() {
                ui.selectable_value(&mut choice, Some(site.id.to_string()), site.label());
            }
        });
    if choice != current {
        state.push_event(UiEvent::SelectSite(choice));
    }

    // National provider only matters without a site
    ui.add_enabled_ui(current.is_none(), |ui| {
        let mut provider = state.selection.national_provider;
        egui::ComboBox::from_id_salt("provider_selector")
            .selected_text(provider.label())
            .width(220.0)
            .show_ui(ui, |ui| {
                for p in NationalProvider::all() {
                    ui.selectable_value(&mut provider, *p, p.label());
                }
            });
        if provider != state.selection.national_provider {
            state.push_event(UiEvent::SetNationalProvider(provider));
        }
    });
}

fn render_product_section(ui: &mut egui::Ui, state: &mut AppState) {
    let site = state.selection.site_id.as_deref().and_then(get_site);
    let products = products_for_site(site);
    let Some(product) = get_product(&state.selection.product_id) else {
        return;
    };

    ui.label(RichText::new("Product").small().color(colors::ui::LABEL));
    let mut product_id = product.id;
    egui::ComboBox::from_id_salt("product_selector")
        .selected_text(product.name)
        .width(220.0)
        .show_ui(ui, |ui| {
            for p in &products {
                ui.selectable_value(&mut product_id, p.id, format!("{} ({})", p.name, p.id));
            }
        });
    if product_id != product.id {
        state.push_event(UiEvent::SelectProduct(product_id.to_string()));
    }

    ui.label(RichText::new("Tilt").small().color(colors::ui::LABEL));
    let tilt_enabled = site.is_some() && product.tilt_count() > 1;
    ui.add_enabled_ui(tilt_enabled, |ui| {
        let mut tilt = state.selection.tilt_index;
        egui::ComboBox::from_id_salt("tilt_selector")
            .selected_text(product.tilt_label(tilt))
            .width(220.0)
            .show_ui(ui, |ui| {
                for i in 0..product.tilt_count() {
                    ui.selectable_value(&mut tilt, i, product.tilt_label(i));
                }
            });
        if tilt != state.selection.tilt_index {
            state.push_event(UiEvent::SelectTilt(tilt));
        }
    });
}

fn render_opacity_section(ui: &mut egui::Ui, state: &mut AppState) {
    ui.label(
        RichText::new("Radar opacity")
            .small()
            .color(colors::ui::LABEL),
    );
    let mut percent = state.playback_state.opacity_percent;
    let response = ui.add(egui::Slider::new(&mut percent, 0..=100).suffix("%"));
    if response.changed() {
        state.push_event(UiEvent::SetOpacity(percent));
    }
}
