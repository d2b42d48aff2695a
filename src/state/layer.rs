//! Layer visibility state.

use crate::alerts::AlertCategory;

/// State for toggling map overlay layers.
#[derive(Debug, Clone)]
pub struct LayerState {
    /// Show tornado warning polygons
    pub tornado_warnings: bool,

    /// Show severe thunderstorm warning polygons
    pub severe_warnings: bool,

    /// Show SPC mesoscale discussion polygons
    pub mesoscale_discussions: bool,

    /// Show radar site markers
    pub site_markers: bool,
}

impl Default for LayerState {
    fn default() -> Self {
        Self {
            tornado_warnings: true,
            severe_warnings: true,
            mesoscale_discussions: true,
            site_markers: true,
        }
    }
}

impl LayerState {
    pub fn alert_visible(&self, category: AlertCategory) -> bool {
        match category {
            AlertCategory::Tornado => self.tornado_warnings,
            AlertCategory::SevereThunderstorm => self.severe_warnings,
            AlertCategory::MesoscaleDiscussion => self.mesoscale_discussions,
        }
    }

    pub fn set_alert_visible(&mut self, category: AlertCategory, visible: bool) {
        match category {
            AlertCategory::Tornado => self.tornado_warnings = visible,
            AlertCategory::SevereThunderstorm => self.severe_warnings = visible,
            AlertCategory::MesoscaleDiscussion => self.mesoscale_discussions = visible,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_alert_group() {
        let mut layers = LayerState::default();
        assert!(AlertCategory::all()
            .iter()
            .all(|c| layers.alert_visible(*c)));

        layers.set_alert_visible(AlertCategory::SevereThunderstorm, false);
        assert!(!layers.severe_warnings);
        assert!(layers.alert_visible(AlertCategory::Tornado));
    }
}
