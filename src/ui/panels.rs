use std::collections::BTreeSet;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::coordinator::SelectionEvent;
use crate::data::selection::TogglePhase;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – selection widgets
// ---------------------------------------------------------------------------

/// Render the left selection panel: year-range sliders, the toggle-all
/// button, and the per-gauge checklist.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Selection");
    ui.separator();

    let Some(coordinator) = &state.coordinator else {
        ui.label("No dataset loaded.");
        return;
    };

    // Snapshot what the widgets need so events can be dispatched afterwards
    // without holding a borrow of the coordinator.
    let dataset = coordinator.dataset();
    let min_year = dataset.min_year();
    let max_year = dataset.max_year();
    let all_gauges: Vec<String> = dataset.gauges().to_vec();
    let selected: BTreeSet<String> = coordinator.selection().gauges().clone();
    let phase = coordinator.selection().toggle_phase();

    let mut pending: Vec<SelectionEvent> = Vec::new();

    ui.label(format!("Precipitation {min_year}-{max_year}"));
    ui.add_space(4.0);

    // ---- Year range ----
    ui.strong("Years");
    let mut range_changed = false;
    range_changed |= ui
        .add(egui::Slider::new(&mut state.draft_year_start, min_year..=max_year).text("from"))
        .changed();
    range_changed |= ui
        .add(egui::Slider::new(&mut state.draft_year_end, min_year..=max_year).text("to"))
        .changed();
    if range_changed {
        // Committed as one event; a crossed range is rejected downstream
        // and the sliders snap back.
        pending.push(SelectionEvent::YearRange(
            state.draft_year_start,
            state.draft_year_end,
        ));
    }
    ui.separator();

    // ---- Gauges ----
    ui.strong(format!("Gauges ({}/{})", selected.len(), all_gauges.len()));

    let toggle_label = match phase {
        TogglePhase::NoneSelected => "Select all",
        TogglePhase::AllSelected => "Deselect all",
    };
    if ui.small_button(toggle_label).clicked() {
        pending.push(SelectionEvent::ToggleAll);
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            let mut edited = selected.clone();
            let mut any_change = false;

            for gauge in &all_gauges {
                let mut checked = edited.contains(gauge);

                let mut text = RichText::new(gauge);
                if let Some(colors) = &state.gauge_colors {
                    text = text.color(colors.color_for(gauge));
                }

                if ui.checkbox(&mut checked, text).changed() {
                    if checked {
                        edited.insert(gauge.clone());
                    } else {
                        edited.remove(gauge);
                    }
                    any_change = true;
                }
            }

            if any_change {
                pending.push(SelectionEvent::Gauges(edited));
            }
        });

    for event in pending {
        state.dispatch(event);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(coordinator) = &state.coordinator {
            let dataset = coordinator.dataset();
            ui.label(format!(
                "{} readings, {} of {} gauges selected",
                dataset.len(),
                coordinator.selection().gauges().len(),
                dataset.gauges().len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open precipitation data")
        .add_filter("Supported files", &["csv", "json"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}
