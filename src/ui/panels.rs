use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use laptop_trends::config::{MAX_PAGE_SIZE, MIN_PAGE_SIZE};
use laptop_trends::data::model::AiCpuMode;

use crate::state::{AppState, Tab};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(table) = state.table.clone() else {
        ui.label("No dataset loaded.");
        return;
    };

    let mut changed = false;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Search ----
            ui.strong("Search");
            if ui
                .add(egui::TextEdit::singleline(&mut state.search_text).hint_text("brand or model"))
                .changed()
            {
                changed = true;
            }
            ui.separator();

            // ---- Brands ----
            let brands = table.brands();
            let header_text = format!(
                "Brand  ({}/{})",
                state.criteria.brands.len(),
                brands.len()
            );
            egui::CollapsingHeader::new(RichText::new(header_text).strong())
                .id_salt("brands")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            state.select_all_brands();
                        }
                        if ui.small_button("None").clicked() {
                            state.select_no_brands();
                        }
                    });
                    if state.criteria.brands.is_empty() {
                        ui.small("Nothing selected: every brand is shown.");
                    }

                    for brand in &brands {
                        let mut checked = state.criteria.brands.contains(brand);
                        let text = RichText::new(brand).color(state.brand_colors.color_for(brand));
                        if ui.checkbox(&mut checked, text).changed() {
                            state.toggle_brand(brand);
                        }
                    }
                });
            ui.separator();

            // ---- Price / screen ranges ----
            if let Some(bounds) = table.price_bounds() {
                ui.strong("Price (USD)");
                changed |= range_editor(ui, &mut state.criteria.price_range, bounds, 10.0, "$");
                ui.separator();
            }
            if let Some(bounds) = table.screen_bounds() {
                ui.strong("Screen size (in)");
                changed |= range_editor(ui, &mut state.criteria.screen_range, bounds, 0.1, "");
                ui.separator();
            }

            // ---- AI CPU ----
            ui.strong("AI CPU");
            let before = state.criteria.ai_cpu;
            egui::ComboBox::from_id_salt("ai_cpu")
                .selected_text(state.criteria.ai_cpu.to_string())
                .show_ui(ui, |ui: &mut Ui| {
                    for mode in AiCpuMode::ALL {
                        ui.selectable_value(&mut state.criteria.ai_cpu, mode, mode.to_string());
                    }
                });
            changed |= before != state.criteria.ai_cpu;
            ui.separator();

            // ---- Paging ----
            ui.strong("Models per page");
            let mut page_size = state.page_size;
            if ui
                .add(egui::DragValue::new(&mut page_size).range(MIN_PAGE_SIZE..=MAX_PAGE_SIZE))
                .changed()
            {
                state.set_page_size(page_size);
            }
        });

    if changed {
        state.refilter();
    }
}

/// Two linked drag values editing an inclusive `(min, max)` inside `bounds`.
/// Returns whether the range changed.
fn range_editor(
    ui: &mut Ui,
    range: &mut Option<(f64, f64)>,
    bounds: (f64, f64),
    speed: f64,
    prefix: &str,
) -> bool {
    let (mut lo, mut hi) = range.unwrap_or(bounds);
    let mut changed = false;
    ui.horizontal(|ui: &mut Ui| {
        changed |= ui
            .add(
                egui::DragValue::new(&mut lo)
                    .range(bounds.0..=hi)
                    .speed(speed)
                    .prefix(prefix),
            )
            .changed();
        ui.label("–");
        changed |= ui
            .add(
                egui::DragValue::new(&mut hi)
                    .range(lo..=bounds.1)
                    .speed(speed)
                    .prefix(prefix),
            )
            .changed();
        if ui.small_button("Reset").clicked() {
            lo = bounds.0;
            hi = bounds.1;
            changed = true;
        }
    });
    if changed {
        *range = Some((lo, hi));
    }
    changed
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open CSV…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let can_export = state.table.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Export filtered CSV…"))
                .clicked()
            {
                export_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(source) = state.source.as_deref().and_then(|p| p.file_name()) {
            ui.label(source.to_string_lossy().into_owned());
        }

        if let Some(table) = &state.table {
            ui.label(format!(
                "{} laptops loaded, {} visible",
                table.len(),
                state.filtered.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Metrics strip and tabs
// ---------------------------------------------------------------------------

/// Filtered count, average price and average battery.
pub fn metrics_strip(ui: &mut Ui, state: &AppState) {
    let summary = &state.summary;
    let dash = || "—".to_string();
    ui.horizontal(|ui: &mut Ui| {
        metric(ui, "Models (filtered)", summary.count.to_string());
        ui.add_space(32.0);
        metric(
            ui,
            "Average price (USD)",
            summary.mean_price.map(|p| format!("{p:.0}")).unwrap_or_else(dash),
        );
        ui.add_space(32.0);
        metric(
            ui,
            "Average battery (Wh)",
            summary.mean_battery.map(|b| format!("{b:.0}")).unwrap_or_else(dash),
        );
    });
}

fn metric(ui: &mut Ui, label: &str, value: String) {
    ui.vertical(|ui: &mut Ui| {
        ui.small(label);
        ui.heading(value);
    });
}

pub fn tab_bar(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.selectable_value(&mut state.tab, Tab::Catalog, "Catalog");
        ui.selectable_value(&mut state.tab, Tab::BrandShare, "Brand share");
        ui.selectable_value(&mut state.tab, Tab::Trends, "Trends");
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open laptop catalog")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
        if let Some(table) = &state.table {
            log::info!(
                "Opened {} with {} laptops, passthrough columns {:?}",
                path.display(),
                table.len(),
                table.extra_columns
            );
        }
    }
}

pub fn export_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export filtered laptops")
        .add_filter("CSV", &["csv"])
        .set_file_name("filtered_laptops.csv")
        .save_file();

    if let Some(path) = file {
        state.export(&path);
    }
}
