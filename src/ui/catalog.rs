use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use laptop_trends::config::{CARDS_PER_ROW, PLACEHOLDER_IMAGE_URL};
use laptop_trends::data::model::Laptop;

use crate::state::AppState;

const THUMB_HEIGHT: f32 = 160.0;
const PRICE_COLOR: Color32 = Color32::from_rgb(0xff, 0x3b, 0x30);

/// What the user clicked while the catalog was drawn.
enum CatalogAction {
    Prev,
    Next,
    Jump(usize),
    ToggleDetails(usize),
}

// ---------------------------------------------------------------------------
// Catalog grid (Catalog tab)
// ---------------------------------------------------------------------------

/// Render one page of laptop cards, cheapest first, with a pager on top.
pub fn catalog(ui: &mut Ui, state: &mut AppState) {
    let mut actions = Vec::new();

    pager(ui, state, &mut actions);
    ui.separator();

    let indices = state.page_indices();
    if indices.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label("No laptops match the current filters.");
        });
    } else {
        let spacing = ui.spacing().item_spacing.x;
        let card_width =
            (ui.available_width() - spacing * (CARDS_PER_ROW as f32 - 1.0)) / CARDS_PER_ROW as f32;

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui: &mut Ui| {
                for row in indices.chunks(CARDS_PER_ROW) {
                    ui.horizontal_top(|ui: &mut Ui| {
                        for &idx in row {
                            let Some(laptop) = state.laptop(idx) else {
                                continue;
                            };
                            let expanded = state.expanded == Some(idx);
                            let code = state
                                .filtered
                                .extra_value(laptop, "code")
                                .or_else(|| state.filtered.extra_value(laptop, "sku"))
                                .unwrap_or("");
                            ui.vertical(|ui: &mut Ui| {
                                ui.set_width(card_width);
                                if card(ui, laptop, code, expanded, card_width) {
                                    actions.push(CatalogAction::ToggleDetails(idx));
                                }
                            });
                        }
                    });
                    ui.add_space(8.0);
                }
            });
    }

    for action in actions {
        match action {
            CatalogAction::Prev => state.prev_page(),
            CatalogAction::Next => state.next_page(),
            CatalogAction::Jump(page) => state.jump_to(page),
            CatalogAction::ToggleDetails(idx) => state.toggle_details(idx),
        }
    }
}

fn pager(ui: &mut Ui, state: &AppState, actions: &mut Vec<CatalogAction>) {
    let total = state.total_pages();
    ui.horizontal(|ui: &mut Ui| {
        if ui
            .add_enabled(state.page > 1, egui::Button::new("⬅ Prev"))
            .clicked()
        {
            actions.push(CatalogAction::Prev);
        }
        ui.strong(format!("Page {} / {total}", state.page));
        if ui
            .add_enabled(state.page < total, egui::Button::new("Next ➡"))
            .clicked()
        {
            actions.push(CatalogAction::Next);
        }
        ui.separator();
        ui.label("Go to page");
        let mut jump = state.page;
        if ui
            .add(egui::DragValue::new(&mut jump).range(1..=total))
            .changed()
        {
            actions.push(CatalogAction::Jump(jump));
        }
    });
}

/// Draw one card. Returns whether its "Details" button was clicked.
fn card(ui: &mut Ui, laptop: &Laptop, code: &str, expanded: bool, width: f32) -> bool {
    let mut clicked = false;
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        let inner_width = width - 16.0;
        let uri = if laptop.has_thumbnail() {
            laptop.thumbnail.as_str()
        } else {
            PLACEHOLDER_IMAGE_URL
        };
        ui.add(
            egui::Image::from_uri(uri)
                .fit_to_exact_size(egui::vec2(inner_width, THUMB_HEIGHT))
                .rounding(6.0),
        );

        ui.add_space(4.0);
        ui.label(RichText::new(laptop.display_name()).strong());
        ui.small(format!(
            "{}\" • {} • {} Wh",
            laptop.screen_size_in,
            or_dash(&laptop.display_type),
            laptop.battery_wh
        ));
        if !code.is_empty() {
            ui.small(format!("Code: {code}"));
        }

        ui.horizontal(|ui: &mut Ui| {
            ui.label(
                RichText::new(format!("${:.0}", laptop.price_usd))
                    .color(PRICE_COLOR)
                    .strong(),
            );
            let label = if expanded { "Hide" } else { "Details" };
            if ui.small_button(label).clicked() {
                clicked = true;
            }
        });

        if expanded {
            ui.separator();
            ui.small(format!("CPU: {}", or_dash(&laptop.cpu)));
            ui.small(format!("Released: {}", laptop.release_year));
            if laptop.is_ai_cpu {
                ui.small("AI-capable CPU");
            }
            if laptop.image_list.len() > 1 {
                ui.small(format!("{} images", laptop.image_list.len()));
            }
        }
    });
    clicked
}

fn or_dash(s: &str) -> &str {
    if s.is_empty() {
        "—"
    } else {
        s
    }
}
