use std::f64::consts::TAU;

use eframe::egui::{Stroke, Ui};
use egui_plot::{Legend, Line, Plot, PlotPoints, Points, Polygon};

use laptop_trends::data::aggregate::series;
use laptop_trends::data::model::TrendMetric;

use crate::color::metric_color;
use crate::state::AppState;

/// Pie slices are drawn as convex pieces no wider than this.
const MAX_PIECE_ANGLE: f64 = TAU / 8.0;
const ARC_STEPS_PER_PIECE: usize = 16;

// ---------------------------------------------------------------------------
// Brand share pie (Brand share tab)
// ---------------------------------------------------------------------------

pub fn brand_share_chart(ui: &mut Ui, state: &AppState) {
    let total: usize = state.brand_share.iter().map(|b| b.count).sum();
    if total == 0 {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No laptops match the current filters.");
        });
        return;
    }

    ui.horizontal_top(|ui: &mut Ui| {
        ui.vertical(|ui: &mut Ui| {
            ui.strong("Brand distribution");
            for share in &state.brand_share {
                let pct = 100.0 * share.count as f64 / total as f64;
                ui.colored_label(
                    state.brand_colors.color_for(&share.brand),
                    format!("{}  {} ({pct:.1}%)", share.brand, share.count),
                );
            }
        });

        Plot::new("brand_share")
            .legend(Legend::default())
            .data_aspect(1.0)
            .view_aspect(1.0)
            .show_axes(false)
            .show_grid(false)
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .allow_boxed_zoom(false)
            .show(ui, |plot_ui| {
                let mut start = TAU / 4.0;
                for share in &state.brand_share {
                    let sweep = TAU * share.count as f64 / total as f64;
                    let color = state.brand_colors.color_for(&share.brand);
                    for piece in pie_pieces(start, sweep) {
                        plot_ui.polygon(
                            Polygon::new(PlotPoints::from(piece))
                                .name(&share.brand)
                                .fill_color(color)
                                .stroke(Stroke::new(1.0, color)),
                        );
                    }
                    start -= sweep;
                }
            });
    });
}

/// Split a clockwise slice starting at angle `start` into convex wedges,
/// each given as a closed outline (centre, then arc points).
fn pie_pieces(start: f64, sweep: f64) -> Vec<Vec<[f64; 2]>> {
    let n_pieces = (sweep / MAX_PIECE_ANGLE).ceil().max(1.0) as usize;
    let piece_sweep = sweep / n_pieces as f64;

    (0..n_pieces)
        .map(|p| {
            let a0 = start - p as f64 * piece_sweep;
            let mut outline = Vec::with_capacity(ARC_STEPS_PER_PIECE + 2);
            outline.push([0.0, 0.0]);
            for step in 0..=ARC_STEPS_PER_PIECE {
                let a = a0 - piece_sweep * step as f64 / ARC_STEPS_PER_PIECE as f64;
                outline.push([a.cos(), a.sin()]);
            }
            outline
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Trend lines (Trends tab)
// ---------------------------------------------------------------------------

pub fn trend_chart(ui: &mut Ui, state: &mut AppState) {
    if state.trends.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No data to build trends from.");
        });
        return;
    }

    ui.horizontal(|ui: &mut Ui| {
        ui.strong("Trends: price, battery, OLED");
        ui.separator();
        ui.checkbox(&mut state.minmax_scaling, "Min-Max Scaling");
    });

    let y_label = if state.minmax_scaling {
        "Scaled value"
    } else {
        "Value"
    };

    Plot::new("trend_plot")
        .legend(Legend::default())
        .x_axis_label("Year")
        .y_axis_label(y_label)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for metric in TrendMetric::ALL {
                let mut points = series(&state.trends, metric);
                if state.minmax_scaling {
                    minmax_scale(&mut points);
                }
                let color = metric_color(metric);

                plot_ui.line(
                    Line::new(PlotPoints::from(points.clone()))
                        .name(metric.label())
                        .color(color)
                        .width(2.0),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from(points))
                        .name(metric.label())
                        .color(color)
                        .radius(4.0),
                );
            }
        });
}

/// Rescale the y values of one series to `[0, 1]`; a flat series maps to 0.
fn minmax_scale(points: &mut [[f64; 2]]) {
    let min = points.iter().map(|p| p[1]).fold(f64::INFINITY, f64::min);
    let max = points.iter().map(|p| p[1]).fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    for p in points.iter_mut() {
        p[1] = if range.abs() < f64::EPSILON {
            0.0
        } else {
            (p[1] - min) / range
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_slices_are_split_into_convex_pieces() {
        let pieces = pie_pieces(0.0, TAU * 0.7);
        assert_eq!(pieces.len(), 6);
        for piece in &pieces {
            assert_eq!(piece[0], [0.0, 0.0]);
            assert_eq!(piece.len(), ARC_STEPS_PER_PIECE + 2);
        }
        assert_eq!(pie_pieces(0.0, 0.1).len(), 1);
    }

    #[test]
    fn minmax_scaling_maps_to_unit_range() {
        let mut pts = vec![[2023.0, 500.0], [2024.0, 1000.0], [2025.0, 750.0]];
        minmax_scale(&mut pts);
        assert_eq!(pts, vec![[2023.0, 0.0], [2024.0, 1.0], [2025.0, 0.5]]);

        let mut flat = vec![[2024.0, 0.3]];
        minmax_scale(&mut flat);
        assert_eq!(flat, vec![[2024.0, 0.0]]);
    }
}
