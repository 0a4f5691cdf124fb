use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, GridMark, Legend, Plot};

use crate::color::series_colors;
use crate::config;
use crate::data::model::{ChartSeries, Week};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Grouped bar chart (Time Series tab)
// ---------------------------------------------------------------------------

const SERIES_NAMES: [&str; 4] = [
    "Revenue",
    "Units Sold",
    "Average Time with Price Reduction",
    "Average Marketing Support",
];

/// Fraction of one week slot covered by a group of bars.
const GROUP_WIDTH: f64 = 0.8;

/// Render the weekly bar chart for the selected product.
pub fn product_chart(ui: &mut Ui, state: &AppState) {
    let Some(view) = &state.view else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Select a product to view its weekly metrics");
        });
        return;
    };

    let series = &view.series;
    ui.horizontal(|ui: &mut Ui| {
        ui.heading(config::chart_title(&view.upc));
        ui.weak(format!("{} weekly observations", series.len()));
    });

    let colors: [Color32; 4] = series_colors();
    let values: [&[f64]; 4] = [
        &series.revenue,
        &series.units,
        &series.pr_metric,
        &series.d_metric,
    ];
    let labels: Vec<String> = series.weeks.iter().map(Week::to_string).collect();
    let labelled = series.weeks.iter().any(|w| matches!(w, Week::Label(_)));

    let mut plot = Plot::new("product_chart")
        .legend(Legend::default())
        .x_axis_label("Week")
        .y_axis_label("Metrics")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true);

    if labelled {
        plot = plot.x_axis_formatter(move |mark: GridMark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > f64::EPSILON || idx < 0.0 {
                return String::new();
            }
            labels.get(idx as usize).cloned().unwrap_or_default()
        });
    }

    plot.show(ui, |plot_ui| {
        for (s, ((name, ys), color)) in SERIES_NAMES
            .iter()
            .zip(values)
            .zip(colors)
            .enumerate()
        {
            let chart = BarChart::new(grouped_bars(series, ys, s))
                .name(*name)
                .color(color);
            plot_ui.bar_chart(chart);
        }
    });
}

/// Bars for series number `slot`, offset so the four series sit side by side
/// within each week.
fn grouped_bars(series: &ChartSeries, ys: &[f64], slot: usize) -> Vec<Bar> {
    let bar_width = GROUP_WIDTH / SERIES_NAMES.len() as f64;
    let offset = (slot as f64 - (SERIES_NAMES.len() as f64 - 1.0) / 2.0) * bar_width;

    series
        .weeks
        .iter()
        .zip(ys)
        .enumerate()
        .map(|(i, (week, &y))| {
            Bar::new(week.axis_value(i) + offset, y)
                .width(bar_width)
                .name(format!("{} {week}", SERIES_NAMES[slot]))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bars_are_centered_around_the_week() {
        let series = ChartSeries {
            weeks: vec![Week::Ordinal(10), Week::Ordinal(11)],
            revenue: vec![1.0, 2.0],
            units: vec![3.0, 4.0],
            pr_metric: vec![0.1, 0.2],
            d_metric: vec![0.3, 0.4],
        };
        let first = grouped_bars(&series, &series.revenue, 0);
        let last = grouped_bars(&series, &series.d_metric, 3);
        assert_eq!(first.len(), 2);
        assert!((first[0].argument - (10.0 - 0.3)).abs() < 1e-9);
        assert!((last[1].argument - (11.0 + 0.3)).abs() < 1e-9);
        assert_eq!(last[1].value, 0.4);
    }

    #[test]
    fn labelled_weeks_use_row_position() {
        let series = ChartSeries {
            weeks: vec![Week::Label("a".into()), Week::Label("b".into())],
            revenue: vec![1.0, 2.0],
            ..Default::default()
        };
        let bars = grouped_bars(&series, &series.revenue, 1);
        assert!((bars[1].argument - (1.0 - 0.1)).abs() < 1e-9);
    }
}
