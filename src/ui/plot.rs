use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoints};

use crate::color::GaugeColors;
use crate::coordinator::{ChartKind, ChartOutput};
use crate::state::AppState;

const CHART_HEIGHT: f32 = 240.0;
const SECONDS_PER_DAY: f64 = 86_400.0;

// ---------------------------------------------------------------------------
// Chart grid (central panel)
// ---------------------------------------------------------------------------

/// Render all dashboard charts from the coordinator's current outputs.
pub fn charts(ui: &mut Ui, state: &AppState) {
    let Some(coordinator) = &state.coordinator else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a precipitation file to start  (File → Open…)");
        });
        return;
    };
    let colors = state.gauge_colors.as_ref();

    for kind in [ChartKind::RainfallSeries, ChartKind::AccumulationSeries] {
        ui.strong(kind.title());
        if let ChartOutput::Series(series) = coordinator.chart(kind) {
            series_chart(ui, kind, series, colors);
        }
        ui.add_space(8.0);
    }

    ui.columns(2, |cols| {
        cols[0].strong(ChartKind::RainfallTotals.title());
        if let ChartOutput::Sums(sums) = coordinator.chart(ChartKind::RainfallTotals) {
            gauge_bar_chart(&mut cols[0], "totals", sums.iter().map(|(g, &v)| (g, v)), colors);
        }

        cols[1].strong(ChartKind::GaugeShares.title());
        if let ChartOutput::Shares(shares) = coordinator.chart(ChartKind::GaugeShares) {
            // Undefined shares (zero grand total) simply draw no bar.
            let finite = shares
                .iter()
                .filter_map(|(g, s)| s.as_f64().map(|v| (g, v)));
            gauge_bar_chart(&mut cols[1], "shares", finite, colors);
        }
    });
    ui.add_space(8.0);

    ui.strong(ChartKind::DailyTotals.title());
    if let ChartOutput::BucketedTotals(totals) = coordinator.chart(ChartKind::DailyTotals) {
        daily_histogram(ui, totals, colors);
    }
}

fn color_for(colors: Option<&GaugeColors>, gauge: &str) -> Color32 {
    colors
        .map(|c| c.color_for(gauge))
        .unwrap_or(Color32::LIGHT_BLUE)
}

// ---------------------------------------------------------------------------
// Per-gauge time-series lines
// ---------------------------------------------------------------------------

fn series_chart(
    ui: &mut Ui,
    kind: ChartKind,
    series: &std::collections::BTreeMap<String, Vec<(chrono::NaiveDateTime, f64)>>,
    colors: Option<&GaugeColors>,
) {
    Plot::new(kind.title())
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .y_axis_label("mm")
        .x_axis_formatter(format_date_mark)
        .show(ui, |plot_ui| {
            for (gauge, points) in series {
                let plot_points: PlotPoints = points
                    .iter()
                    .map(|&(ts, v)| [ts.and_utc().timestamp() as f64, v])
                    .collect();
                plot_ui.line(
                    Line::new(plot_points)
                        .name(gauge)
                        .color(color_for(colors, gauge))
                        .width(1.5),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// One bar per gauge (totals and shares)
// ---------------------------------------------------------------------------

fn gauge_bar_chart<'a>(
    ui: &mut Ui,
    id: &str,
    values: impl Iterator<Item = (&'a String, f64)>,
    colors: Option<&GaugeColors>,
) {
    let values: Vec<(&String, f64)> = values.collect();
    let names: Vec<String> = values.iter().map(|(g, _)| (*g).clone()).collect();

    Plot::new(id)
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .x_axis_formatter(move |mark: GridMark, _range: &std::ops::RangeInclusive<f64>| {
            let idx = mark.value.round() as i64;
            if (mark.value - idx as f64).abs() < 1e-6 && idx >= 0 && (idx as usize) < names.len() {
                names[idx as usize].clone()
            } else {
                String::new()
            }
        })
        .show(ui, |plot_ui| {
            for (i, (gauge, value)) in values.iter().enumerate() {
                let chart = BarChart::new(vec![Bar::new(i as f64, *value).width(0.6)])
                    .name(*gauge)
                    .color(color_for(colors, gauge));
                plot_ui.bar_chart(chart);
            }
        });
}

// ---------------------------------------------------------------------------
// Per-day histogram
// ---------------------------------------------------------------------------

fn daily_histogram(
    ui: &mut Ui,
    totals: &std::collections::BTreeMap<String, std::collections::BTreeMap<chrono::NaiveDate, f64>>,
    colors: Option<&GaugeColors>,
) {
    let n = totals.len().max(1);
    let bar_width = SECONDS_PER_DAY * 0.8 / n as f64;

    Plot::new("daily_totals")
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .y_axis_label("mm")
        .x_axis_formatter(format_date_mark)
        .show(ui, |plot_ui| {
            for (gi, (gauge, days)) in totals.iter().enumerate() {
                // Offset each gauge's bars so days with several gauges show
                // side by side.
                let offset = (gi as f64 - (n as f64 - 1.0) / 2.0) * bar_width;
                let bars: Vec<Bar> = days
                    .iter()
                    .map(|(&day, &total)| {
                        let midday = day
                            .and_hms_opt(12, 0, 0)
                            .map(|ts| ts.and_utc().timestamp() as f64)
                            .unwrap_or_default();
                        Bar::new(midday + offset, total).width(bar_width)
                    })
                    .collect();
                plot_ui.bar_chart(
                    BarChart::new(bars)
                        .name(gauge)
                        .color(color_for(colors, gauge)),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Axis helpers
// ---------------------------------------------------------------------------

fn format_date_mark(mark: GridMark, _range: &std::ops::RangeInclusive<f64>) -> String {
    chrono::DateTime::from_timestamp(mark.value as i64, 0)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}
