use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::SalesTable;
use crate::state::{AppState, Tab};
use crate::ui::plot;

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

        ui.selectable_value(&mut state.active_tab, Tab::Kpis, "📊 KPIs");
        ui.selectable_value(&mut state.active_tab, Tab::TimeSeries, "📈 Time Series Chart");

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} rows loaded, {} products offered",
                ds.len(),
                state.product_options.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Time Series tab
// ---------------------------------------------------------------------------

/// Product filter widgets, header attributes and the weekly chart.
pub fn time_series_tab(ui: &mut Ui, state: &mut AppState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to view products  (File → Open…)");
        });
        return;
    }

    let mut only = state.only_known_vendors;
    if ui.checkbox(&mut only, "Only PepsiCo Products").changed() {
        state.set_only_known_vendors(only);
    }

    product_selector(ui, state);
    ui.separator();

    product_header(ui, state);
    ui.separator();

    if let Some(view) = &state.view {
        egui::CollapsingHeader::new(format!("Matched rows ({})", view.matched.len()))
            .default_open(false)
            .show(ui, |ui: &mut Ui| matched_rows_table(ui, &view.matched));
    }

    plot::product_chart(ui, state);
}

fn product_selector(ui: &mut Ui, state: &mut AppState) {
    let current = state.selected_upc.clone().unwrap_or_default();
    let mut picked = None;

    ui.horizontal(|ui: &mut Ui| {
        ui.label("Select Product:");
        egui::ComboBox::from_id_salt("product_selector")
            .selected_text(&current)
            .width(220.0)
            .show_ui(ui, |ui: &mut Ui| {
                for upc in &state.product_options {
                    if ui.selectable_label(current == *upc, upc).clicked() {
                        picked = Some(upc.clone());
                    }
                }
            });
    });

    if let Some(upc) = picked {
        if upc != current {
            state.select_upc(&upc);
        }
    }
}

fn product_header(ui: &mut Ui, state: &AppState) {
    let Some(view) = &state.view else {
        ui.label("No product selected.");
        return;
    };
    let header = &view.header;

    ui.columns(3, |cols| {
        cols[0].strong("🏢 Parent Company");
        cols[0].label(&header.parent_company);
        cols[1].strong("🏷 Brand");
        cols[1].label(&header.brand);
        cols[2].strong("💬 Description");
        cols[2].label(&header.description);
    });
}

fn matched_rows_table(ui: &mut Ui, matched: &SalesTable) {
    const HEADERS: [&str; 5] = ["Week", "Revenue", "Units", "Avg PR", "Avg D"];

    TableBuilder::new(ui)
        .striped(true)
        .max_scroll_height(160.0)
        .columns(Column::auto().at_least(70.0), HEADERS.len())
        .header(18.0, |mut header| {
            for title in HEADERS {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(16.0, matched.len(), |mut row| {
                let r = &matched.rows()[row.index()];
                row.col(|ui| {
                    ui.label(r.week.to_string());
                });
                row.col(|ui| {
                    ui.label(format!("{:.2}", r.dollars));
                });
                row.col(|ui| {
                    ui.label(format!("{:.0}", r.units));
                });
                row.col(|ui| {
                    ui.label(format!("{:.3}", r.pr));
                });
                row.col(|ui| {
                    ui.label(format!("{:.3}", r.d));
                });
            });
        });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open chart data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}
