use eframe::egui::{self, RichText, Ui};

// ---------------------------------------------------------------------------
// KPI tab – fixed headline figures for the 2011 New York market
// ---------------------------------------------------------------------------

/// A headline metric card.
pub struct Metric {
    pub label: &'static str,
    pub value: &'static str,
}

/// A titled top-3 list.
pub struct Ranking {
    pub title: &'static str,
    pub entries: [&'static str; 3],
}

pub const LEFT_METRICS: [Metric; 2] = [
    Metric {
        label: "💰 2011 Revenue",
        value: "$332,054,362",
    },
    Metric {
        label: "🤹 Market Share",
        value: "59.13%",
    },
];

pub const RIGHT_METRICS: [Metric; 2] = [
    Metric {
        label: "🔢 2011 Units Sold",
        value: "126,315,847 units",
    },
    Metric {
        label: "📦 VSoD",
        value: "3,956,230 units (50.53%)",
    },
];

pub const TOP_REGIONS: Ranking = Ranking {
    title: "🌎 Top 3 Regions in NY in 2011",
    entries: ["Los Angeles", "New York", "Chicago"],
};

pub const TOP_CUSTOMERS: Ranking = Ranking {
    title: "👥 Top Customers in NY in 2011",
    entries: ["Chain98", "Chain112", "Chain5"],
};

pub const TOP_PRODUCTS: Ranking = Ranking {
    title: "🥨 Market-wide Top Products in NY in 2011 with avg PR",
    entries: [
        "00-03-28400-03345 (0.542)",
        "00-01-28400-03875 (0.545)",
        "00-02-28400-06408 (0.466)",
    ],
};

/// Render the KPI tab.
pub fn kpi_tab(ui: &mut Ui) {
    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.columns(2, |cols| {
                for m in &LEFT_METRICS {
                    metric(&mut cols[0], m);
                }
                for m in &RIGHT_METRICS {
                    metric(&mut cols[1], m);
                }
            });
            ui.separator();

            ui.columns(2, |cols| {
                ranking(&mut cols[0], &TOP_REGIONS);
                ranking(&mut cols[1], &TOP_CUSTOMERS);
            });
            ui.separator();

            ranking(ui, &TOP_PRODUCTS);
        });
}

fn metric(ui: &mut Ui, m: &Metric) {
    ui.label(m.label);
    ui.label(RichText::new(m.value).size(28.0).strong());
    ui.add_space(8.0);
}

fn ranking(ui: &mut Ui, r: &Ranking) {
    ui.label(r.title);
    for (i, entry) in r.entries.iter().enumerate() {
        ui.label(RichText::new(format!("{}. {entry}", i + 1)).size(18.0).strong());
    }
    ui.add_space(8.0);
}
