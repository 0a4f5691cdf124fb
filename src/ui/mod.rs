pub mod kpis;
pub mod panels;
pub mod plot;
