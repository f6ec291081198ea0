pub mod distribution_chart;
pub mod load_records;
pub mod ranking;
pub mod statistics;
pub mod subsets;
pub mod synthetic;
