pub mod plot;

pub use plot::{PlotError, PlotOptions, plot_outliers, value_range};
