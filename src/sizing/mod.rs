//! Load aggregation and component sizing.

pub mod battery;
pub mod load;
pub mod panel;

pub use battery::{required_battery_ah, BatterySizer, BatterySizing, DEPTH_OF_DISCHARGE};
pub use load::{ApplianceUsage, EnergyProfile, LoadAnalysis, LoadModel};
pub use panel::{required_panel_watts, PanelSizer, PanelSizing, PanelSizingDetails};
