//! Data models for option chains and plot data
//!
//! This module contains the option-side and metric types, the nested chain
//! maps returned by the market-data provider, and the axis/point records fed
//! to the 3D view.

mod axis;
mod chain;
mod option;

pub use axis::*;
pub use chain::*;
pub use option::*;
