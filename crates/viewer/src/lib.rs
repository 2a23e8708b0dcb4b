//! Windowed viewer for the `mesh` sheet simulation.
//!
//! Renders the published vertex snapshot as a textured surface with wgpu,
//! feeds mouse and touch input through a gesture session, and exposes the
//! widget model as keyboard controls:
//!
//! | Key     | Action                    |
//! |---------|---------------------------|
//! | `F`     | freeze / unfreeze         |
//! | `R`     | reset the sheet           |
//! | `E`     | toggle image effects      |
//! | `L`     | toggle the link overlay   |
//! | `1` `2` | home speed down / up      |
//! | `3` `4` | damping down / up         |
//! | `5` `6` | brightness down / up      |
//! | `7` `8` | contrast down / up        |
//! | `9` `0` | saturation down / up      |
//! | `-` `=` | posterize levels down / up|
//!
//! Dropping an image file on the window swaps the texture and resets the
//! sheet.

pub mod app;
pub mod controls;
pub mod sheet;

pub use controls::{ControlAction, Controls, Slider};
pub use sheet::SheetApp;
