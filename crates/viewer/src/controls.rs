//! Widget state for the sheet viewer, driven from the keyboard.
//!
//! Sliders are kept in `[0, 1]` slider space and mapped to physical values by
//! the mesh parameter setters, the same way a touch UI would report them.

use mesh::params::{BRIGHTNESS_RANGE, CONTRAST_RANGE, POSTERIZE_RANGE, SATURATION_RANGE};
use mesh::{ImageAdjustments, Mesh, MeshConfig, MeshEvent};
use winit::keyboard::KeyCode;

/// Slider movement per key press.
pub const SLIDER_STEP: f32 = 0.05;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slider {
    HomeSpeed,
    Damping,
    Brightness,
    Contrast,
    Saturation,
    Posterize,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ControlAction {
    ToggleFreeze,
    Reset,
    ToggleEffects,
    ToggleLinks,
    Nudge(Slider, f32),
}

impl ControlAction {
    pub fn from_key(key: KeyCode) -> Option<Self> {
        use ControlAction::*;
        let action = match key {
            KeyCode::KeyF => ToggleFreeze,
            KeyCode::KeyR => Reset,
            KeyCode::KeyE => ToggleEffects,
            KeyCode::KeyL => ToggleLinks,
            KeyCode::Digit1 => Nudge(Slider::HomeSpeed, -SLIDER_STEP),
            KeyCode::Digit2 => Nudge(Slider::HomeSpeed, SLIDER_STEP),
            KeyCode::Digit3 => Nudge(Slider::Damping, -SLIDER_STEP),
            KeyCode::Digit4 => Nudge(Slider::Damping, SLIDER_STEP),
            KeyCode::Digit5 => Nudge(Slider::Brightness, -SLIDER_STEP),
            KeyCode::Digit6 => Nudge(Slider::Brightness, SLIDER_STEP),
            KeyCode::Digit7 => Nudge(Slider::Contrast, -SLIDER_STEP),
            KeyCode::Digit8 => Nudge(Slider::Contrast, SLIDER_STEP),
            KeyCode::Digit9 => Nudge(Slider::Saturation, -SLIDER_STEP),
            KeyCode::Digit0 => Nudge(Slider::Saturation, SLIDER_STEP),
            KeyCode::Minus => Nudge(Slider::Posterize, -SLIDER_STEP),
            KeyCode::Equal => Nudge(Slider::Posterize, SLIDER_STEP),
            _ => return None,
        };
        Some(action)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Controls {
    pub home_speed: f32,
    pub damping: f32,
    pub brightness: f32,
    pub contrast: f32,
    pub saturation: f32,
    pub posterize: f32,
    pub frozen: bool,
    pub show_links: bool,
    pub adjustments: ImageAdjustments,
}

impl Default for Controls {
    fn default() -> Self {
        Self::from_config(&MeshConfig::default())
    }
}

impl Controls {
    pub fn from_config(config: &MeshConfig) -> Self {
        let adj = config.adjustments;
        Self {
            home_speed: config.home_speed_slider.clamp(0.0, 1.0),
            damping: config.damping_slider.clamp(0.0, 1.0),
            brightness: BRIGHTNESS_RANGE.slider(adj.brightness),
            contrast: CONTRAST_RANGE.slider(adj.contrast),
            saturation: SATURATION_RANGE.slider(adj.saturation),
            posterize: POSTERIZE_RANGE.slider(adj.posterize),
            frozen: false,
            show_links: false,
            adjustments: adj,
        }
    }

    /// Apply one action. Returns `true` when the mesh was reset.
    pub fn apply(&mut self, action: ControlAction, mesh: &mut Mesh) -> bool {
        match action {
            ControlAction::ToggleFreeze => {
                self.frozen = !self.frozen;
                mesh.set_frozen(self.frozen);
            }
            ControlAction::Reset => {
                mesh.reset();
                self.sync_events(mesh);
                return true;
            }
            ControlAction::ToggleEffects => {
                self.adjustments.effects_enabled = !self.adjustments.effects_enabled;
            }
            ControlAction::ToggleLinks => self.show_links = !self.show_links,
            ControlAction::Nudge(slider, delta) => {
                let value = self.slider_mut(slider);
                *value = (*value + delta).clamp(0.0, 1.0);
                let value = *value;
                match slider {
                    Slider::HomeSpeed => mesh.set_home_speed(value),
                    Slider::Damping => mesh.set_damping(value),
                    Slider::Brightness => self.adjustments.set_brightness(value),
                    Slider::Contrast => self.adjustments.set_contrast(value),
                    Slider::Saturation => self.adjustments.set_saturation(value),
                    Slider::Posterize => self.adjustments.set_posterize(value),
                }
            }
        }
        false
    }

    /// Drain mesh notifications and update the widgets they concern.
    pub fn sync_events(&mut self, mesh: &mut Mesh) {
        for event in mesh.drain_events() {
            self.on_mesh_event(event);
        }
    }

    pub fn on_mesh_event(&mut self, event: MeshEvent) {
        match event {
            MeshEvent::ResetWidgets => {
                self.home_speed = 0.5;
                self.damping = 0.5;
                self.frozen = false;
            }
        }
    }

    pub fn slider(&self, slider: Slider) -> f32 {
        match slider {
            Slider::HomeSpeed => self.home_speed,
            Slider::Damping => self.damping,
            Slider::Brightness => self.brightness,
            Slider::Contrast => self.contrast,
            Slider::Saturation => self.saturation,
            Slider::Posterize => self.posterize,
        }
    }

    fn slider_mut(&mut self, slider: Slider) -> &mut f32 {
        match slider {
            Slider::HomeSpeed => &mut self.home_speed,
            Slider::Damping => &mut self.damping,
            Slider::Brightness => &mut self.brightness,
            Slider::Contrast => &mut self.contrast,
            Slider::Saturation => &mut self.saturation,
            Slider::Posterize => &mut self.posterize,
        }
    }

    /// One-line status for the window title.
    pub fn summary(&self) -> String {
        let mut s = format!(
            "home {:.2}  damping {:.2}",
            self.home_speed, self.damping
        );
        if self.adjustments.effects_enabled {
            let a = &self.adjustments;
            s.push_str(&format!(
                "  | bright {:+.2} contrast {:.2} sat {:.2} levels {}",
                a.brightness, a.contrast, a.saturation, a.posterize as u32
            ));
        }
        if self.frozen {
            s.push_str("  [frozen]");
        }
        s
    }
}
