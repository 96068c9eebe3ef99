// Settings overlay - egui menu bar for the user display settings
//
// The overlay edits a Settings value in place and reports what the host
// must do afterwards (apply, save, reload). It draws nothing itself; the
// host runs it inside its egui render loop.

use crate::settings::Settings;
use crate::shader::ShaderKind;
use std::time::{Duration, Instant};

/// How long the menu bar stays visible after the last pointer activity
pub const AUTOHIDE_DELAY: Duration = Duration::from_secs(3);

/// What the user asked for during one `show` call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverlayResponse {
    /// File > Save config
    pub save: bool,
    /// File > Reload config
    pub reload: bool,
    /// A setting was edited and must be applied
    pub changed: bool,
}

impl OverlayResponse {
    pub fn is_empty(&self) -> bool {
        !(self.save || self.reload || self.changed)
    }
}

/// Settings menu bar with its tint and credits windows
pub struct SettingsOverlay {
    show_tint_window: bool,
    show_credits: bool,
    last_activity: Option<Instant>,
}

impl SettingsOverlay {
    pub fn new() -> Self {
        Self {
            show_tint_window: false,
            show_credits: false,
            last_activity: None,
        }
    }

    /// Record pointer or touch activity at `now`
    pub fn touch(&mut self, now: Instant) {
        self.last_activity = Some(now);
    }

    /// Whether the menu bar is drawn at `now`
    ///
    /// Without auto-hide the bar is always visible. With it, the bar shows
    /// only within `AUTOHIDE_DELAY` of the last activity.
    pub fn is_bar_visible(&self, autohide: bool, now: Instant) -> bool {
        if !autohide {
            return true;
        }

        self.last_activity
            .is_some_and(|last| now.saturating_duration_since(last) < AUTOHIDE_DELAY)
    }

    pub fn is_tint_window_open(&self) -> bool {
        self.show_tint_window
    }

    pub fn is_credits_open(&self) -> bool {
        self.show_credits
    }

    /// Render the overlay
    ///
    /// Call once per frame from the egui render loop.
    pub fn show(&mut self, ctx: &egui::Context, settings: &mut Settings, fps: f32) -> OverlayResponse {
        self.show_at(ctx, settings, fps, Instant::now())
    }

    /// Render the overlay as if the current time were `now`
    pub fn show_at(
        &mut self,
        ctx: &egui::Context,
        settings: &mut Settings,
        fps: f32,
        now: Instant,
    ) -> OverlayResponse {
        let mut response = OverlayResponse::default();

        let active = ctx.input(|i| {
            i.events.iter().any(|event| {
                matches!(
                    event,
                    egui::Event::PointerMoved(_)
                        | egui::Event::PointerButton { .. }
                        | egui::Event::Touch { .. }
                )
            })
        });
        if active {
            self.touch(now);
        }

        if self.is_bar_visible(settings.autohide, now) {
            self.show_menu_bar(ctx, settings, fps, &mut response);
        }

        if self.show_tint_window {
            egui::Window::new("Tint")
                .open(&mut self.show_tint_window)
                .resizable(false)
                .show(ctx, |ui| {
                    if ui.checkbox(&mut settings.tint_enabled, "Enable tint").changed() {
                        response.changed = true;
                    }
                    ui.horizontal(|ui| {
                        ui.label("Color");
                        if ui.color_edit_button_rgb(&mut settings.tint_color).changed() {
                            response.changed = true;
                        }
                    });
                });
        }

        if self.show_credits {
            egui::Window::new("Credits")
                .open(&mut self.show_credits)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label(egui::RichText::new(env!("CARGO_PKG_NAME")).strong());
                    ui.label(format!("Version {}", env!("CARGO_PKG_VERSION")));
                    ui.separator();
                    ui.label("Palette, display mode and shader plumbing.");
                });
        }

        response
    }

    fn show_menu_bar(
        &mut self,
        ctx: &egui::Context,
        settings: &mut Settings,
        fps: f32,
        response: &mut OverlayResponse,
    ) {
        egui::TopBottomPanel::top("settings_menu_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Save config").clicked() {
                        response.save = true;
                    }
                    if ui.button("Reload config").clicked() {
                        response.reload = true;
                    }
                });

                ui.menu_button("Graphics", |ui| {
                    if ui.checkbox(&mut settings.fullscreen, "Fullscreen").changed() {
                        response.changed = true;
                    }
                    if ui.checkbox(&mut settings.bilinear, "Bilinear filter").changed() {
                        response.changed = true;
                    }
                    if ui.button("Tint config").clicked() {
                        self.show_tint_window = true;
                    }
                    ui.separator();

                    ui.menu_button("Shaders", |ui| {
                        for kind in ShaderKind::ALL {
                            if ui.radio_value(&mut settings.shader, kind, kind.label()).clicked() {
                                response.changed = true;
                            }
                        }
                    });
                });

                ui.menu_button("Options", |ui| {
                    if ui.checkbox(&mut settings.autohide, "Auto-hide menu bar").changed() {
                        response.changed = true;
                    }
                });

                ui.menu_button("Info", |ui| {
                    if ui.button("Credits").clicked() {
                        self.show_credits = true;
                    }
                });

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(format!("{:.0} FPS", fps));
                });
            });
        });
    }
}

impl Default for SettingsOverlay {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(
        overlay: &mut SettingsOverlay,
        settings: &mut Settings,
        input: egui::RawInput,
        now: Instant,
    ) -> OverlayResponse {
        let ctx = egui::Context::default();
        let mut response = OverlayResponse::default();
        let _ = ctx.run(input, |ctx| {
            response = overlay.show_at(ctx, settings, 60.0, now);
        });
        response
    }

    #[test]
    fn test_idle_frame_changes_nothing() {
        let mut overlay = SettingsOverlay::new();
        let mut settings = Settings::default();

        let response = run(&mut overlay, &mut settings, egui::RawInput::default(), Instant::now());

        assert!(response.is_empty());
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_bar_always_visible_without_autohide() {
        let overlay = SettingsOverlay::new();
        assert!(overlay.is_bar_visible(false, Instant::now()));
    }

    #[test]
    fn test_autohide_needs_recent_activity() {
        let mut overlay = SettingsOverlay::new();
        let start = Instant::now();
        assert!(!overlay.is_bar_visible(true, start));

        overlay.touch(start);
        assert!(overlay.is_bar_visible(true, start + Duration::from_secs(2)));
        assert!(!overlay.is_bar_visible(true, start + AUTOHIDE_DELAY));
    }

    #[test]
    fn test_pointer_movement_counts_as_activity() {
        let mut overlay = SettingsOverlay::new();
        let mut settings = Settings {
            autohide: true,
            ..Settings::default()
        };
        let now = Instant::now();
        let input = egui::RawInput {
            events: vec![egui::Event::PointerMoved(egui::pos2(10.0, 10.0))],
            ..Default::default()
        };

        run(&mut overlay, &mut settings, input, now);

        assert!(overlay.is_bar_visible(true, now + Duration::from_secs(1)));
    }

    #[test]
    fn test_windows_start_closed() {
        let overlay = SettingsOverlay::default();
        assert!(!overlay.is_tint_window_open());
        assert!(!overlay.is_credits_open());
    }
}
