// ui.rs — egui chrome: menu bar, status bar and the marker overlay

use crate::i18n::{tr, tr_with, LANGUAGES};
use crate::marker::{MarkerId, MarkerShape};
use crate::viewer::{FrameState, PanoramaViewer};
use glam::Vec2;
use image::RgbaImage;
use std::collections::HashMap;
use std::path::PathBuf;

const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "bmp"];

/// Requests from the UI that the event loop has to carry out.
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    OpenPanorama { slot: usize, path: PathBuf },
    ToggleFullscreen,
    LanguageChanged,
    Exit,
}

pub struct UiState {
    pub show_fps: bool,
    pub fps: f32,
    pub pending_loads: usize,
    pub is_fullscreen: bool,
    pub current_lang: String,
    marker_icons: HashMap<MarkerId, egui::TextureHandle>,
}

impl UiState {
    pub fn new(lang: String) -> Self {
        Self {
            show_fps: false,
            fps: 0.0,
            pending_loads: 0,
            is_fullscreen: false,
            current_lang: lang,
            marker_icons: HashMap::new(),
        }
    }

    pub fn register_icon(&mut self, ctx: &egui::Context, id: MarkerId, img: &RgbaImage) {
        let size = [img.width() as usize, img.height() as usize];
        let color = egui::ColorImage::from_rgba_unmultiplied(size, img.as_raw());
        let handle = ctx.load_texture(format!("marker-{}", id.0), color, egui::TextureOptions::LINEAR);
        self.marker_icons.insert(id, handle);
    }
}

pub fn pick_image_file() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .add_filter(&tr("file.filter.images"), &IMAGE_EXTENSIONS)
        .pick_file()
}

pub fn draw_ui(
    ctx: &egui::Context,
    viewer: &mut PanoramaViewer,
    state: &mut UiState,
    frame: &FrameState,
) -> Vec<UiAction> {
    let mut actions = Vec::new();

    draw_markers(ctx, viewer, state);

    egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        egui::menu::bar(ui, |ui| {
            ui.menu_button(tr("menu.file"), |ui| {
                for slot in 0..crate::config::MAX_PANORAMAS {
                    let label = tr_with("menu.open_panorama", &[("slot", (slot + 1).to_string())]);
                    if ui.button(label).clicked() {
                        ui.close_menu();
                        if let Some(path) = pick_image_file() {
                            actions.push(UiAction::OpenPanorama { slot, path });
                        }
                    }
                }
                if ui.button(tr("menu.exit")).clicked() {
                    actions.push(UiAction::Exit);
                }
            });

            ui.menu_button(tr("menu.view"), |ui| {
                if ui.button(tr("view.reset")).clicked() {
                    viewer.reset_view();
                    ui.close_menu();
                }

                let fullscreen_label = if state.is_fullscreen {
                    tr("view.fullscreen.exit")
                } else {
                    tr("view.fullscreen.enter")
                };
                if ui.button(fullscreen_label).clicked() {
                    actions.push(UiAction::ToggleFullscreen);
                    ui.close_menu();
                }

                ui.separator();
                let mut auto_rotate = viewer.driver.auto_rotate;
                if ui.checkbox(&mut auto_rotate, tr("view.auto_rotate")).changed() {
                    viewer.driver.toggle_auto_rotate();
                }

                ui.menu_button(tr("view.input_sensitivity"), |ui| {
                    ui.add(
                        egui::Slider::new(&mut viewer.input.rotate_sensitivity, 0.001..=0.02)
                            .text(tr("view.radians_per_px")),
                    );
                    if ui.button(tr("view.reset_sensitivity")).clicked() {
                        viewer.input.rotate_sensitivity = 0.005;
                    }
                });

                ui.separator();
                ui.checkbox(&mut state.show_fps, tr("view.show_fps"));
            });

            ui.menu_button(tr("menu.language"), |ui| {
                for (code, name) in LANGUAGES {
                    if ui
                        .radio_value(&mut state.current_lang, code.to_string(), name)
                        .clicked()
                    {
                        crate::i18n::init(state.current_lang.clone());
                        actions.push(UiAction::LanguageChanged);
                        ui.close_menu();
                    }
                }
            });
        });
    });

    egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            if state.pending_loads > 0 {
                ui.label(egui::RichText::new(tr("status.loading_image")).color(egui::Color32::YELLOW));
                ui.label("|");
            }

            ui.label(tr_with("status.mode", &[("mode", tr(&format!("mode.{}", frame.mode.name())))]));
            ui.label("|");
            ui.label(tr_with("status.fov", &[("fov", format!("{:.1}", frame.fov))]));
            ui.label("|");
            ui.label(format!(
                "{:.1}° / {:.1}°",
                frame.azimuth.to_degrees(),
                frame.polar.to_degrees()
            ));
            ui.label("|");
            ui.label(tr_with(
                "status.panorama",
                &[
                    ("index", (frame.current_texture + 1).to_string()),
                    ("blend", format!("{:.2}", frame.blend)),
                ],
            ));

            if state.show_fps {
                ui.label("|");
                ui.label(egui::RichText::new(format!("FPS: {:.1}", state.fps)).color(egui::Color32::GREEN));
            }
        });
    });

    actions
}

/// Markers drawn where their 3D positions project; hit-testing stays in 3D.
fn draw_markers(ctx: &egui::Context, viewer: &PanoramaViewer, state: &UiState) {
    let ppp = ctx.pixels_per_point();
    let viewport = viewer.viewport();
    let camera = &viewer.scene.camera;
    let painter = ctx.layer_painter(egui::LayerId::background());

    for marker in &viewer.scene.markers {
        let Some(px) = camera.project(marker.position, viewport) else {
            continue;
        };
        let scale = camera.pixels_per_unit(marker.position, viewport) / ppp;
        let center = egui::pos2(px.x / ppp, px.y / ppp);

        let half = match marker.shape {
            MarkerShape::Sprite { size } => {
                let extent = Vec2::from(size) * scale;
                let rect = egui::Rect::from_center_size(center, egui::vec2(extent.x, extent.y));
                match state.marker_icons.get(&marker.id) {
                    Some(icon) => painter.image(
                        icon.id(),
                        rect,
                        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                        egui::Color32::WHITE,
                    ),
                    None => painter.rect_filled(rect, 4.0, egui::Color32::from_white_alpha(180)),
                };
                extent.y * 0.5
            }
            MarkerShape::Arrow { radius } => {
                let r = radius * scale;
                let points = vec![
                    center + egui::vec2(0.0, -r),
                    center + egui::vec2(r * 0.8, r * 0.6),
                    center + egui::vec2(-r * 0.8, r * 0.6),
                ];
                painter.add(egui::Shape::convex_polygon(
                    points,
                    egui::Color32::from_rgba_unmultiplied(255, 200, 40, 200),
                    egui::Stroke::new(1.5, egui::Color32::BLACK),
                ));
                r
            }
        };

        if let Some(label) = &marker.label {
            painter.text(
                center + egui::vec2(0.0, half + 4.0),
                egui::Align2::CENTER_TOP,
                label,
                egui::FontId::proportional(14.0),
                egui::Color32::WHITE,
            );
        }
    }
}
