//! Einstellungs-Panel (Objekte, Stil, Verhalten).

use eframe::egui;

use crate::app::ViewerIntent;
use crate::core::SceneGroup;
use crate::shared::ViewerOptions;

/// Zeichnet das linke Einstellungs-Panel und sammelt Intents ein.
pub fn render_settings_panel(ctx: &egui::Context, options: &ViewerOptions) -> Vec<ViewerIntent> {
    let mut intents = Vec::new();

    egui::SidePanel::left("settings_panel")
        .default_width(240.0)
        .show(ctx, |ui| {
            ui.heading("Szenen-Viewer");
            ui.separator();

            egui::CollapsingHeader::new("Objects")
                .default_open(true)
                .show(ui, |ui| {
                    group_checkbox(ui, &mut intents, "Walls", SceneGroup::Walls, options.show_walls);
                    group_checkbox(
                        ui,
                        &mut intents,
                        "Any",
                        SceneGroup::Primitives,
                        options.show_primitives,
                    );
                    group_checkbox(ui, &mut intents, "Box", SceneGroup::Box, options.show_box);
                });

            egui::CollapsingHeader::new("Style")
                .default_open(true)
                .show(ui, |ui| {
                    let mut fill_opacity = options.fill_opacity;
                    if ui
                        .add(
                            egui::Slider::new(&mut fill_opacity, 0.0..=1.0)
                                .step_by(0.1)
                                .text("Fill opacity"),
                        )
                        .changed()
                    {
                        intents.push(ViewerIntent::SetFillOpacity(fill_opacity));
                    }

                    let mut stroke_opacity = options.stroke_opacity;
                    if ui
                        .add(
                            egui::Slider::new(&mut stroke_opacity, 0.0..=1.0)
                                .step_by(0.1)
                                .text("Stroke opacity"),
                        )
                        .changed()
                    {
                        intents.push(ViewerIntent::SetStrokeOpacity(stroke_opacity));
                    }

                    let mut stroke_width = options.stroke_width;
                    if ui
                        .add(
                            egui::Slider::new(&mut stroke_width, 0.0..=10.0)
                                .step_by(0.1)
                                .text("Stroke width"),
                        )
                        .changed()
                    {
                        intents.push(ViewerIntent::SetStrokeWidth(stroke_width));
                    }

                    let mut feather = options.feather_px;
                    if ui
                        .add(
                            egui::Slider::new(&mut feather, 0.0..=4.0)
                                .step_by(0.5)
                                .text("Feather"),
                        )
                        .changed()
                    {
                        intents.push(ViewerIntent::SetFeather(feather));
                    }

                    let mut rings = options.outline_rings;
                    if ui
                        .add(egui::Slider::new(&mut rings, 1..=3).text("Rings"))
                        .changed()
                    {
                        intents.push(ViewerIntent::SetOutlineRings(rings));
                    }
                });

            egui::CollapsingHeader::new("Behavior")
                .default_open(true)
                .show(ui, |ui| {
                    let mut background = options.background;
                    if ui.checkbox(&mut background, "Background").changed() {
                        intents.push(ViewerIntent::SetBackgroundVisible(background));
                    }

                    let mut rotate = options.rotate;
                    if ui.checkbox(&mut rotate, "Rotate").changed() {
                        intents.push(ViewerIntent::SetRotate(rotate));
                    }
                });

            ui.separator();

            if ui.button("Panorama laden…").clicked() {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("Bilder", &["jpg", "jpeg", "png"])
                    .pick_file()
                {
                    intents.push(ViewerIntent::LoadPanorama { path });
                }
            }
            if ui.button("Panorama entfernen").clicked() {
                intents.push(ViewerIntent::ClearPanorama);
            }

            ui.separator();

            if ui.button("Reset").clicked() {
                intents.push(ViewerIntent::ResetOptions);
            }
        });

    intents
}

fn group_checkbox(
    ui: &mut egui::Ui,
    intents: &mut Vec<ViewerIntent>,
    label: &str,
    group: SceneGroup,
    current: bool,
) {
    let mut visible = current;
    if ui.checkbox(&mut visible, label).changed() {
        intents.push(ViewerIntent::SetGroupVisible { group, visible });
    }
}
