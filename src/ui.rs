use egui::Context;

use crate::model::Gallery;
use crate::view::OverlayState;

/// Draw the full screen-space overlay: artwork labels at their projected
/// positions, the position readout, and the capture hint.
pub fn draw_overlay(
    ctx: &Context,
    gallery: &Gallery,
    overlay: &OverlayState,
    captured: bool,
    fps: f32,
) {
    draw_labels(ctx, gallery, overlay);
    draw_hud(ctx, overlay, captured, fps);
    if captured {
        draw_crosshair(ctx);
    } else {
        draw_capture_hint(ctx);
    }
}

/// Build the complete UI from raw input and return egui output (WASM path;
/// the native path feeds egui through egui-winit instead)
pub fn build_ui(
    egui_ctx: &Context,
    gallery: &Gallery,
    overlay: &OverlayState,
    captured: bool,
    canvas_width: u32,
    canvas_height: u32,
    pixels_per_point: f32,
    dt: f32,
    now: f64,
) -> egui::FullOutput {
    egui_ctx.set_pixels_per_point(pixels_per_point);
    let mut raw_input = egui::RawInput::default();
    raw_input.time = Some(now / 1000.0);
    raw_input.screen_rect = Some(egui::Rect::from_min_size(
        egui::Pos2::new(0.0, 0.0),
        egui::vec2(
            canvas_width as f32 / pixels_per_point,
            canvas_height as f32 / pixels_per_point,
        ),
    ));

    let fps = if dt > 0.0 { 1.0 / dt } else { 0.0 };
    egui_ctx.run(raw_input, |ctx| {
        draw_overlay(ctx, gallery, overlay, captured, fps);
    })
}

fn draw_labels(ctx: &Context, gallery: &Gallery, overlay: &OverlayState) {
    // placements are in physical pixels, egui positions in points
    let ppp = ctx.pixels_per_point();
    for (i, (artwork, placement)) in gallery
        .artworks
        .iter()
        .zip(&overlay.labels)
        .enumerate()
    {
        // binary opacity: a hidden label is simply not drawn
        if !placement.visible {
            continue;
        }
        egui::Area::new(egui::Id::new(("artwork_label", i)))
            .fixed_pos(egui::pos2(placement.x / ppp, placement.y / ppp))
            .pivot(egui::Align2::CENTER_BOTTOM)
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                egui::Frame::NONE
                    .fill(egui::Color32::from_black_alpha(160))
                    .inner_margin(6.0)
                    .corner_radius(egui::CornerRadius::same(4))
                    .show(ui, |ui| {
                        ui.label(
                            egui::RichText::new(artwork.title)
                                .strong()
                                .color(egui::Color32::WHITE),
                        );
                        ui.label(
                            egui::RichText::new(format!("{}, {}", artwork.artist, artwork.year))
                                .small()
                                .color(egui::Color32::LIGHT_GRAY),
                        );
                    });
            });
    }
}

fn draw_hud(ctx: &Context, overlay: &OverlayState, captured: bool, fps: f32) {
    egui::Window::new("Gallery")
        .default_pos([8.0, 8.0])
        .show(ctx, |ui| {
            ui.label(egui::RichText::new(format!("FPS: {fps:.0}")).small());
            ui.label(egui::RichText::new(format!("Pos: {}", overlay.position_readout)).small());
            ui.separator();
            ui.label(egui::RichText::new("Controls:").small());
            ui.label(egui::RichText::new("WASD / Arrows - Walk").small());
            ui.label(egui::RichText::new("Space - Rise").small());
            ui.label(egui::RichText::new("C - Sink").small());
            ui.label(egui::RichText::new("Shift - Run").small());
            ui.label(egui::RichText::new("Esc - Release mouse").small());
            if !captured {
                ui.separator();
                ui.label(egui::RichText::new("Click to look around").small());
            }
        });
}

fn draw_capture_hint(ctx: &Context) {
    egui::Area::new(egui::Id::new("capture_hint"))
        .anchor(egui::Align2::CENTER_BOTTOM, [0.0, -24.0])
        .show(ctx, |ui| {
            egui::Frame::NONE
                .fill(egui::Color32::from_black_alpha(120))
                .inner_margin(8.0)
                .corner_radius(egui::CornerRadius::same(4))
                .show(ui, |ui| {
                    ui.label(
                        egui::RichText::new("Click to explore the gallery")
                            .color(egui::Color32::WHITE),
                    );
                });
        });
}

fn draw_crosshair(ctx: &Context) {
    let painter = ctx.layer_painter(egui::LayerId::new(
        egui::Order::TOP,
        egui::Id::new("crosshair"),
    ));
    let center = ctx.available_rect().center();
    let size = 10.0;
    painter.line_segment(
        [
            egui::Pos2::new(center.x - size, center.y),
            egui::Pos2::new(center.x + size, center.y),
        ],
        egui::Stroke::new(1.0, egui::Color32::WHITE),
    );
    painter.line_segment(
        [
            egui::Pos2::new(center.x, center.y - size),
            egui::Pos2::new(center.x, center.y + size),
        ],
        egui::Stroke::new(1.0, egui::Color32::WHITE),
    );
}
