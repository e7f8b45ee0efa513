//! egui editor: two rotary knobs on a dark slate panel.

use crate::params::ReverbPluginParams;
use nih_plug::prelude::*;
use nih_plug_egui::{create_egui_editor, egui};
use reverb_dsp::{ParamSpec, DECAY_TIME, ROOM_SIZE};
use std::f32::consts::PI;
use std::sync::Arc;

const BG: egui::Color32 = egui::Color32::from_rgb(0x22, 0x23, 0x2a);
const TEXT: egui::Color32 = egui::Color32::WHITE;
const TEXT_DIM: egui::Color32 = egui::Color32::LIGHT_GRAY;
const OUTLINE: egui::Color32 = egui::Color32::from_rgb(47, 79, 79);
const KNOB_FACE: egui::Color32 = egui::Color32::from_rgb(0x2c, 0x2e, 0x37);
const ROOM_FILL: egui::Color32 = egui::Color32::from_rgb(0, 191, 255);
const DECAY_FILL: egui::Color32 = egui::Color32::from_rgb(255, 165, 0);

const KNOB_SIZE: f32 = 100.0;
/// Knob travel per pixel of drag.
const DRAG_SENSITIVITY: f32 = 1.0 / 200.0;
/// Sweep from bottom-left, over the top, to bottom-right.
const ARC_START: f32 = 0.75 * PI;
const ARC_END: f32 = 2.25 * PI;
const ARC_SEGMENTS: usize = 48;

pub fn create(params: Arc<ReverbPluginParams>) -> Option<Box<dyn Editor>> {
    create_egui_editor(
        params.editor_state.clone(),
        (),
        |egui_ctx, _state| {
            let mut style = (*egui_ctx.style()).clone();
            style.visuals.dark_mode = true;
            style.visuals.panel_fill = BG;
            style.visuals.override_text_color = Some(TEXT);
            egui_ctx.set_style(style);
        },
        move |egui_ctx, setter, _state| {
            egui::CentralPanel::default().show(egui_ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.add_space(6.0);
                    ui.label(egui::RichText::new("Stereo Reverb").size(22.0).color(TEXT));
                });
                ui.add_space(8.0);

                ui.columns(2, |columns| {
                    columns[0].vertical_centered(|ui| {
                        knob(ui, &params.room_size, &ROOM_SIZE, setter, ROOM_FILL);
                    });
                    columns[1].vertical_centered(|ui| {
                        knob(ui, &params.decay, &DECAY_TIME, setter, DECAY_FILL);
                    });
                });
            });
        },
    )
}

/// Rotary control bound to `param`. Drag right or up to increase,
/// double-click to reset.
fn knob(
    ui: &mut egui::Ui,
    param: &FloatParam,
    spec: &ParamSpec,
    setter: &ParamSetter,
    fill: egui::Color32,
) {
    ui.label(egui::RichText::new(spec.label).size(14.0).color(TEXT_DIM));

    let (rect, response) = ui.allocate_exact_size(
        egui::vec2(KNOB_SIZE, KNOB_SIZE),
        egui::Sense::click_and_drag(),
    );

    // Unsnapped knob position for the current drag. Rebuilding it from the
    // stepped value each frame would swallow small movements.
    let drag_id = response.id.with("drag_position");
    if response.double_clicked() {
        set_plain(setter, param, spec.default);
    } else if response.dragged() {
        let delta = response.drag_delta();
        let start = ui
            .ctx()
            .data(|d| d.get_temp::<f32>(drag_id))
            .unwrap_or_else(|| spec.to_normalized(param.value()));
        let position = (start + (delta.x - delta.y) * DRAG_SENSITIVITY).clamp(0.0, 1.0);
        ui.ctx().data_mut(|d| d.insert_temp(drag_id, position));
        if delta != egui::Vec2::ZERO {
            set_plain(setter, param, spec.from_normalized(position));
        }
    }
    if response.drag_stopped() {
        ui.ctx().data_mut(|d| d.remove::<f32>(drag_id));
    }

    let position = spec.to_normalized(param.value());
    let painter = ui.painter_at(rect);
    let center = rect.center();
    let radius = rect.width() * 0.5 - 6.0;

    painter.circle_filled(center, radius - 8.0, KNOB_FACE);
    painter.add(egui::Shape::line(
        arc_points(center, radius, ARC_START, ARC_END),
        egui::Stroke::new(5.0, OUTLINE),
    ));
    let value_angle = ARC_START + (ARC_END - ARC_START) * position;
    if position > 0.0 {
        painter.add(egui::Shape::line(
            arc_points(center, radius, ARC_START, value_angle),
            egui::Stroke::new(5.0, fill),
        ));
    }
    let tip = center + (radius - 12.0) * egui::vec2(value_angle.cos(), value_angle.sin());
    painter.line_segment([center, tip], egui::Stroke::new(2.0, TEXT));

    let text = param.normalized_value_to_string(param.unmodulated_normalized_value(), true);
    ui.label(egui::RichText::new(text).monospace().color(TEXT));
}

fn arc_points(center: egui::Pos2, radius: f32, from: f32, to: f32) -> Vec<egui::Pos2> {
    (0..=ARC_SEGMENTS)
        .map(|i| {
            let angle = from + (to - from) * i as f32 / ARC_SEGMENTS as f32;
            center + radius * egui::vec2(angle.cos(), angle.sin())
        })
        .collect()
}

fn set_plain(setter: &ParamSetter, param: &FloatParam, value: f32) {
    setter.begin_set_parameter(param);
    setter.set_parameter(param, value);
    setter.end_set_parameter(param);
}
