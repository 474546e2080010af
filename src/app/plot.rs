//! Plot painting and pointer handling.

use eframe::egui;
use egui::{Align2, Color32, FontId, Pos2, Rect, Shape, Stroke, StrokeKind, Vec2};

use crate::data::mapper::{DrawLine, DrawPos};
use crate::data::points::Point;
use crate::interaction::{InteractionMode, Modifiers, PointerButton};

use super::VolcanoApp;

const AXIS_COLOR: Color32 = Color32::from_gray(160);
const THRESHOLD_COLOR: Color32 = Color32::from_gray(120);
const OVERLAP_RING: Color32 = Color32::from_rgb(255, 200, 0);
/// Pixels of wheel scroll per e-fold of zoom.
const WHEEL_ZOOM_SCALE: f64 = 200.0;

fn screen(rect: Rect, d: DrawPos) -> Pos2 {
    rect.min + Vec2::new(d.x as f32, d.y as f32)
}

/// Round tick positions covering `[min, max]`.
pub(crate) fn nice_ticks(min: f64, max: f64, target: usize) -> Vec<f64> {
    let span = max - min;
    if !(span.is_finite() && span > 0.0) || target == 0 {
        return Vec::new();
    }
    let raw = span / target as f64;
    let mag = 10f64.powf(raw.log10().floor());
    let step = [1.0, 2.0, 5.0, 10.0]
        .iter()
        .map(|m| m * mag)
        .find(|s| *s >= raw)
        .unwrap_or(10.0 * mag);
    let mut ticks = Vec::new();
    let mut t = (min / step).ceil() * step;
    while t <= max + step * 1e-9 {
        ticks.push(if t.abs() < step * 1e-9 { 0.0 } else { t });
        t += step;
    }
    ticks
}

fn tick_label(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        format!("{:.1}", v)
    }
}

fn tooltip_text(p: &Point) -> String {
    format!(
        "{}\nlog2FC: {:.3}\npadj: {:.3e}",
        p.gene,
        p.x,
        10f64.powf(-p.y)
    )
}

impl VolcanoApp {
    pub(super) fn plot_ui(&mut self, ui: &mut egui::Ui) {
        if let Some(h) = &self.headline {
            ui.vertical_centered(|ui| {
                ui.heading(h);
            });
        }
        let size = ui.available_size();
        let (rect, response) = ui.allocate_exact_size(size, egui::Sense::click_and_drag());
        let layout = *self.engine.mapper().layout();
        let m = layout.margins;
        let plot_w = rect.width() as f64 - layout.left_offset() - m.right;
        let plot_h = rect.height() as f64 - layout.top_offset() - m.bottom - layout.axis_label_padding;
        self.engine
            .set_viewport((rect.min.x as f64, rect.min.y as f64), (plot_w.max(1.0), plot_h.max(1.0)));

        self.handle_plot_input(ui, &response);

        let painter = ui.painter_at(rect);
        self.paint_axes(&painter, rect);
        if self.features.threshold_lines {
            self.paint_thresholds(&painter, rect);
        }
        self.paint_points(&painter, rect);
        if self.features.labels {
            self.paint_labels(&painter, rect);
        }
        self.paint_drag_overlay(&painter, rect);
        if self.features.tooltips {
            self.paint_tooltips(ui, &painter, rect);
        }
    }

    fn handle_plot_input(&mut self, ui: &egui::Ui, response: &egui::Response) {
        let (hover, latest, pressed, released, moved, egui_mods, time, scroll) = ui.input(|i| {
            (
                i.pointer.hover_pos(),
                i.pointer.latest_pos(),
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.delta() != Vec2::ZERO,
                i.modifiers,
                i.time,
                i.smooth_scroll_delta.y,
            )
        });
        let mods = Modifiers {
            shift: egui_mods.shift,
            alt: egui_mods.alt,
        };
        let inside = response.contains_pointer();

        let selecting = self.engine.mode() == InteractionMode::Select;
        let under = match (inside && selecting, hover) {
            (true, Some(p)) => self
                .engine
                .point_at(p.x as f64, p.y as f64)
                .map(|pt| pt.gene.clone()),
            _ => None,
        };
        if under != self.hovered_gene {
            if let Some(prev) = self.hovered_gene.take() {
                let fx = self.engine.on_point_out(&prev, time);
                self.handle_effects(fx);
            }
            if let Some(g) = &under {
                let fx = self.engine.on_point_over(g);
                self.handle_effects(fx);
            }
            self.hovered_gene = under.clone();
        }

        match self.engine.mode() {
            InteractionMode::Select => {
                if pressed && inside {
                    if let Some(pos) = hover {
                        let fx = match &under {
                            Some(gene) => self.engine.on_point_click(gene, mods),
                            None => self.engine.on_pointer_down(
                                pos.x as f64,
                                pos.y as f64,
                                PointerButton::Primary,
                                mods,
                            ),
                        };
                        self.handle_effects(fx);
                    }
                } else if moved && self.engine.controller().is_dragging() {
                    if let Some(pos) = latest {
                        let fx = self.engine.on_pointer_move(pos.x as f64, pos.y as f64, mods);
                        self.handle_effects(fx);
                    }
                }
                if released {
                    let fx = self.engine.on_pointer_up();
                    self.handle_effects(fx);
                }
            }
            InteractionMode::PanZoom => {
                if response.dragged() {
                    let d = response.drag_delta();
                    self.engine.on_pan(d.x as f64, d.y as f64);
                }
                if inside && scroll != 0.0 {
                    if let Some(pos) = hover {
                        let factor = (scroll as f64 / WHEEL_ZOOM_SCALE).exp();
                        self.engine.on_wheel_zoom(factor, pos.x as f64, pos.y as f64);
                    }
                }
                if response.double_clicked() {
                    self.engine.reset_view();
                }
            }
        }
    }

    fn paint_axes(&self, painter: &egui::Painter, rect: Rect) {
        let mapper = self.engine.mapper();
        let layout = mapper.layout();
        let v = mapper.visible_domain();
        let stroke = Stroke::new(1.0, AXIS_COLOR);
        let font = FontId::proportional(11.0);

        let x0 = layout.left_offset();
        let y0 = layout.top_offset();
        let bottom = y0 + layout.height;
        let right = x0 + layout.width;
        let at = |x: f64, y: f64| screen(rect, DrawPos { x, y });

        painter.line_segment([at(x0, bottom), at(right, bottom)], stroke);
        painter.line_segment([at(x0, y0), at(x0, bottom)], stroke);

        for t in nice_ticks(v.min.x, v.max.x, 8) {
            let d = mapper.to_draw_xy(t, v.min.y);
            let p = at(d.x, bottom);
            painter.line_segment([p, p + Vec2::new(0.0, 4.0)], stroke);
            painter.text(p + Vec2::new(0.0, 6.0), Align2::CENTER_TOP, tick_label(t), font.clone(), AXIS_COLOR);
        }
        for t in nice_ticks(v.min.y, v.max.y, 6) {
            let d = mapper.to_draw_xy(v.min.x, t);
            let p = at(x0, d.y);
            painter.line_segment([p, p - Vec2::new(4.0, 0.0)], stroke);
            painter.text(p - Vec2::new(6.0, 0.0), Align2::RIGHT_CENTER, tick_label(t), font.clone(), AXIS_COLOR);
        }

        painter.text(
            at(x0 + layout.width * 0.5, bottom + layout.axis_label_padding + 4.0),
            Align2::CENTER_TOP,
            "log2 fold change",
            FontId::proportional(13.0),
            AXIS_COLOR,
        );
        let y_label = egui::text::LayoutJob::simple_singleline(
            "-log10 padj".to_owned(),
            FontId::proportional(13.0),
            AXIS_COLOR,
        );
        let galley = painter.layout_job(y_label);
        let anchor = at(layout.margins.left * 0.5, y0 + layout.height * 0.5);
        let pos = anchor + Vec2::new(-galley.size().y * 0.5, galley.size().x * 0.5);
        painter.add(
            egui::epaint::TextShape::new(pos, galley, AXIS_COLOR).with_angle(-std::f32::consts::FRAC_PI_2),
        );
    }

    fn paint_thresholds(&self, painter: &egui::Painter, rect: Rect) {
        let stroke = Stroke::new(1.0, THRESHOLD_COLOR);
        for DrawLine { from, to } in self.engine.threshold_lines() {
            let pts = [screen(rect, from), screen(rect, to)];
            painter.extend(Shape::dashed_line(&pts, stroke, 6.0, 4.0));
        }
    }

    fn paint_points(&self, painter: &egui::Painter, rect: Rect) {
        let radius = self.engine.mapper().layout().point_radius as f32;
        let mapper = self.engine.mapper();
        let store = self.engine.store();
        let styles = self.engine.styles();
        // Selected and hovered points are drawn last so they sit on top.
        let mut front = Vec::new();
        for (slot, (p, style)) in store.points().iter().zip(styles.iter()).enumerate() {
            if !style.is_visible() {
                continue;
            }
            if style.classes.selected || style.classes.hovered {
                front.push(slot);
                continue;
            }
            painter.circle_filled(screen(rect, mapper.to_draw(p)), radius, style.color());
        }
        for slot in front {
            let (p, style) = (&store.points()[slot], styles[slot]);
            let c = screen(rect, mapper.to_draw(p));
            let r = if style.classes.hovered { radius + 1.5 } else { radius };
            painter.circle_filled(c, r, style.color());
            if style.classes.overlap {
                painter.circle_stroke(c, r + 1.5, Stroke::new(1.5, OVERLAP_RING));
            }
        }
    }

    fn paint_labels(&self, painter: &egui::Painter, rect: Rect) {
        let mapper = self.engine.mapper();
        let [ox, oy] = mapper.layout().label_offset;
        let color = painter.ctx().style().visuals.text_color();
        for p in self.engine.labelled_points() {
            if !mapper.is_in_view(p) {
                continue;
            }
            let d = mapper.to_draw(p);
            let pos = screen(rect, DrawPos { x: d.x + ox, y: d.y + oy });
            painter.text(pos, Align2::LEFT_BOTTOM, &p.gene, FontId::proportional(11.0), color);
        }
    }

    fn paint_drag_overlay(&self, painter: &egui::Painter, rect: Rect) {
        let Some(overlay) = self.engine.drag_overlay() else { return };
        let a = screen(rect, overlay.start);
        let b = screen(rect, overlay.current);
        let color = if overlay.subtracting {
            Color32::from_rgb(220, 80, 80)
        } else {
            Color32::from_rgb(80, 140, 220)
        };
        let r = Rect::from_two_pos(a, b);
        painter.rect(r, 0.0, color.gamma_multiply(0.15), Stroke::new(1.0, color), StrokeKind::Inside);
        painter.text(
            b + Vec2::new(8.0, 8.0),
            Align2::LEFT_TOP,
            &overlay.hint,
            FontId::proportional(11.0),
            painter.ctx().style().visuals.text_color(),
        );
    }

    fn paint_tooltips(&mut self, ui: &egui::Ui, painter: &egui::Painter, rect: Rect) {
        let (pointer, time) = ui.input(|i| (i.pointer.hover_pos(), i.time));
        let visuals = ui.visuals().clone();
        let mapper = self.engine.mapper();
        let store = self.engine.store();
        let mut under_pointer = None;
        for gene in self.engine.controller().visible_tooltips() {
            let Some(p) = store.by_gene(gene) else { continue };
            if !mapper.is_in_view(p) {
                continue;
            }
            let anchor = screen(rect, mapper.to_draw(p)) + Vec2::new(10.0, -10.0);
            let galley = painter.layout(
                tooltip_text(p),
                FontId::proportional(12.0),
                visuals.text_color(),
                f32::INFINITY,
            );
            let frame = Rect::from_min_size(anchor - Vec2::new(0.0, galley.size().y + 8.0), galley.size() + Vec2::splat(8.0));
            painter.rect(
                frame,
                4.0,
                visuals.extreme_bg_color,
                visuals.window_stroke,
                StrokeKind::Inside,
            );
            painter.galley(frame.min + Vec2::splat(4.0), galley, visuals.text_color());
            if pointer.is_some_and(|pos| frame.contains(pos)) {
                under_pointer = Some(gene.to_string());
            }
        }
        if under_pointer != self.hovered_tooltip {
            if let Some(prev) = self.hovered_tooltip.take() {
                let fx = self.engine.on_tooltip_out(&prev, time);
                self.handle_effects(fx);
            }
            if let Some(g) = &under_pointer {
                self.engine.on_tooltip_over(g);
            }
            self.hovered_tooltip = under_pointer;
        }
    }
}
