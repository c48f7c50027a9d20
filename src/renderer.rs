//! Canvas-2d renderer (wasm only)
//!
//! Consumes a read-only snapshot of the game state each frame. Nothing in
//! here mutates the simulation; the shake offset is applied as a canvas
//! translate so simulation positions stay untouched.

use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::sim::{Cloud, GameState, Metrics, Pipe};

pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    dpr: f64,
}

impl CanvasRenderer {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        Ok(Self {
            canvas,
            ctx,
            dpr: 1.0,
        })
    }

    /// Match the backing store to the viewport and device pixel ratio
    pub fn configure(&mut self, metrics: &Metrics) {
        self.dpr = web_sys::window()
            .map(|w| w.device_pixel_ratio())
            .unwrap_or(1.0)
            .max(1.0);

        let width = metrics.width as f64;
        let height = metrics.height as f64;
        self.canvas.set_width((width * self.dpr).floor() as u32);
        self.canvas.set_height((height * self.dpr).floor() as u32);

        let style = self.canvas.style();
        let _ = style.set_property("width", &format!("{width}px"));
        let _ = style.set_property("height", &format!("{height}px"));
    }

    /// Paint one frame from the state snapshot
    pub fn draw(&self, state: &GameState, apply_shake: bool) {
        let ctx = &self.ctx;
        let m = &state.metrics;
        let (shake_x, shake_y) = if apply_shake {
            (state.shake_offset.x as f64, state.shake_offset.y as f64)
        } else {
            (0.0, 0.0)
        };

        let _ = ctx.set_transform(self.dpr, 0.0, 0.0, self.dpr, 0.0, 0.0);
        ctx.save();
        let _ = ctx.translate(shake_x, shake_y);
        ctx.clear_rect(-shake_x, -shake_y, m.width as f64, m.height as f64);

        self.draw_background(state);
        self.draw_pipes(m, &state.pipes);
        self.draw_ground(m, state.ground_offset as f64);
        self.draw_bird(state);

        ctx.restore();
    }

    fn draw_background(&self, state: &GameState) {
        let ctx = &self.ctx;
        let m = &state.metrics;
        let theme = &state.theme;
        let width = m.width as f64;
        let ground_y = m.ground_y as f64;

        let gradient = ctx.create_linear_gradient(0.0, 0.0, 0.0, ground_y);
        for stop in &theme.sky_stops {
            let _ = gradient.add_color_stop(stop.offset, &stop.color.css());
        }
        ctx.set_fill_style_canvas_gradient(&gradient);
        ctx.fill_rect(0.0, 0.0, width, ground_y);

        // Sun with a radial glow
        let sun = &theme.sun;
        if sun.radius > 0.0 {
            let (sx, sy, sr) = (sun.x as f64, sun.y as f64, sun.radius as f64);
            if let Ok(glow) = ctx.create_radial_gradient(sx, sy, sr * 0.15, sx, sy, sr * 1.5) {
                let _ = glow.add_color_stop(0.0, "rgba(255, 255, 240, 0.95)");
                let _ = glow.add_color_stop(0.5, &sun.glow.css());
                let _ = glow.add_color_stop(1.0, "rgba(255, 221, 140, 0)");
                ctx.set_fill_style_canvas_gradient(&glow);
                ctx.begin_path();
                let _ = ctx.arc(sx, sy, sr * 1.4, 0.0, std::f64::consts::TAU);
                ctx.fill();
            }
        }

        let far_offset = (theme.parallax_far % m.width) as f64;
        ctx.save();
        let _ = ctx.translate(-far_offset, 0.0);
        for i in -1..=1 {
            self.draw_far_range(state, i as f64 * width);
        }
        ctx.restore();

        self.draw_clouds(&state.clouds);

        let mid_offset = (theme.parallax_mid % m.width) as f64;
        ctx.save();
        let _ = ctx.translate(-mid_offset, 0.0);
        for i in -1..=1 {
            self.draw_near_hills(state, i as f64 * width);
        }
        ctx.restore();
    }

    fn draw_far_range(&self, state: &GameState, base_x: f64) {
        let ctx = &self.ctx;
        let m = &state.metrics;
        let (width, height) = (m.width as f64, m.height as f64);
        let ground_y = m.ground_y as f64;
        let horizon = ground_y - m.ground_height as f64 * 0.82;

        ctx.set_fill_style_str(&state.theme.far_layer.css());
        ctx.begin_path();
        ctx.move_to(base_x, ground_y);
        ctx.line_to(base_x + width * 0.08, horizon + height * 0.09);
        ctx.line_to(base_x + width * 0.24, horizon - height * 0.08);
        ctx.line_to(base_x + width * 0.46, horizon + height * 0.03);
        ctx.line_to(base_x + width * 0.68, horizon - height * 0.1);
        ctx.line_to(base_x + width * 0.88, horizon + height * 0.06);
        ctx.line_to(base_x + width, ground_y);
        ctx.line_to(base_x, ground_y);
        ctx.close_path();
        ctx.fill();
    }

    fn draw_near_hills(&self, state: &GameState, base_x: f64) {
        let ctx = &self.ctx;
        let m = &state.metrics;
        let (width, height) = (m.width as f64, m.height as f64);
        let ground_y = m.ground_y as f64;
        let hill_base = ground_y - m.ground_height as f64 * 0.48;

        ctx.set_fill_style_str(&state.theme.mid_layer.css());
        ctx.begin_path();
        ctx.move_to(base_x, ground_y);
        ctx.quadratic_curve_to(
            base_x + width * 0.16,
            hill_base - height * 0.08,
            base_x + width * 0.34,
            hill_base + height * 0.02,
        );
        ctx.quadratic_curve_to(
            base_x + width * 0.58,
            hill_base - height * 0.1,
            base_x + width * 0.82,
            hill_base + height * 0.05,
        );
        ctx.line_to(base_x + width, ground_y);
        ctx.close_path();
        ctx.fill();
    }

    fn draw_clouds(&self, clouds: &[Cloud]) {
        let ctx = &self.ctx;
        for cloud in clouds {
            ctx.save();
            let _ = ctx.translate(cloud.x as f64, cloud.y as f64);
            ctx.set_fill_style_str("rgba(255, 255, 255, 1)");
            ctx.set_global_alpha(cloud.opacity as f64);
            for lump in &cloud.lumps {
                ctx.begin_path();
                let _ = ctx.ellipse(
                    lump.offset_x as f64,
                    lump.offset_y as f64,
                    lump.radius_x as f64,
                    lump.radius_y as f64,
                    0.0,
                    0.0,
                    std::f64::consts::TAU,
                );
                ctx.fill();
            }
            ctx.set_global_alpha(1.0);
            ctx.restore();
        }
    }

    fn draw_pipes(&self, m: &Metrics, pipes: &[Pipe]) {
        let ctx = &self.ctx;
        let ground_y = m.ground_y as f64;

        for pipe in pipes {
            let x = pipe.x as f64;
            let w = pipe.width as f64;
            let top = pipe.top_height as f64;
            let bottom = pipe.bottom_y as f64;

            ctx.set_fill_style_str("#7ed957");
            ctx.fill_rect(x, 0.0, w, top);
            ctx.fill_rect(x, bottom, w, ground_y - bottom);

            // Lips
            ctx.set_fill_style_str("#6ac44f");
            ctx.fill_rect(x - 4.0, top - 18.0, w + 8.0, 18.0);
            ctx.fill_rect(x - 4.0, bottom, w + 8.0, 18.0);

            // Shading stripe
            ctx.set_fill_style_str("#58a83e");
            ctx.fill_rect(x + w * 0.18, 0.0, w * 0.1, top);
            ctx.fill_rect(x + w * 0.18, bottom, w * 0.1, ground_y - bottom);
        }
    }

    fn draw_ground(&self, m: &Metrics, ground_offset: f64) {
        let ctx = &self.ctx;
        let (width, height) = (m.width as f64, m.height as f64);
        let ground_y = m.ground_y as f64;
        let ground_height = m.ground_height as f64;

        let gradient = ctx.create_linear_gradient(0.0, ground_y, 0.0, height);
        let _ = gradient.add_color_stop(0.0, "#e9d18f");
        let _ = gradient.add_color_stop(1.0, "#cba065");
        ctx.set_fill_style_canvas_gradient(&gradient);
        ctx.fill_rect(0.0, ground_y, width, ground_height);

        ctx.set_fill_style_str("rgba(255, 255, 255, 0.18)");
        ctx.fill_rect(0.0, ground_y, width, ground_height * 0.12);

        // Scrolling tile pattern
        let tile_width = (width * 0.06).max(24.0);
        ctx.set_fill_style_str("rgba(0, 0, 0, 0.15)");
        let mut x = -tile_width + ground_offset % tile_width;
        while x < width + tile_width {
            ctx.fill_rect(x, ground_y + ground_height * 0.55, tile_width * 0.5, tile_width * 0.35);
            x += tile_width;
        }

        ctx.set_fill_style_str("rgba(0, 0, 0, 0.08)");
        ctx.fill_rect(0.0, ground_y - 4.0, width, 4.0);
    }

    fn draw_bird(&self, state: &GameState) {
        let ctx = &self.ctx;
        let bird = &state.bird;
        let w = bird.width as f64;
        let h = bird.height as f64;

        ctx.save();
        let _ = ctx.translate(bird.x as f64 + w / 2.0, bird.y as f64 + h / 2.0);
        let _ = ctx.rotate(bird.rotation as f64);

        // Body
        ctx.set_fill_style_str("#ffd93d");
        ctx.begin_path();
        let _ = ctx.ellipse(0.0, 0.0, w * 0.55, h * 0.58, 0.0, 0.0, std::f64::consts::TAU);
        ctx.fill();

        // Belly
        ctx.set_fill_style_str("#ffc53d");
        ctx.begin_path();
        let _ = ctx.ellipse(-w * 0.1, h * 0.05, w * 0.35, h * 0.25, 0.0, 0.0, std::f64::consts::TAU);
        ctx.fill();

        // Eye
        ctx.set_fill_style_str("#ffffff");
        ctx.begin_path();
        let _ = ctx.ellipse(w * 0.18, -h * 0.18, w * 0.22, h * 0.22, 0.0, 0.0, std::f64::consts::TAU);
        ctx.fill();

        ctx.set_fill_style_str("#3b3b3b");
        ctx.begin_path();
        let _ = ctx.ellipse(w * 0.24, -h * 0.2, w * 0.08, h * 0.08, 0.0, 0.0, std::f64::consts::TAU);
        ctx.fill();

        // Beak
        ctx.set_fill_style_str("#ff914d");
        ctx.begin_path();
        ctx.move_to(w * 0.45, -h * 0.05);
        ctx.line_to(w * 0.75, 0.0);
        ctx.line_to(w * 0.45, h * 0.08);
        ctx.close_path();
        ctx.fill();

        ctx.restore();
    }
}
