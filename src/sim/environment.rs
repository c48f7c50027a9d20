//! Randomized visual theme and background decoration
//!
//! Nothing in here affects gameplay. Everything draws from the shared
//! run RNG so a seed reproduces the exact same sky, which keeps gameplay
//! tests deterministic without disabling the visuals.

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::metrics::Metrics;

/// HSL(A) color, formatted for the canvas on demand
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsla {
    pub hue: f32,
    pub saturation: f32,
    pub lightness: f32,
    pub alpha: f32,
}

impl Hsla {
    pub fn opaque(hue: f32, saturation: f32, lightness: f32) -> Self {
        Self {
            hue,
            saturation,
            lightness,
            alpha: 1.0,
        }
    }

    /// CSS color string, e.g. `hsla(210, 70%, 78%, 1)`
    pub fn css(&self) -> String {
        format!(
            "hsla({:.0}, {:.0}%, {:.0}%, {:.2})",
            self.hue, self.saturation, self.lightness, self.alpha
        )
    }
}

/// One stop of the sky gradient
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkyStop {
    pub offset: f32,
    pub color: Hsla,
}

/// Sun position and glow
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sun {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub glow: Hsla,
}

/// Per-run visual theme: sky gradient, sun, parallax hill layers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub sky_stops: Vec<SkyStop>,
    pub sun: Sun,
    pub far_layer: Hsla,
    pub mid_layer: Hsla,
    pub parallax_far: f32,
    pub parallax_mid: f32,
}

impl Theme {
    /// Roll a fresh theme for a new run
    pub fn randomize(rng: &mut Pcg32, metrics: &Metrics) -> Self {
        let base_hue = rng.random_range(185.0..225.0);
        let variance = rng.random_range(-8.0..10.0);
        let saturation = rng.random_range(60.0..78.0);

        let sky_stops = vec![
            SkyStop {
                offset: 0.0,
                color: Hsla::opaque(base_hue + variance, saturation, 78.0),
            },
            SkyStop {
                offset: 0.45,
                color: Hsla::opaque(base_hue, saturation + 5.0, 72.0),
            },
            SkyStop {
                offset: 0.8,
                color: Hsla::opaque(base_hue - 6.0, saturation + 3.0, 68.0),
            },
            SkyStop {
                offset: 1.0,
                color: Hsla::opaque(base_hue - 12.0, saturation + 2.0, 82.0),
            },
        ];

        let sun_radius = metrics.width.min(metrics.height) * rng.random_range(0.07..0.11);
        let sun = Sun {
            x: metrics.width * rng.random_range(0.62..0.88),
            y: metrics.height * rng.random_range(0.12..0.22),
            radius: sun_radius,
            glow: Hsla {
                hue: base_hue + 120.0,
                saturation: 95.0,
                lightness: 85.0,
                alpha: 0.55,
            },
        };

        Self {
            sky_stops,
            sun,
            far_layer: Hsla::opaque(base_hue - 22.0, (saturation - 20.0).max(40.0), 74.0),
            mid_layer: Hsla::opaque(base_hue - 48.0, (saturation - 18.0).max(38.0), 58.0),
            parallax_far: 0.0,
            parallax_mid: 0.0,
        }
    }

    /// Scroll the hill layers (called while the run is live)
    pub fn advance_parallax(&mut self, metrics: &Metrics, dt: f32) {
        self.parallax_far = (self.parallax_far + metrics.pipe_speed * 0.12 * dt) % metrics.width;
        self.parallax_mid = (self.parallax_mid + metrics.pipe_speed * 0.22 * dt) % metrics.width;
    }
}

/// One ellipse of a cloud's puffy outline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CloudLump {
    pub offset_x: f32,
    pub offset_y: f32,
    pub radius_x: f32,
    pub radius_y: f32,
}

/// A drifting background cloud
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cloud {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    pub opacity: f32,
    pub lumps: [CloudLump; 3],
}

impl Cloud {
    pub fn spawn(rng: &mut Pcg32, metrics: &Metrics) -> Self {
        let scale = rng.random_range(0.55..1.4);
        let base_width = (metrics.width * 0.13).max(120.0);
        let width = base_width * scale;
        let height = width * rng.random_range(0.32..0.5);

        let lumps = [
            CloudLump {
                offset_x: -width * rng.random_range(0.2..0.35),
                offset_y: height * rng.random_range(-0.05..0.1),
                radius_x: width * rng.random_range(0.35..0.48),
                radius_y: height * rng.random_range(0.52..0.7),
            },
            CloudLump {
                offset_x: 0.0,
                offset_y: -height * rng.random_range(0.05..0.18),
                radius_x: width * rng.random_range(0.4..0.55),
                radius_y: height * rng.random_range(0.5..0.68),
            },
            CloudLump {
                offset_x: width * rng.random_range(0.18..0.32),
                offset_y: height * rng.random_range(-0.02..0.15),
                radius_x: width * rng.random_range(0.28..0.4),
                radius_y: height * rng.random_range(0.48..0.65),
            },
        ];

        Self {
            x: rng.random_range(0.0..metrics.width),
            y: metrics.height * rng.random_range(0.05..0.32),
            width,
            height,
            speed: (metrics.pipe_speed * rng.random_range(0.045..0.095)).max(22.0),
            opacity: rng.random_range(0.18..0.42),
            lumps,
        }
    }
}

/// Seed the cloud field for a run, spread evenly across the width
pub fn generate_clouds(rng: &mut Pcg32, metrics: &Metrics) -> Vec<Cloud> {
    let count = ((metrics.width / 140.0).round() as usize).max(8);
    let mut clouds: Vec<Cloud> = (0..count).map(|_| Cloud::spawn(rng, metrics)).collect();

    // Spread clouds so they don't start clustered in one region
    clouds.sort_by(|a, b| a.x.total_cmp(&b.x));
    let spacing = metrics.width / clouds.len() as f32;
    for (i, cloud) in clouds.iter_mut().enumerate() {
        let jitter = rng.random_range(-spacing * 0.35..spacing * 0.35);
        cloud.x = (spacing * i as f32 + jitter + metrics.width) % metrics.width;
    }

    clouds
}

/// Drift clouds left; recycle the ones that leave the screen
pub fn advance_clouds(clouds: &mut [Cloud], rng: &mut Pcg32, metrics: &Metrics, dt: f32) {
    for cloud in clouds.iter_mut() {
        cloud.x -= cloud.speed * dt;

        if cloud.x < -cloud.width * 1.2 {
            let fresh = Cloud::spawn(rng, metrics);
            cloud.width = fresh.width;
            cloud.height = fresh.height;
            cloud.lumps = fresh.lumps;
            cloud.speed = fresh.speed;
            cloud.opacity = fresh.opacity;
            cloud.x = metrics.width + cloud.width * rng.random_range(0.1..0.6);
            cloud.y = metrics.height * rng.random_range(0.05..0.35);
        }
    }
}
