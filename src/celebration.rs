use rand::seq::SliceRandom;
use rand::Rng;
use std::time::Instant;

const BANNER: &str = "NEW HIGH SCORE!";
const SPARKS: [char; 6] = ['*', '+', '✦', '✧', '·', '★'];
const GRAVITY: f64 = 15.0;
const STEP_SECS: f64 = 0.1;

/// A single animated glyph
#[derive(Debug, Clone)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vel_x: f64,
    pub vel_y: f64,
    pub symbol: char,
    pub color_index: usize,
    pub age: f64,
    pub max_age: f64,
    /// Letter of the banner, flying to a fixed slot
    pub target: Option<(f64, f64)>,
}

impl Particle {
    fn spark<R: Rng>(x: f64, y: f64, rng: &mut R) -> Self {
        Self {
            x,
            y,
            vel_x: rng.gen_range(-3.0..3.0),
            vel_y: rng.gen_range(-4.0..-1.0),
            symbol: *SPARKS.choose(rng).unwrap_or(&'*'),
            color_index: rng.gen_range(0..7),
            age: 0.0,
            max_age: rng.gen_range(2.0..4.0),
            target: None,
        }
    }

    fn letter<R: Rng>(from: (f64, f64), to: (f64, f64), symbol: char, rng: &mut R) -> Self {
        Self {
            x: from.0,
            y: from.1,
            vel_x: to.0 - from.0,
            vel_y: to.1 - from.1,
            symbol,
            color_index: rng.gen_range(0..7),
            age: 0.0,
            max_age: rng.gen_range(3.0..5.0),
            target: Some(to),
        }
    }

    pub fn is_letter(&self) -> bool {
        self.target.is_some()
    }

    /// Advances the particle; false once it has burned out
    fn update(&mut self, dt: f64) -> bool {
        match self.target {
            Some((tx, ty)) => {
                let distance = ((tx - self.x).powi(2) + (ty - self.y).powi(2)).sqrt();
                if distance > 1.0 {
                    self.x += self.vel_x * dt;
                    self.y += self.vel_y * dt;
                    self.vel_x *= 0.95;
                    self.vel_y *= 0.95;
                } else {
                    self.x = tx;
                    self.y = ty;
                    self.vel_x = 0.0;
                    self.vel_y = 0.0;
                }
            }
            None => {
                self.x += self.vel_x * dt;
                self.y += self.vel_y * dt;
                self.vel_y += GRAVITY * dt;
            }
        }

        self.age += dt;
        self.age < self.max_age
    }

    /// Remaining life in `0.0..=1.0`, used for fading
    pub fn vitality(&self) -> f64 {
        (1.0 - self.age / self.max_age).clamp(0.0, 1.0)
    }
}

/// Burst of sparks spelling out the new-high-score banner
#[derive(Debug)]
pub struct Celebration {
    pub particles: Vec<Particle>,
    pub is_active: bool,
    started_at: Instant,
    duration_secs: f64,
    width: f64,
    height: f64,
}

impl Celebration {
    pub fn new() -> Self {
        Self {
            particles: Vec::new(),
            is_active: false,
            started_at: Instant::now(),
            duration_secs: 3.0,
            width: 80.0,
            height: 24.0,
        }
    }

    pub fn start(&mut self, width: u16, height: u16) {
        let mut rng = rand::thread_rng();

        self.particles.clear();
        self.started_at = Instant::now();
        self.is_active = true;
        self.width = width as f64;
        self.height = height as f64;

        let center = (self.width / 2.0, self.height / 2.0);
        let spacing = 2.0;
        let left = center.0 - (BANNER.chars().count() as f64 - 1.0) * spacing / 2.0;

        for (i, symbol) in BANNER.chars().enumerate().filter(|(_, c)| *c != ' ') {
            let from = (
                center.0 + rng.gen_range(-10.0..10.0),
                center.1 + rng.gen_range(-5.0..5.0),
            );
            let to = (left + i as f64 * spacing, center.1 - 2.0);
            self.particles.push(Particle::letter(from, to, symbol, &mut rng));
        }

        for _ in 0..25 {
            let x = center.0 + rng.gen_range(-15.0..15.0);
            let y = center.1 + rng.gen_range(-8.0..8.0);
            self.particles.push(Particle::spark(x, y, &mut rng));
        }
    }

    pub fn update(&mut self) {
        if !self.is_active {
            return;
        }

        if self.started_at.elapsed().as_secs_f64() >= self.duration_secs {
            self.stop();
            return;
        }

        let (width, height) = (self.width, self.height);
        let margin = 5.0;
        self.particles.retain_mut(|particle| {
            let alive = particle.update(STEP_SECS);
            let off_screen = !particle.is_letter()
                && (particle.y > height + margin
                    || particle.x < -margin
                    || particle.x > width + margin);
            alive && !off_screen
        });
    }

    pub fn stop(&mut self) {
        self.is_active = false;
        self.particles.clear();
    }
}

impl Default for Celebration {
    fn default() -> Self {
        Self::new()
    }
}
