//! Terrain generation: rejection-sampled landing pads joined by a noisy
//! random walk.
//!
//! **Seed-based determinism:** the RNG is supplied by the caller, so a seeded
//! `StdRng` with the same parameters always reproduces the same terrain.

use rand::Rng;

use crate::{Terrain, TerrainPoint};

/// Width of every landing pad in world units.
pub const PAD_WIDTH: f32 = 120.0;
/// Minimum horizontal gap between two pads.
pub const MIN_PAD_GAP: f32 = 200.0;
/// Minimum gap between a pad and the field edges.
pub const EDGE_MARGIN: f32 = 200.0;
/// Lowest altitude a pad may sit at.
pub const PAD_Y_MIN: f32 = 50.0;

/// Minimum number of walk steps across a rough span.
const MIN_SEGMENT_COUNT: usize = 30;
/// Rough terrain never dips below this height.
const FLOOR_Y: f32 = 20.0;
/// Total draws allowed while rejection-sampling pad positions.
const PAD_ATTEMPT_BUDGET: u32 = 1000;

/// Parameters for one terrain generation run.
#[derive(Debug, Clone)]
pub struct TerrainParams {
    /// Play-field width; the polyline spans exactly `[0, field_width]`.
    pub field_width: f32,
    /// Play-field height; caps pad altitude and the rough-terrain clamp.
    pub field_height: f32,
    /// 1 (gentle) ..= 5 (rough). Scales noise amplitude and the height clamp.
    pub difficulty: u8,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            field_width: 1800.0,
            field_height: 900.0,
            difficulty: 3,
        }
    }
}

impl TerrainParams {
    fn clamped_difficulty(&self) -> f32 {
        self.difficulty.clamp(1, 5) as f32
    }

    /// Half-range of the walk noise, linear in difficulty (5x spread from
    /// difficulty 1 to 5).
    pub fn noise_amplitude(&self) -> f32 {
        5.0 * self.clamped_difficulty()
    }

    /// Upper clamp for rough terrain: 60% of the field height at difficulty 1
    /// up to 100% at difficulty 5.
    pub fn max_height(&self) -> f32 {
        self.field_height * (0.5 + 0.1 * self.clamped_difficulty())
    }
}

/// A pad picked during generation; consumed while building the polyline.
#[derive(Debug, Clone, Copy)]
struct PadSpec {
    x_start: f32,
    y: f32,
}

/// Generate a terrain strip with exactly three landing pads.
pub fn generate(params: &TerrainParams, rng: &mut impl Rng) -> Terrain {
    let pads = place_pads(params, rng);

    let mut points = Vec::new();
    let start_y = anchor_y(params, rng);
    points.push(TerrainPoint { x: 0.0, y: start_y, is_pad: false });
    let mut cursor = (0.0, start_y);

    for pad in &pads {
        rough_span(&mut points, cursor, (pad.x_start, pad.y), params, rng);
        // Two points per pad: the flag marks only the segment leaving the
        // pad's left edge; the segment after the right edge is rough again.
        points.push(TerrainPoint { x: pad.x_start, y: pad.y, is_pad: true });
        points.push(TerrainPoint { x: pad.x_start + PAD_WIDTH, y: pad.y, is_pad: false });
        cursor = (pad.x_start + PAD_WIDTH, pad.y);
    }

    let end = (params.field_width, anchor_y(params, rng));
    rough_span(&mut points, cursor, end, params, rng);
    points.push(TerrainPoint { x: end.0, y: end.1, is_pad: false });

    Terrain::new(points)
}

/// Edge anchor altitude. Degenerate field heights leave an empty range;
/// anchor at the terrain floor instead of failing.
fn anchor_y(params: &TerrainParams, rng: &mut impl Rng) -> f32 {
    let lo = params.field_height * 0.1;
    let hi = params.field_height * 0.4;
    if hi > lo {
        rng.gen_range(lo..hi)
    } else {
        FLOOR_Y
    }
}

/// Rejection-sample three pad start positions, then sort them left to right.
/// Exhausting the attempt budget is non-fatal, as is a field too narrow or
/// too short to sample at all: a fixed known-valid layout is used instead.
fn place_pads(params: &TerrainParams, rng: &mut impl Rng) -> Vec<PadSpec> {
    let lo = EDGE_MARGIN;
    let hi = params.field_width - EDGE_MARGIN - PAD_WIDTH;
    let pad_y_ceiling = params.field_height * 0.25;

    let mut pads: Vec<PadSpec> = Vec::new();
    if hi > lo && pad_y_ceiling > PAD_Y_MIN {
        let mut attempts = 0;
        while pads.len() < 3 && attempts < PAD_ATTEMPT_BUDGET {
            let x = rng.gen_range(lo..hi);
            let clear = pads.iter().all(|p| {
                x + PAD_WIDTH < p.x_start - MIN_PAD_GAP || x > p.x_start + PAD_WIDTH + MIN_PAD_GAP
            });
            if clear {
                let y = rng.gen_range(PAD_Y_MIN..pad_y_ceiling);
                pads.push(PadSpec { x_start: x, y });
            }
            attempts += 1;
        }
    }

    if pads.len() < 3 {
        log::warn!(
            "pad placement failed within {} attempts, using fallback layout",
            PAD_ATTEMPT_BUDGET
        );
        pads = fallback_pads(params.field_width);
    }

    pads.sort_by(|a, b| a.x_start.total_cmp(&b.x_start));
    pads
}

/// Deterministic pad layout used when rejection sampling cannot place three
/// pads (e.g. a narrow field).
fn fallback_pads(field_width: f32) -> Vec<PadSpec> {
    vec![
        PadSpec { x_start: 200.0, y: 100.0 },
        PadSpec { x_start: field_width / 2.0 - 60.0, y: 150.0 },
        PadSpec { x_start: field_width - 320.0, y: 120.0 },
    ]
}

/// Walk from `from` to `to`, appending the intermediate points (exclusive of
/// both anchors). Each step drifts toward the target and adds uniform noise,
/// clamped into the difficulty-scaled height band.
fn rough_span(
    points: &mut Vec<TerrainPoint>,
    from: (f32, f32),
    to: (f32, f32),
    params: &TerrainParams,
    rng: &mut impl Rng,
) {
    let dist = to.0 - from.0;
    let steps = MIN_SEGMENT_COUNT.max((dist / 10.0) as usize);
    let dx = dist / steps as f32;
    let amplitude = params.noise_amplitude();
    // Short fields can push the clamp ceiling below the floor.
    let ceiling = params.max_height().max(FLOOR_Y);

    let mut y = from.1;
    for i in 1..steps {
        let x = from.0 + i as f32 * dx;
        let steps_remaining = (steps - i + 1) as f32;
        let drift = (to.1 - y) / steps_remaining;
        let noise = rng.gen_range(-amplitude..=amplitude);
        y = (y + drift + noise).clamp(FLOOR_Y, ceiling);
        points.push(TerrainPoint { x, y, is_pad: false });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn params(difficulty: u8) -> TerrainParams {
        TerrainParams {
            field_width: 1800.0,
            field_height: 900.0,
            difficulty,
        }
    }

    #[test]
    fn terrain_spans_field_and_is_well_formed() {
        for difficulty in 1..=5 {
            let mut rng = StdRng::seed_from_u64(7 + difficulty as u64);
            let terrain = generate(&params(difficulty), &mut rng);
            assert!(terrain.is_well_formed());

            let points = terrain.points();
            assert_eq!(points.first().unwrap().x, 0.0);
            assert_eq!(points.last().unwrap().x, 1800.0);
        }
    }

    #[test]
    fn terrain_has_exactly_three_flat_pads() {
        let mut rng = StdRng::seed_from_u64(42);
        let terrain = generate(&params(3), &mut rng);
        assert_eq!(terrain.pad_count(), 3);

        for segment in terrain.segments().filter(|s| s.is_pad) {
            assert_eq!(segment.a.1, segment.b.1, "pad segments must be flat");
            assert_eq!(segment.max_x() - segment.min_x(), PAD_WIDTH);
        }
    }

    #[test]
    fn pads_respect_spacing_and_margins() {
        let mut rng = StdRng::seed_from_u64(123);
        let terrain = generate(&params(3), &mut rng);
        let pads: Vec<_> = terrain.segments().filter(|s| s.is_pad).collect();

        for pair in pads.windows(2) {
            let gap = pair[1].min_x() - pair[0].min_x();
            assert!(gap >= PAD_WIDTH + MIN_PAD_GAP);
        }
        assert!(pads.first().unwrap().min_x() >= EDGE_MARGIN);
        assert!(pads.last().unwrap().max_x() <= 1800.0 - EDGE_MARGIN);
    }

    #[test]
    fn rough_heights_stay_inside_difficulty_band() {
        for difficulty in 1..=5 {
            let p = params(difficulty);
            let mut rng = StdRng::seed_from_u64(99);
            let terrain = generate(&p, &mut rng);
            let ceiling = p.max_height();

            let last = terrain.points().len() - 1;
            for (i, point) in terrain.points().iter().enumerate() {
                // Anchors and pad vertices have their own bands.
                if i == 0 || i == last {
                    continue;
                }
                assert!(point.y >= 20.0, "point {} below floor: {}", i, point.y);
                if !point.is_pad {
                    assert!(point.y <= ceiling.max(p.field_height * 0.25));
                }
            }
        }
    }

    #[test]
    fn difficulty_widens_the_clamp_band() {
        assert_eq!(params(1).max_height(), 900.0 * 0.6);
        assert_eq!(params(5).max_height(), 900.0);
        assert_eq!(params(1).noise_amplitude() * 5.0, params(5).noise_amplitude());
    }

    #[test]
    fn same_seed_reproduces_the_terrain() {
        let a = generate(&params(4), &mut StdRng::seed_from_u64(555));
        let b = generate(&params(4), &mut StdRng::seed_from_u64(555));
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_differ() {
        let a = generate(&params(4), &mut StdRng::seed_from_u64(1));
        let b = generate(&params(4), &mut StdRng::seed_from_u64(2));
        assert_ne!(a, b);
    }

    #[test]
    fn short_field_falls_back_without_panicking() {
        for field_height in [150.0, 0.0] {
            let p = TerrainParams {
                field_width: 1800.0,
                field_height,
                difficulty: 3,
            };
            let mut rng = StdRng::seed_from_u64(11);
            let terrain = generate(&p, &mut rng);
            assert!(terrain.is_well_formed());
            assert_eq!(terrain.pad_count(), 3);

            let pads: Vec<_> = terrain.segments().filter(|s| s.is_pad).collect();
            assert_eq!(pads[0].min_x(), 200.0);
            assert_eq!(pads[1].min_x(), 840.0);
            assert_eq!(pads[2].min_x(), 1480.0);
        }
    }

    #[test]
    fn fallback_layout_is_valid_for_the_default_field() {
        let pads = fallback_pads(1800.0);
        assert_eq!(pads.len(), 3);
        assert_eq!(pads[0].x_start, 200.0);
        assert_eq!(pads[1].x_start, 840.0);
        assert_eq!(pads[2].x_start, 1480.0);
        for pair in pads.windows(2) {
            assert!(pair[1].x_start - pair[0].x_start >= PAD_WIDTH + MIN_PAD_GAP);
        }
    }
}
