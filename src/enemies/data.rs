//! Archetype tuning loaded from RON files.
//!
//! Every archetype has a tuning struct whose `Default` holds the shipped
//! values. A file at `assets/data/enemies/<archetype>.ron` overrides any
//! subset of its fields. Distances are meters, times are seconds.

use std::fs;
use std::path::Path;

use bevy::prelude::*;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::archetypes::ArchetypeKind;
use super::skills::{Severity, ShapeSpec, ShotSpec, SkillTiming, Strike};
use crate::world::DataLoadError;

pub const ENEMY_DATA_DIR: &str = "assets/data/enemies";

const fn rect(length: f32, width: f32, severity: Severity) -> Strike {
    Strike::new(ShapeSpec::Rect { length, width }, severity)
}

const fn disk(radius: f32, severity: Severity) -> Strike {
    Strike::new(ShapeSpec::Disk { radius }, severity)
}

/// Melee beam archetype.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct HisuiTuning {
    pub speed: f32,
    pub feint_max: f32,
    /// Shorter feint right after the lunge.
    pub feint_after_lunge: f32,
    pub beam: Strike,
    pub beam_telegraph: f32,
    pub lunge_trigger: f32,
    pub lunge_back: f32,
    pub lunge_back_time: f32,
    pub lunge_pause: f32,
    pub lunge_forward: f32,
    pub lunge_forward_time: f32,
    /// Live around the body during the forward dash.
    pub lunge_strike: Strike,
    pub lunge_recovery: f32,
    pub combo_sweep: Strike,
    pub combo_sweep_time: f32,
    pub combo_slash: Strike,
    pub combo_slash_time: f32,
    pub combo_recovery: f32,
}

impl Default for HisuiTuning {
    fn default() -> Self {
        Self {
            speed: 4.11,
            feint_max: 0.5,
            feint_after_lunge: 0.25,
            beam: rect(7.2, 1.2, Severity::Danger),
            beam_telegraph: 0.5,
            lunge_trigger: 4.0,
            lunge_back: 2.0,
            lunge_back_time: 0.13,
            lunge_pause: 0.325,
            lunge_forward: 6.0,
            lunge_forward_time: 0.25,
            lunge_strike: disk(1.2, Severity::Danger),
            lunge_recovery: 0.25,
            combo_sweep: Strike::new(ShapeSpec::FrontSemicircle { radius: 5.0 }, Severity::Caution),
            combo_sweep_time: 0.5,
            combo_slash: rect(5.5, 2.0, Severity::Danger),
            combo_slash_time: 0.625,
            combo_recovery: 0.25,
        }
    }
}

/// Cone archetype. The trigger is the cone radius plus the player radius.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct AbigailTuning {
    pub speed: f32,
    pub timing: SkillTiming,
    pub cone: Strike,
}

impl Default for AbigailTuning {
    fn default() -> Self {
        Self {
            speed: 3.9,
            timing: SkillTiming::new(5.75, 0.2, 0.35, 0.1),
            cone: Strike::new(
                ShapeSpec::Sector {
                    radius: 5.75,
                    aperture_deg: 60.0,
                },
                Severity::Danger,
            ),
        }
    }
}

/// Boomerang projectile archetype.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct LukuTuning {
    pub speed: f32,
    pub timing: SkillTiming,
    pub shot: ShotSpec,
    /// Meters per second on the way back.
    pub return_speed: f32,
}

impl Default for LukuTuning {
    fn default() -> Self {
        Self {
            speed: 3.9,
            timing: SkillTiming::new(10.0, 1.0, 0.3, 0.1),
            shot: ShotSpec {
                shape: ShapeSpec::Square { side: 0.6 },
                speed: 18.0,
                range: 10.0,
                severity: Severity::Danger,
            },
            return_speed: 18.0,
        }
    }
}

/// Projectile + trapezoid archetype.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct KatjaTuning {
    pub speed: f32,
    pub bolt: SkillTiming,
    pub bolt_shot: ShotSpec,
    pub field: SkillTiming,
    pub field_strike: Strike,
    /// Farthest the trapezoid's far edge may reach.
    pub field_range: f32,
    /// Per-axis world jitter applied after placement.
    pub field_jitter: f32,
}

impl Default for KatjaTuning {
    fn default() -> Self {
        Self {
            speed: 3.85,
            bolt: SkillTiming::new(11.0, 1.0, 0.25, 0.1),
            bolt_shot: ShotSpec {
                shape: ShapeSpec::Square { side: 1.2 },
                speed: 26.0,
                range: 11.0,
                severity: Severity::Danger,
            },
            field: SkillTiming::new(23.0, 0.0, 0.8, 0.3),
            field_strike: Strike::new(
                ShapeSpec::Trapezoid {
                    depth: 5.0,
                    near_width: 3.0,
                    far_width: 6.0,
                },
                Severity::Danger,
            ),
            field_range: 23.0,
            field_jitter: 1.0,
        }
    }
}

/// Teleport-strike archetype.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct DarkoTuning {
    pub speed: f32,
    pub timing: SkillTiming,
    /// Jump distance along the aim.
    pub jump: f32,
    pub strike: Strike,
    /// Destination inset from the arena edge, in pixels.
    pub edge_margin_px: f32,
}

impl Default for DarkoTuning {
    fn default() -> Self {
        Self {
            speed: 3.9,
            timing: SkillTiming::new(6.2, 0.5, 0.6, 0.1),
            jump: 4.0,
            strike: disk(2.2, Severity::Danger),
            edge_margin_px: 4.0,
        }
    }
}

/// Dual-form archetype.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct DebiMarleneTuning {
    pub speed: f32,
    pub feint_max: f32,
    pub finale_feint_max: f32,
    /// Move-only window after either form's E.
    pub settle: f32,
    pub debi_q_trigger: f32,
    /// Trigger distance measured from a placed Marlene marker.
    pub debi_q_marker_trigger: f32,
    pub debi_q_cast: f32,
    pub debi_q_slash: Strike,
    pub debi_orb: ShotSpec,
    pub debi_e_trigger: f32,
    pub debi_e_cast: f32,
    pub debi_e_retreat: f32,
    pub marlene_q_trigger: f32,
    pub marlene_q_cast: f32,
    pub marlene_shot: ShotSpec,
    pub marlene_e_trigger: f32,
    pub marlene_e_cast: f32,
    pub dash_distance: f32,
    pub dash_time: f32,
    /// Rectangle carried ahead of a dashing body.
    pub dash_sweep: Strike,
    pub q_wait: f32,
    pub finale_trigger: f32,
    pub finale_cast: f32,
    pub finale_strike: Strike,
    pub finale_wait: f32,
}

impl Default for DebiMarleneTuning {
    fn default() -> Self {
        Self {
            speed: 3.9,
            feint_max: 0.25,
            finale_feint_max: 0.5,
            settle: 0.5,
            debi_q_trigger: 4.5,
            debi_q_marker_trigger: 6.0,
            debi_q_cast: 0.15,
            debi_q_slash: rect(4.5, 1.0, Severity::Caution),
            debi_orb: ShotSpec {
                shape: ShapeSpec::Disk { radius: 0.8 },
                speed: 18.0,
                range: 6.0,
                severity: Severity::Caution,
            },
            debi_e_trigger: 6.0,
            debi_e_cast: 0.15,
            debi_e_retreat: 2.0,
            marlene_q_trigger: 5.5,
            marlene_q_cast: 0.166,
            marlene_shot: ShotSpec {
                shape: ShapeSpec::Disk { radius: 0.5 },
                speed: 20.0,
                range: 6.25,
                severity: Severity::Caution,
            },
            marlene_e_trigger: 5.5,
            marlene_e_cast: 0.2,
            dash_distance: 4.5,
            dash_time: 0.3,
            dash_sweep: rect(1.5, 1.2, Severity::Danger),
            q_wait: 0.15,
            finale_trigger: 8.0,
            finale_cast: 0.67,
            finale_strike: rect(8.0, 2.0, Severity::Danger),
            finale_wait: 0.6,
        }
    }
}

/// Weights for the reposition dash scoring. Lengths are meters unless
/// suffixed `_px`.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct DashWeights {
    /// Player this far behind the origin counts as "behind".
    pub behind: f32,
    /// Player this far past the far end counts as "far ahead".
    pub far_ahead: f32,
    pub lateral_pad_px: f32,
    /// Fraction of the dash distance beyond the rectangle that counts as too far.
    pub too_far: f32,
    /// Preferred inset from both rectangle ends.
    pub inset: f32,
    pub soft_perp: f32,
    pub hard_perp_inset: f32,
    /// Misalignment that triggers a dash on its own.
    pub shift_trigger: f32,
    /// Don't dash when the player is this close.
    pub min_distance: f32,
    pub improve_min: f32,
    pub improve_ratio: f32,
    pub close_enough: f32,
    pub penalty_behind: f32,
    pub penalty_far_ahead: f32,
    pub penalty_lateral: f32,
    pub penalty_too_far: f32,
    pub reward_resolved: f32,
    /// Unitless factor on the pixel improvement.
    pub reward_improvement: f32,
    pub tie_score: f32,
    pub tie_shift: f32,
}

impl Default for DashWeights {
    fn default() -> Self {
        Self {
            behind: 0.5,
            far_ahead: 0.6,
            lateral_pad_px: 12.0,
            too_far: 0.6,
            inset: 0.35,
            soft_perp: 0.35,
            hard_perp_inset: 0.15,
            shift_trigger: 0.45,
            min_distance: 0.5,
            improve_min: 0.08,
            improve_ratio: 0.7,
            close_enough: 0.32,
            penalty_behind: 0.30,
            penalty_far_ahead: 0.24,
            penalty_lateral: 0.20,
            penalty_too_far: 0.18,
            reward_resolved: 0.08,
            reward_improvement: 0.1,
            tie_score: 0.02,
            tie_shift: 0.01,
        }
    }
}

/// Multi-skill archetype with a reposition dash and a channeled storm.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct JustynaTuning {
    pub speed: f32,
    pub burst_trigger: f32,
    /// Extra trigger slack in pixels.
    pub burst_slack_px: f32,
    pub burst_cast: f32,
    pub burst_reach: f32,
    pub burst_strike: Strike,
    pub lance_trigger: f32,
    pub lance_pulse: f32,
    pub lance_pulses: u32,
    pub lance_strike: Strike,
    /// How long Pierce stays available after Lance.
    pub pierce_window: f32,
    /// Delay before Pierce may start inside its window.
    pub pierce_lock: f32,
    pub pierce_trigger: f32,
    pub pierce_cast: f32,
    pub pierce_strike: Strike,
    pub storm_trigger: f32,
    pub storm_cast: f32,
    pub storm_reach: f32,
    pub storm_pulses: u32,
    pub storm_interval: f32,
    pub storm_strike: Strike,
    /// Speed multiplier while the storm is cast and channeled.
    pub storm_speed_factor: f32,
    pub dash_distance: f32,
    pub dash_time: f32,
    pub dash_cooldown: f32,
    pub dash: DashWeights,
}

impl Default for JustynaTuning {
    fn default() -> Self {
        Self {
            speed: 3.94,
            burst_trigger: 6.5,
            burst_slack_px: 15.0,
            burst_cast: 0.4,
            burst_reach: 6.5,
            burst_strike: disk(2.0, Severity::Caution),
            lance_trigger: 6.4,
            lance_pulse: 0.4,
            lance_pulses: 2,
            lance_strike: rect(6.25, 1.8, Severity::Caution),
            pierce_window: 3.0,
            pierce_lock: 0.4,
            pierce_trigger: 7.2,
            pierce_cast: 0.7,
            pierce_strike: rect(7.0, 1.5, Severity::Caution),
            storm_trigger: 9.0,
            storm_cast: 0.5,
            storm_reach: 6.0,
            storm_pulses: 8,
            storm_interval: 0.125,
            storm_strike: disk(3.0, Severity::Caution),
            storm_speed_factor: 0.6,
            dash_distance: 2.5,
            dash_time: 0.26,
            dash_cooldown: 2.0,
            dash: DashWeights::default(),
        }
    }
}

/// Caution zoner.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct HazeTuning {
    pub speed: f32,
    /// Orb: retreat to at least `trigger` first.
    pub orb: SkillTiming,
    pub orb_telegraph: f32,
    pub orb_distance: f32,
    pub orb_strike: Strike,
    pub cleave: SkillTiming,
    pub cleave_backstep: f32,
    pub cleave_strike: Strike,
    pub volley: SkillTiming,
    pub volley_shots: u32,
    pub volley_cooldown: f32,
    pub volley_shot: ShotSpec,
    pub volley_slow_factor: f32,
    pub volley_slow_seconds: f32,
}

impl Default for HazeTuning {
    fn default() -> Self {
        Self {
            speed: 3.98,
            orb: SkillTiming::new(7.0, 0.5, 0.2, 0.1),
            orb_telegraph: 0.45,
            orb_distance: 7.0,
            orb_strike: disk(1.8, Severity::Caution),
            cleave: SkillTiming::new(4.0, 0.5, 0.3, 0.1),
            cleave_backstep: 1.5,
            cleave_strike: Strike::new(
                ShapeSpec::Sector {
                    radius: 5.5,
                    aperture_deg: 55.0,
                },
                Severity::Danger,
            ),
            volley: SkillTiming::new(13.0, 0.0, 0.33, 0.1),
            volley_shots: 4,
            volley_cooldown: 0.6,
            volley_shot: ShotSpec {
                shape: ShapeSpec::Square { side: 1.0 },
                speed: 17.0,
                range: 20.0,
                severity: Severity::Caution,
            },
            volley_slow_factor: 0.7,
            volley_slow_seconds: 1.0,
        }
    }
}

/// Overlapping hazards.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct VanyaTuning {
    pub speed: f32,
    pub boomerang: SkillTiming,
    pub boomerang_shot: ShotSpec,
    pub boomerang_return_speed: f32,
    pub charge: SkillTiming,
    pub charge_distance: f32,
    pub charge_speed: f32,
    pub charge_width: f32,
    pub charge_severity: Severity,
    pub quake: SkillTiming,
    /// Seconds between the quake cast and its hit.
    pub quake_delay: f32,
    pub quake_front: Strike,
    pub quake_back: Strike,
}

impl Default for VanyaTuning {
    fn default() -> Self {
        Self {
            speed: 3.85,
            boomerang: SkillTiming::new(8.3, 0.75, 0.25, 0.0),
            boomerang_shot: ShotSpec {
                shape: ShapeSpec::Disk { radius: 0.8 },
                speed: 10.6,
                range: 7.5,
                severity: Severity::Danger,
            },
            boomerang_return_speed: 11.0,
            charge: SkillTiming::new(7.0, 0.75, 0.3, 0.01),
            charge_distance: 7.0,
            charge_speed: 11.2,
            charge_width: 3.8,
            charge_severity: Severity::Danger,
            quake: SkillTiming::new(6.7, 0.75, 0.26, 0.0),
            quake_delay: 1.0,
            quake_front: rect(6.7, 5.4, Severity::Danger),
            quake_back: rect(0.5, 5.4, Severity::Danger),
        }
    }
}

/// Dash combo archetype.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct IsaacTuning {
    pub speed: f32,
    /// Seconds of moving before the next skill starts regardless of range.
    pub force_after: f32,
    pub combo_trigger: f32,
    pub combo_dash: f32,
    pub combo_dash_time: f32,
    pub combo_feint_max: f32,
    pub combo_cast: f32,
    pub combo_strike: Strike,
    pub combo_post: f32,
    pub leap: SkillTiming,
    pub leap_range: f32,
    pub leap_strike: Strike,
    pub leap_margin_px: f32,
}

impl Default for IsaacTuning {
    fn default() -> Self {
        Self {
            speed: 3.85,
            force_after: 2.0,
            combo_trigger: 7.0,
            combo_dash: 3.0,
            combo_dash_time: 0.2,
            combo_feint_max: 0.25,
            combo_cast: 0.4,
            combo_strike: rect(5.0, 2.0, Severity::Danger),
            combo_post: 0.35,
            leap: SkillTiming::new(7.5, 0.0, 0.5, 0.35),
            leap_range: 4.0,
            leap_strike: disk(2.5, Severity::Caution),
            leap_margin_px: 6.0,
        }
    }
}

/// Resource holding the tuning of every archetype.
#[derive(Resource, Clone, Debug, Default, PartialEq)]
pub struct TuningRegistry {
    pub hisui: HisuiTuning,
    pub abigail: AbigailTuning,
    pub luku: LukuTuning,
    pub katja: KatjaTuning,
    pub darko: DarkoTuning,
    pub debi_marlene: DebiMarleneTuning,
    pub justyna: JustynaTuning,
    pub haze: HazeTuning,
    pub vanya: VanyaTuning,
    pub isaac: IsaacTuning,
}

impl TuningRegistry {
    /// Replace one archetype's tuning with the parsed contents of `contents`.
    pub fn apply_ron(&mut self, kind: ArchetypeKind, contents: &str) -> Result<(), ron::error::SpannedError> {
        match kind {
            ArchetypeKind::Hisui => self.hisui = ron::from_str(contents)?,
            ArchetypeKind::Abigail => self.abigail = ron::from_str(contents)?,
            ArchetypeKind::Luku => self.luku = ron::from_str(contents)?,
            ArchetypeKind::Katja => self.katja = ron::from_str(contents)?,
            ArchetypeKind::Darko => self.darko = ron::from_str(contents)?,
            ArchetypeKind::DebiMarlene => self.debi_marlene = ron::from_str(contents)?,
            ArchetypeKind::Justyna => self.justyna = ron::from_str(contents)?,
            ArchetypeKind::Haze => self.haze = ron::from_str(contents)?,
            ArchetypeKind::Vanya => self.vanya = ron::from_str(contents)?,
            ArchetypeKind::Isaac => self.isaac = ron::from_str(contents)?,
        }
        Ok(())
    }

    /// Load one override file.
    pub fn load_file(&mut self, kind: ArchetypeKind, path: &Path) -> Result<(), DataLoadError> {
        if !path.exists() {
            return Err(DataLoadError::FileNotFound(path.display().to_string()));
        }
        let contents = fs::read_to_string(path).map_err(|e| DataLoadError::ReadError {
            path: path.display().to_string(),
            details: e.to_string(),
        })?;
        self.apply_ron(kind, &contents)
            .map_err(|e| DataLoadError::ParseError {
                path: path.display().to_string(),
                details: e.to_string(),
            })
    }
}

/// Parse a standalone tuning file, for tools and tests.
pub fn parse_tuning<T: DeserializeOwned>(contents: &str) -> Result<T, ron::error::SpannedError> {
    ron::from_str(contents)
}

/// Load tuning overrides from the assets/data/enemies/ directory.
pub fn load_enemy_tunings(mut registry: ResMut<TuningRegistry>) {
    let dir = Path::new(ENEMY_DATA_DIR);

    if !dir.exists() {
        warn!("Enemy tuning directory not found: {:?}, using built-in values", dir);
        return;
    }

    let mut loaded = 0;
    for kind in ArchetypeKind::ALL {
        let path = dir.join(format!("{}.ron", kind.file_stem()));
        match registry.load_file(kind, &path) {
            Ok(()) => {
                info!("Loaded tuning override: {} ({:?})", kind.name(), path);
                loaded += 1;
            }
            Err(DataLoadError::FileNotFound(_)) => {
                debug!("No tuning override for {}", kind.name());
            }
            Err(e) => {
                error!("{}", e);
            }
        }
    }

    info!("Loaded {} enemy tuning override(s)", loaded);
}
