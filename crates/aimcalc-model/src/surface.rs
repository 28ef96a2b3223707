use aimcalc_base::{Error, Result, parse_number};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::warn;

use crate::params::{ControlMode, SceneParams};
use crate::solve::Solution;

/// A cell or parameter value as it appears in imported tables.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Number(f64),
    Bool(bool),
    Text(String),
    Empty,
}

impl ParameterValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) if value.is_finite() => Some(*value),
            Self::Text(text) => parse_number(text),
            _ => None,
        }
    }

    pub fn number_or(&self, fallback: f64) -> f64 {
        self.as_number().unwrap_or(fallback)
    }

    pub fn is_blank(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(text) => text.trim().is_empty(),
            _ => false,
        }
    }

    pub fn as_text(&self) -> String {
        match self {
            Self::Number(value) => value.to_string(),
            Self::Bool(value) => value.to_string(),
            Self::Text(text) => text.clone(),
            Self::Empty => String::new(),
        }
    }
}

impl From<f64> for ParameterValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: String,
    pub value: ParameterValue,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: impl Into<ParameterValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

macro_rules! param_keys {
    ($($variant:ident => $name:literal),+ $(,)?) => {
        /// Flat names of every editable parameter.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum ParamKey {
            $($variant),+
        }

        impl ParamKey {
            pub const ALL: &'static [ParamKey] = &[$(ParamKey::$variant),+];

            pub fn name(self) -> &'static str {
                match self {
                    $(ParamKey::$variant => $name),+
                }
            }

            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $($name => Some(ParamKey::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

param_keys! {
    FlrX => "FLRx",
    FlrY => "FLRy",
    FlrZ => "FLRz",
    D1Lx => "D1Lx",
    D1Ly => "D1Ly",
    D1Rx => "D1Rx",
    D1Ry => "D1Ry",
    Beta => "beta",
    Alpha => "alpha",
    CrabAngle => "crabAngle",
    Zeta => "zeta",
    V => "V",
    Ctrl => "ctrl",
    BaseX => "baseM.x",
    BaseY => "baseM.y",
    BaseZ => "baseM.z",
    TargetX => "targM.x",
    TargetY => "targM.y",
    TargetZ => "targM.z",
    RectW => "rectW",
    RectH => "rectH",
    RectYaw => "rectYaw",
    RectPitch => "rectPitch",
    RectRoll => "rectRoll",
    BoxYaw => "boxYaw",
    BoxPitch => "boxPitch",
    BoxRoll => "boxRoll",
    BoxSx => "boxSX",
    BoxSy => "boxSY",
    BoxSz => "boxSZ",
    BoxX => "boxPos.x",
    BoxY => "boxPos.y",
    BoxZ => "boxPos.z",
}

impl FromStr for ParamKey {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        Self::from_name(name.trim()).ok_or_else(|| Error::UnknownParameter(name.to_string()))
    }
}

impl std::fmt::Display for ParamKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Expands to the numeric field behind a key, borrowed as `$ref`.
macro_rules! number_field {
    ($params:expr, $key:expr, $($ref:tt)+) => {
        match $key {
            ParamKey::FlrX => Some($($ref)+ $params.mount.flr.x),
            ParamKey::FlrY => Some($($ref)+ $params.mount.flr.y),
            ParamKey::FlrZ => Some($($ref)+ $params.mount.flr.z),
            ParamKey::D1Lx => Some($($ref)+ $params.mount.d1_left.x),
            ParamKey::D1Ly => Some($($ref)+ $params.mount.d1_left.y),
            ParamKey::D1Rx => Some($($ref)+ $params.mount.d1_right.x),
            ParamKey::D1Ry => Some($($ref)+ $params.mount.d1_right.y),
            ParamKey::Beta => Some($($ref)+ $params.beta_deg),
            ParamKey::Alpha => Some($($ref)+ $params.alpha_arcmin),
            ParamKey::CrabAngle => Some($($ref)+ $params.crab_mm_per_m),
            ParamKey::Zeta => Some($($ref)+ $params.zeta_deg),
            ParamKey::V => Some($($ref)+ $params.distance),
            ParamKey::BaseX => Some($($ref)+ $params.manual_base.x),
            ParamKey::BaseY => Some($($ref)+ $params.manual_base.y),
            ParamKey::BaseZ => Some($($ref)+ $params.manual_base.z),
            ParamKey::TargetX => Some($($ref)+ $params.manual_target.x),
            ParamKey::TargetY => Some($($ref)+ $params.manual_target.y),
            ParamKey::TargetZ => Some($($ref)+ $params.manual_target.z),
            ParamKey::RectW => Some($($ref)+ $params.rect.width),
            ParamKey::RectH => Some($($ref)+ $params.rect.height),
            ParamKey::RectYaw => Some($($ref)+ $params.rect.yaw_deg),
            ParamKey::RectPitch => Some($($ref)+ $params.rect.pitch_deg),
            ParamKey::RectRoll => Some($($ref)+ $params.rect.roll_deg),
            ParamKey::BoxYaw => Some($($ref)+ $params.solid.yaw_deg),
            ParamKey::BoxPitch => Some($($ref)+ $params.solid.pitch_deg),
            ParamKey::BoxRoll => Some($($ref)+ $params.solid.roll_deg),
            ParamKey::BoxSx => Some($($ref)+ $params.solid.size.x),
            ParamKey::BoxSy => Some($($ref)+ $params.solid.size.y),
            ParamKey::BoxSz => Some($($ref)+ $params.solid.size.z),
            ParamKey::BoxX => Some($($ref)+ $params.solid.center.x),
            ParamKey::BoxY => Some($($ref)+ $params.solid.center.y),
            ParamKey::BoxZ => Some($($ref)+ $params.solid.center.z),
            ParamKey::Ctrl => None,
        }
    };
}

impl SceneParams {
    fn number(&self, key: ParamKey) -> Option<f64> {
        number_field!(self, key, &).copied()
    }

    fn number_slot(&mut self, key: ParamKey) -> Option<&mut f64> {
        number_field!(self, key, &mut)
    }

    pub fn get(&self, key: ParamKey) -> ParameterValue {
        if key == ParamKey::Ctrl {
            return ParameterValue::Text(self.control.as_str().to_string());
        }
        match self.number(key) {
            Some(value) => ParameterValue::Number(value),
            None => ParameterValue::Empty,
        }
    }

    /// Strict setter: text is parsed, but a value that does not fit the key
    /// is an error.
    pub fn set(&mut self, key: ParamKey, value: &ParameterValue) -> Result<()> {
        if key == ParamKey::Ctrl {
            self.control = value.as_text().parse::<ControlMode>()?;
            return Ok(());
        }
        let number = value.as_number().ok_or_else(|| {
            Error::InvalidParameter(format!("{key} expects a number, got {value:?}"))
        })?;
        if let Some(slot) = self.number_slot(key) {
            *slot = number;
        }
        Ok(())
    }

    pub fn set_by_name(&mut self, name: &str, value: &ParameterValue) -> Result<()> {
        let key = name.parse::<ParamKey>()?;
        self.set(key, value)
    }

    pub fn to_key_values(&self) -> Vec<KeyValue> {
        ParamKey::ALL
            .iter()
            .map(|&key| KeyValue::new(key.name(), self.get(key)))
            .collect()
    }

    /// Lenient bulk import: unknown keys and unusable values are skipped,
    /// numbers fall back to the current value. Returns how many rows were
    /// applied.
    pub fn apply_key_values(&mut self, rows: &[KeyValue]) -> usize {
        let mut applied = 0;
        for row in rows {
            let name = row.key.trim();
            if name.is_empty() {
                continue;
            }
            let Some(key) = ParamKey::from_name(name) else {
                warn!(key = name, "ignoring unknown parameter");
                continue;
            };
            if key == ParamKey::Ctrl {
                match row.value.as_text().parse::<ControlMode>() {
                    Ok(mode) => {
                        self.control = mode;
                        applied += 1;
                    }
                    Err(err) => warn!(%err, "ignoring ctrl value"),
                }
                continue;
            }
            if let Some(slot) = self.number_slot(key) {
                *slot = row.value.number_or(*slot);
                applied += 1;
            }
        }
        applied
    }
}

/// Derived values exported next to the inputs.
pub fn output_key_values(params: &SceneParams, solution: &Solution) -> Vec<KeyValue> {
    vec![
        KeyValue::new("base.x", solution.base.x),
        KeyValue::new("base.y", solution.base.y),
        KeyValue::new("base.z", solution.base.z),
        KeyValue::new("targ.x", solution.target.x),
        KeyValue::new("targ.y", solution.target.y),
        KeyValue::new("targ.z", solution.target.z),
        KeyValue::new("Yt_formula", solution.yt_formula),
        KeyValue::new("Yt_sim", solution.yt_sim),
        KeyValue::new("dYt", solution.d_yt),
        KeyValue::new("out.V", solution.output.distance),
        KeyValue::new("out.etaDeg", solution.output.eta_deg),
        KeyValue::new("out.thetaDeg", solution.output.theta_deg),
        KeyValue::new("out.elevDeg", solution.output.elev_deg),
        KeyValue::new("out.epsDeg", solution.output.eps_deg),
        KeyValue::new("alpha_deg", params.alpha_deg()),
    ]
}
