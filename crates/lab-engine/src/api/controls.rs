//! Declarative control schemas and the committed parameter values they produce.
//!
//! A schema is built once per module at registration and never changes.
//! The UI layer reads it (serialized to JSON) to build sliders and selects;
//! every value coming back from the UI goes through [`ControlSchema::commit`],
//! so models never observe an out-of-range parameter.

use serde::Serialize;

use crate::core::error::LabError;

/// Input widget kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlKind {
    /// Continuous slider over `[min, max]` quantized to `step`.
    Range,
    /// Discrete select; the committed value is one of the option values.
    Choice,
}

/// One entry of a discrete choice.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChoiceOption {
    pub value: f32,
    pub label: &'static str,
}

/// A single adjustable input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Control {
    pub id: &'static str,
    pub label: &'static str,
    pub kind: ControlKind,
    pub min: f32,
    pub max: f32,
    /// Quantization step. Zero for choices.
    pub step: f32,
    pub default: f32,
    pub unit: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<ChoiceOption>,
}

impl Control {
    /// A continuous range control.
    pub fn range(
        id: &'static str,
        label: &'static str,
        min: f32,
        max: f32,
        step: f32,
        default: f32,
        unit: &'static str,
    ) -> Self {
        Self {
            id,
            label,
            kind: ControlKind::Range,
            min,
            max,
            step,
            default,
            unit,
            options: Vec::new(),
        }
    }

    /// A discrete choice. `min`/`max` span the option values.
    pub fn choice(
        id: &'static str,
        label: &'static str,
        options: &[(f32, &'static str)],
        default: f32,
        unit: &'static str,
    ) -> Self {
        let options: Vec<ChoiceOption> = options
            .iter()
            .map(|&(value, label)| ChoiceOption { value, label })
            .collect();
        let min = options.iter().map(|o| o.value).fold(f32::INFINITY, f32::min);
        let max = options.iter().map(|o| o.value).fold(f32::NEG_INFINITY, f32::max);
        Self {
            id,
            label,
            kind: ControlKind::Choice,
            min,
            max,
            step: 0.0,
            default,
            unit,
            options,
        }
    }

    /// Bring an arbitrary input onto the control's value set.
    pub fn commit(&self, value: f32) -> f32 {
        if !value.is_finite() {
            return self.default;
        }
        match self.kind {
            ControlKind::Range => {
                let clamped = value.clamp(self.min, self.max);
                if self.step <= 0.0 {
                    return clamped;
                }
                let steps = ((clamped - self.min) / self.step).round();
                (self.min + steps * self.step).clamp(self.min, self.max)
            }
            ControlKind::Choice => self
                .options
                .iter()
                .map(|o| o.value)
                .min_by(|a, b| (a - value).abs().total_cmp(&(b - value).abs()))
                .unwrap_or(self.default),
        }
    }
}

/// Ordered list of a module's controls.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ControlSchema {
    controls: Vec<Control>,
}

impl ControlSchema {
    pub fn new(controls: Vec<Control>) -> Self {
        Self { controls }
    }

    pub fn get(&self, id: &str) -> Option<&Control> {
        self.controls.iter().find(|c| c.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Control> {
        self.controls.iter()
    }

    pub fn len(&self) -> usize {
        self.controls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }

    /// Parameters holding every control's default.
    pub fn defaults(&self) -> Params {
        Params {
            values: self.controls.iter().map(|c| (c.id, c.default)).collect(),
        }
    }

    /// Commit `value` for control `id` into `params`. Returns the stored value.
    pub fn commit(&self, params: &mut Params, id: &str, value: f32) -> Result<f32, LabError> {
        let control = self
            .get(id)
            .ok_or_else(|| LabError::UnknownControl(id.to_string()))?;
        let committed = control.commit(value);
        params.set(control.id, committed);
        Ok(committed)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Last-committed control values of a session, in schema order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Params {
    values: Vec<(&'static str, f32)>,
}

impl Params {
    /// Value of control `id`. Params are always built from the module's own
    /// schema, so a miss means the module asked for a control it never declared.
    pub fn get(&self, id: &str) -> f32 {
        let value = self.values.iter().find(|(k, _)| *k == id).map(|(_, v)| *v);
        debug_assert!(value.is_some(), "no control named {id}");
        value.unwrap_or_default()
    }

    fn set(&mut self, id: &'static str, value: f32) {
        match self.values.iter_mut().find(|(k, _)| *k == id) {
            Some(slot) => slot.1 = value,
            None => self.values.push((id, value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f32)> + '_ {
        self.values.iter().copied()
    }
}
