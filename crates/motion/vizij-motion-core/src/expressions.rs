//! Expression channel names and the weight table the expression-stage layers write into.

use std::fmt;

use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};

/// Facial expression channel. Presets follow the humanoid rig standard; anything else is
/// carried as `Custom` and forwarded verbatim to the rig.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Expression {
    Happy,
    Angry,
    Sad,
    Relaxed,
    Surprised,
    Neutral,
    Aa,
    Ih,
    Ou,
    Ee,
    Oh,
    Blink,
    BlinkLeft,
    BlinkRight,
    Custom(String),
}

/// Channels cleared by `reset_expressions` and by every explicit emotion trigger.
pub const RESETTABLE: [Expression; 7] = [
    Expression::Happy,
    Expression::Sad,
    Expression::Angry,
    Expression::Surprised,
    Expression::Relaxed,
    Expression::Aa,
    Expression::Oh,
];

impl Expression {
    pub fn as_str(&self) -> &str {
        match self {
            Expression::Happy => "happy",
            Expression::Angry => "angry",
            Expression::Sad => "sad",
            Expression::Relaxed => "relaxed",
            Expression::Surprised => "surprised",
            Expression::Neutral => "neutral",
            Expression::Aa => "aa",
            Expression::Ih => "ih",
            Expression::Ou => "ou",
            Expression::Ee => "ee",
            Expression::Oh => "oh",
            Expression::Blink => "blink",
            Expression::BlinkLeft => "blinkLeft",
            Expression::BlinkRight => "blinkRight",
            Expression::Custom(name) => name.as_str(),
        }
    }

    pub fn parse(name: &str) -> Expression {
        match name {
            "happy" => Expression::Happy,
            "angry" => Expression::Angry,
            "sad" => Expression::Sad,
            "relaxed" => Expression::Relaxed,
            "surprised" => Expression::Surprised,
            "neutral" => Expression::Neutral,
            "aa" => Expression::Aa,
            "ih" => Expression::Ih,
            "ou" => Expression::Ou,
            "ee" => Expression::Ee,
            "oh" => Expression::Oh,
            "blink" => Expression::Blink,
            "blinkLeft" => Expression::BlinkLeft,
            "blinkRight" => Expression::BlinkRight,
            other => Expression::Custom(other.to_string()),
        }
    }
}

impl From<String> for Expression {
    fn from(s: String) -> Self {
        Expression::parse(&s)
    }
}

impl From<&str> for Expression {
    fn from(s: &str) -> Self {
        Expression::parse(s)
    }
}

impl From<Expression> for String {
    fn from(e: Expression) -> Self {
        match e {
            Expression::Custom(name) => name,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current expression weights plus the set of channels changed since the last flush.
#[derive(Debug, Default, Clone)]
pub struct ExpressionWeights {
    weights: HashMap<Expression, f32>,
    dirty: HashSet<Expression>,
}

impl ExpressionWeights {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a weight, clamped to [0,1]. Only actual changes are queued for the rig.
    pub fn set(&mut self, expr: Expression, weight: f32) {
        let w = if weight.is_finite() {
            weight.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let prev = self.weights.insert(expr.clone(), w);
        if prev != Some(w) {
            self.dirty.insert(expr);
        }
    }

    pub fn get(&self, expr: &Expression) -> f32 {
        self.weights.get(expr).copied().unwrap_or(0.0)
    }

    pub fn reset(&mut self, exprs: &[Expression]) {
        for e in exprs {
            self.set(e.clone(), 0.0);
        }
    }

    /// Take pending changes, sorted by channel name for a stable write order.
    pub fn drain_dirty(&mut self) -> Vec<(Expression, f32)> {
        let mut out: Vec<(Expression, f32)> = self
            .dirty
            .drain()
            .map(|e| {
                let w = self.weights.get(&e).copied().unwrap_or(0.0);
                (e, w)
            })
            .collect();
        out.sort_by(|a, b| a.0.as_str().cmp(b.0.as_str()));
        out
    }

    pub fn clear(&mut self) {
        self.weights.clear();
        self.dirty.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Expression, f32)> {
        self.weights.iter().map(|(k, v)| (k, *v))
    }
}
