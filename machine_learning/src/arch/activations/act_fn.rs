use std::{fmt, str::FromStr};

use super::{Sigmoid, Step};
use crate::MlErr;

/// An activation function applied element-wise to a layer's output.
///
/// Artifacts store it as text: `sigmoid:<amp>` or `step:<top>,<bottom>,<tresh>`.
#[derive(Clone, Debug, PartialEq)]
pub enum ActFn {
    Sigmoid(Sigmoid),
    Step(Step),
}
use ActFn::*;

impl ActFn {
    pub fn sigmoid(amp: f32) -> Self {
        Sigmoid(Sigmoid::new(amp))
    }

    pub fn step(top: f32, bottom: f32, tresh: f32) -> Self {
        Step(Step::new(top, bottom, tresh))
    }

    pub fn f(&self, x: f32) -> f32 {
        match self {
            Sigmoid(a) => a.f(x),
            Step(a) => a.f(x),
        }
    }
}

impl fmt::Display for ActFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sigmoid(a) => write!(f, "sigmoid:{}", a.amp()),
            Step(a) => {
                let (top, bottom, tresh) = a.params();
                write!(f, "step:{top},{bottom},{tresh}")
            }
        }
    }
}

impl FromStr for ActFn {
    type Err = MlErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || MlErr::InvalidActFn(s.to_string());
        let (name, args) = s.split_once(':').ok_or_else(invalid)?;

        let args = args
            .split(',')
            .map(|arg| arg.trim().parse::<f32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| invalid())?;

        match (name.trim(), args.as_slice()) {
            ("sigmoid", &[amp]) => Ok(Self::sigmoid(amp)),
            ("step", &[top, bottom, tresh]) => Ok(Self::step(top, bottom, tresh)),
            _ => Err(invalid()),
        }
    }
}
