/// Thresholded sigmoid: yields `top` when the logistic of the input reaches `tresh`, `bottom`
/// otherwise.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Step {
    top: f32,
    bottom: f32,
    tresh: f32,
}

impl Step {
    pub fn new(top: f32, bottom: f32, tresh: f32) -> Self {
        Self { top, bottom, tresh }
    }

    pub fn params(&self) -> (f32, f32, f32) {
        (self.top, self.bottom, self.tresh)
    }

    pub fn f(&self, z: f32) -> f32 {
        let s = 1. / (1. + (-z).exp());

        if s >= self.tresh {
            self.top
        } else {
            self.bottom
        }
    }
}
