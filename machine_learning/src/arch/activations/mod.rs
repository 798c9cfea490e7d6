mod act_fn;
mod sigmoid;
mod step;

pub use act_fn::ActFn;
pub use sigmoid::Sigmoid;
pub use step::Step;
