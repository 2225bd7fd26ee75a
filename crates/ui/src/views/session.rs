mod complete;
mod guidance;
mod math;
mod problem;
mod scripts;
mod solution;
mod view;

#[cfg(test)]
pub(crate) use view::SessionTestHandles;
pub use view::SessionView;
