mod landing;
mod session;
mod state;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use landing::LandingView;
pub use session::SessionView;
pub use state::{ViewError, ViewState, view_state_from_resource};
