mod frame;
mod host;

pub use frame::{DriverState, FrameDriver};
pub use host::{HeadlessHost, Host};
