mod frame_error;
mod frame_transport;

pub use frame_error::FrameError;
pub use frame_transport::{discard_exact, read_exact, recv_frame, send_frame, write_all};
