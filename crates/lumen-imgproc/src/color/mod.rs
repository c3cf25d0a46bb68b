mod gray;
pub use gray::*;

mod hsv;
pub use hsv::*;
