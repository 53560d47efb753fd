pub mod background;
pub mod features;
pub mod http;
