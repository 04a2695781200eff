// Infrastructure layer - Configuration, framing and HTTP adapters
pub mod chunked_frames;
pub mod config;
pub mod frame;
pub mod http_response;
