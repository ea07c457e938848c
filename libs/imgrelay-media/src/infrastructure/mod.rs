//! Infrastructure implementations of domain ports

mod http_fetcher;
mod webp_transcoder;

pub use http_fetcher::HttpSourceFetcher;
pub use webp_transcoder::WebpTranscoder;
