pub mod config;
pub mod crawl;
pub mod load;
pub mod lookup;

pub use config::ConfigAction;
pub use crawl::CrawlArgs;
